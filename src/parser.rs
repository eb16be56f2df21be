use std::{fs, io};

use log::info;

#[cfg(feature = "ini")]
use serde_derive::Deserialize;
#[cfg(feature = "xml")]
use sxd_xpath::{evaluate_xpath, nodeset::Node, Value};

#[cfg(feature = "ini")]
use crate::block::Cell;
use crate::{
    block::{Description, InvalidRun},
    board::{Board, DimensionMismatch},
};

#[derive(Debug)]
pub struct ParseError(pub String);

impl From<io::Error> for ParseError {
    fn from(err: io::Error) -> Self {
        Self(format!("{:?}", err))
    }
}

impl From<InvalidRun> for ParseError {
    fn from(err: InvalidRun) -> Self {
        Self(err.0)
    }
}

impl From<DimensionMismatch> for ParseError {
    fn from(err: DimensionMismatch) -> Self {
        Self(err.0)
    }
}

pub trait BoardParser {
    fn with_content(content: &str) -> Result<Self, ParseError>
    where
        Self: Sized;

    fn parse(&self) -> Result<Board, ParseError>;
}

pub trait LocalReader: BoardParser {
    fn read_local(file_name: &str) -> Result<Self, ParseError>
    where
        Self: Sized,
    {
        let content = Self::file_content(file_name)?;
        Self::with_content(&content)
    }

    fn file_content(file_name: &str) -> io::Result<String> {
        fs::read_to_string(file_name)
    }
}

#[cfg(feature = "web")]
impl From<reqwest::Error> for ParseError {
    fn from(err: reqwest::Error) -> Self {
        Self(format!("{:?}", err))
    }
}

pub trait NetworkReader: BoardParser {
    fn read_remote(file_name: &str) -> Result<Self, ParseError>
    where
        Self: Sized,
    {
        let url = file_name.to_string();
        let content = Self::http_content(url)?;
        Self::with_content(&content)
    }

    #[cfg(feature = "web")]
    fn http_content(url: String) -> Result<String, ParseError> {
        info!("Requesting {} ...", &url);
        let response = reqwest::blocking::get(url.as_str())?;
        Ok(response.text()?)
    }

    #[cfg(not(feature = "web"))]
    fn http_content(url: String) -> Result<String, ParseError> {
        info!("Requesting {} ...", &url);
        Err(ParseError(format!(
            "Cannot request url {}: no support for web client (hint: add --features=web)",
            url
        )))
    }
}

/// How the clue strings of the TOML format are written.
#[cfg(feature = "ini")]
#[derive(Debug, PartialEq, Clone, Copy)]
enum ClueFormat {
    /// whitespace-separated decimal counts
    Counts,
    /// one symbol per run, extended alphabet for lengths above 9
    Symbols,
}

#[cfg(feature = "ini")]
#[derive(Debug, Deserialize)]
struct Clues {
    rows: String,
    columns: String,
    format: Option<String>,
}

#[cfg(feature = "ini")]
#[derive(Debug, Deserialize)]
struct Hints {
    cells: String,
}

#[cfg(feature = "ini")]
#[derive(Debug, Deserialize)]
struct NonoToml {
    clues: Clues,
    hints: Option<Hints>,
}

#[cfg(feature = "ini")]
pub struct MyFormat {
    structure: NonoToml,
}

#[cfg(feature = "ini")]
impl LocalReader for MyFormat {}

#[cfg(feature = "ini")]
impl From<toml::de::Error> for ParseError {
    fn from(err: toml::de::Error) -> Self {
        Self(format!("{:?}", err))
    }
}

#[cfg(feature = "ini")]
impl BoardParser for MyFormat {
    fn with_content(content: &str) -> Result<Self, ParseError> {
        let nono = toml::from_str(content)?;

        Ok(Self { structure: nono })
    }

    fn parse(&self) -> Result<Board, ParseError> {
        let clues = &self.structure.clues;
        let format = self.clue_format()?;

        let rows = Self::parse_clues(&clues.rows, format)?;
        let columns = Self::parse_clues(&clues.columns, format)?;

        match &self.structure.hints {
            Some(hints) => {
                let cells = Self::parse_hints(&hints.cells, rows.len(), columns.len())?;
                Ok(Board::with_descriptions_and_cells(rows, columns, cells)?)
            }
            None => Ok(Board::with_descriptions(rows, columns)),
        }
    }
}

#[cfg(feature = "ini")]
impl MyFormat {
    fn clue_format(&self) -> Result<ClueFormat, ParseError> {
        match self.structure.clues.format.as_deref() {
            None | Some("counts") => Ok(ClueFormat::Counts),
            Some("symbols") => Ok(ClueFormat::Symbols),
            Some(other) => Err(ParseError(format!("Unknown clues format {:?}", other))),
        }
    }

    fn parse_description(description: &str, format: ClueFormat) -> Result<Description, ParseError> {
        match format {
            ClueFormat::Symbols => Ok(Description::from_symbols(description)?),
            ClueFormat::Counts => {
                let counts = description
                    .split_whitespace()
                    .map(|block| {
                        block.parse::<i64>().map_err(|err| {
                            ParseError(format!("Invalid run count {:?}: {}", block, err))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Description::from_counts(counts)?)
            }
        }
    }

    fn parse_line(
        descriptions: &str,
        format: ClueFormat,
    ) -> Result<Option<Vec<Description>>, ParseError> {
        let descriptions = descriptions.trim();
        let parts: Vec<_> = descriptions.split(|c| c == '#' || c == ';').collect();

        let non_comment = parts[0];
        if non_comment.is_empty() {
            return Ok(None);
        }

        let mut line = Vec::new();
        for description in non_comment.split(',') {
            let description = description.trim().trim_matches(|c| c == '\'' || c == '"');
            if description.is_empty() {
                continue;
            }
            line.push(Self::parse_description(description, format)?);
        }
        Ok(Some(line))
    }

    fn parse_clues(descriptions: &str, format: ClueFormat) -> Result<Vec<Description>, ParseError> {
        let mut clues = Vec::new();
        for line in descriptions.lines() {
            if let Some(mut parsed) = Self::parse_line(line, format)? {
                clues.append(&mut parsed);
            }
        }
        Ok(clues)
    }

    /// A character grid of pinned cells: `?` unknown, `.` white, `X` black.
    fn parse_hints(cells: &str, height: usize, width: usize) -> Result<Vec<Cell>, ParseError> {
        let lines: Vec<_> = cells
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.len() != height {
            return Err(ParseError(format!(
                "Hints grid has {} rows while the clues declare {}",
                lines.len(),
                height
            )));
        }

        let mut grid = Vec::with_capacity(height * width);
        for line in lines {
            if line.chars().count() != width {
                return Err(ParseError(format!(
                    "Hints row {:?} does not span {} columns",
                    line, width
                )));
            }
            for symbol in line.chars() {
                grid.push(match symbol {
                    '?' => Cell::Undefined,
                    '.' => Cell::White,
                    'X' => Cell::Black,
                    other => {
                        return Err(ParseError(format!("Unknown hint symbol {:?}", other)));
                    }
                });
            }
        }
        Ok(grid)
    }
}

#[cfg(feature = "xml")]
pub struct WebPbn {
    package: sxd_document::Package,
}

#[cfg(feature = "xml")]
impl LocalReader for WebPbn {}

#[cfg(feature = "xml")]
impl NetworkReader for WebPbn {
    fn read_remote(file_name: &str) -> Result<Self, ParseError> {
        let url = format!("{}/XMLpuz.cgi?id={}", Self::BASE_URL, file_name);

        let content = Self::http_content(url)?;
        Self::with_content(&content)
    }
}

#[cfg(feature = "xml")]
impl From<sxd_document::parser::Error> for ParseError {
    fn from(err: sxd_document::parser::Error) -> Self {
        Self(format!("{:?}", err))
    }
}

#[cfg(feature = "xml")]
impl From<sxd_xpath::Error> for ParseError {
    fn from(err: sxd_xpath::Error) -> Self {
        Self(format!("{:?}", err))
    }
}

#[cfg(feature = "xml")]
impl BoardParser for WebPbn {
    fn with_content(content: &str) -> Result<Self, ParseError> {
        let package = sxd_document::parser::parse(content)?;

        Ok(Self { package })
    }

    fn parse(&self) -> Result<Board, ParseError> {
        self.check_monochrome()?;

        let rows = self.parse_clues("rows")?;
        let columns = self.parse_clues("columns")?;
        Ok(Board::with_descriptions(rows, columns))
    }
}

#[cfg(feature = "xml")]
impl WebPbn {
    const BASE_URL: &'static str = "http://webpbn.com";

    fn parse_line(description: &Node) -> Result<Description, ParseError> {
        let counts = description
            .children()
            .iter()
            .filter_map(|child| {
                if let Node::Text(_text) = child {
                    // ignore newlines and whitespaces
                    None
                } else {
                    Some(child.string_value())
                }
            })
            .map(|count| {
                count
                    .trim()
                    .parse::<i64>()
                    .map_err(|err| ParseError(format!("Invalid run count {:?}: {}", count, err)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Description::from_counts(counts)?)
    }

    fn parse_clues(&self, type_: &str) -> Result<Vec<Description>, ParseError> {
        let document = self.package.as_document();
        let value = evaluate_xpath(&document, &format!(".//clues[@type='{}']/line", type_))?;

        if let Value::Nodeset(ns) = value {
            ns.document_order()
                .iter()
                .map(|line_node| Self::parse_line(line_node))
                .collect()
        } else {
            Ok(vec![])
        }
    }

    /// The solver handles black-and-white puzzles only, so anything
    /// beyond the two standard color declarations is refused.
    fn check_monochrome(&self) -> Result<(), ParseError> {
        let document = self.package.as_document();
        let value = evaluate_xpath(&document, ".//color")?;

        if let Value::Nodeset(ns) = value {
            let mut names: Vec<_> = ns
                .iter()
                .filter_map(|color_node| {
                    if let Node::Element(e) = color_node {
                        e.attribute("name").map(|name| name.value().to_string())
                    } else {
                        None
                    }
                })
                .collect();
            names.sort_unstable();

            if !(names.is_empty() || names == ["black", "white"]) {
                return Err(ParseError(format!(
                    "Colored puzzles are not supported (declared colors: {:?})",
                    names
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #[cfg(feature = "ini")]
    mod my_format {
        use crate::block::{Description, Run};
        use crate::board::Point;
        use crate::parser::{BoardParser, ClueFormat, MyFormat};

        fn counts(descriptions: &str) -> Vec<Description> {
            MyFormat::parse_clues(descriptions, ClueFormat::Counts).unwrap()
        }

        fn desc(runs: &[usize]) -> Description {
            Description::new(runs.iter().map(|&x| Run(x)).collect())
        }

        #[test]
        fn parse_single() {
            assert_eq!(counts("1"), vec![desc(&[1])]);
        }

        #[test]
        fn parse_two_lines() {
            assert_eq!(counts("1\n2"), vec![desc(&[1]), desc(&[2])]);
        }

        #[test]
        fn parse_two_rows_same_line() {
            assert_eq!(counts("1, 2"), vec![desc(&[1]), desc(&[2])]);
        }

        #[test]
        fn parse_two_rows_with_commas() {
            assert_eq!(counts("1, 2,\n3"), vec![desc(&[1]), desc(&[2]), desc(&[3])]);
        }

        #[test]
        fn parse_two_blocks() {
            assert_eq!(counts("1 2"), vec![desc(&[1, 2])]);
        }

        #[test]
        fn parse_quotes() {
            assert_eq!(counts("'1 2'"), vec![desc(&[1, 2])]);
        }

        #[test]
        fn parse_double_quotes() {
            assert_eq!(counts("1 2\n\"3 4\"\n"), vec![desc(&[1, 2]), desc(&[3, 4])]);
        }

        #[test]
        fn parse_comment_end_of_line() {
            assert_eq!(counts("1 2  # the comment"), vec![desc(&[1, 2])]);
        }

        #[test]
        fn parse_comment_semicolon() {
            assert_eq!(counts("1 2  ; another comment"), vec![desc(&[1, 2])]);
        }

        #[test]
        fn parse_comments_in_the_middle() {
            assert_eq!(
                counts("1 2 \n # the multi-line \n # comment \n 3, 4"),
                vec![desc(&[1, 2]), desc(&[3]), desc(&[4])]
            );
        }

        #[test]
        fn parse_symbols_clues() {
            let parsed = MyFormat::parse_clues("1313A2\n73117", ClueFormat::Symbols).unwrap();
            assert_eq!(parsed, vec![desc(&[1, 3, 1, 3, 10, 2]), desc(&[7, 3, 1, 1, 7])]);
        }

        #[test]
        fn zero_run_length_rejected() {
            assert!(MyFormat::parse_clues("1 0 2", ClueFormat::Counts).is_err());
        }

        #[test]
        fn garbage_count_rejected() {
            assert!(MyFormat::parse_clues("1 x", ClueFormat::Counts).is_err());
        }

        #[test]
        fn board_from_toml() {
            let s = r"
            [clues]
            rows = '1, 1'
            columns = '1, 1'
            ";

            let board = MyFormat::with_content(s).unwrap().parse().unwrap();
            assert_eq!(board.height(), 2);
            assert_eq!(board.width(), 2);
            assert_eq!(board.unsolved_count(), 4);
        }

        #[test]
        fn board_with_symbol_clues() {
            let s = r"
            [clues]
            format = 'symbols'
            rows = 'A'
            columns = '1, 1, 1, 1, 1, 1, 1, 1, 1, 1'
            ";

            let board = MyFormat::with_content(s).unwrap().parse().unwrap();
            assert_eq!(board.height(), 1);
            assert_eq!(board.width(), 10);
            assert_eq!(
                *board.description(crate::board::LinePosition::Row(0)),
                desc(&[10])
            );
        }

        #[test]
        fn board_with_hints() {
            let s = r#"
            [clues]
            rows = '1, 1'
            columns = '1, 1'

            [hints]
            cells = """
            X?
            ??
            """
            "#;

            let board = MyFormat::with_content(s).unwrap().parse().unwrap();
            assert_eq!(board.cell(Point::new(0, 0)), crate::block::Cell::Black);
            assert_eq!(board.unsolved_count(), 3);
        }

        #[test]
        fn ragged_hints_rejected() {
            let s = r#"
            [clues]
            rows = '1, 1'
            columns = '1, 1'

            [hints]
            cells = """
            X?
            ?
            """
            "#;

            assert!(MyFormat::with_content(s).unwrap().parse().is_err());
        }

        #[test]
        fn unknown_hint_symbol_rejected() {
            let s = r#"
            [clues]
            rows = '1, 1'
            columns = '1, 1'

            [hints]
            cells = """
            X?
            ?o
            """
            "#;

            assert!(MyFormat::with_content(s).unwrap().parse().is_err());
        }

        #[test]
        fn unknown_format_rejected() {
            let s = r"
            [clues]
            format = 'roman'
            rows = '1'
            columns = '1'
            ";

            assert!(MyFormat::with_content(s).unwrap().parse().is_err());
        }
    }

    #[cfg(feature = "xml")]
    mod webpbn {
        use crate::block::{Description, Run};
        use crate::parser::{BoardParser, WebPbn};

        fn desc(runs: &[usize]) -> Description {
            Description::new(runs.iter().map(|&x| Run(x)).collect())
        }

        const PUZZLE: &str = r#"<?xml version="1.0"?>
<puzzleset>
<puzzle type="grid" defaultcolor="black">
<color char="." name="white">fff</color>
<color char="X" name="black">000</color>
<clues type="columns">
<line><count>1</count></line>
<line><count>2</count></line>
<line/>
</clues>
<clues type="rows">
<line><count>2</count></line>
<line><count>1</count><count>1</count></line>
</clues>
</puzzle>
</puzzleset>"#;

        #[test]
        fn parse_clues_of_both_kinds() {
            let board = WebPbn::with_content(PUZZLE).unwrap().parse().unwrap();

            assert_eq!(board.height(), 2);
            assert_eq!(board.width(), 3);
            assert_eq!(
                *board.description(crate::board::LinePosition::Row(1)),
                desc(&[1, 1])
            );
            assert_eq!(
                *board.description(crate::board::LinePosition::Column(2)),
                Description::default()
            );
        }

        #[test]
        fn reject_colored_puzzle() {
            let colored = PUZZLE.replace(
                r#"<color char="X" name="black">000</color>"#,
                r#"<color char="X" name="black">000</color><color char="%" name="green">0c0</color>"#,
            );

            let parsed = WebPbn::with_content(&colored).unwrap().parse();
            assert!(parsed.is_err());
        }

        #[test]
        fn garbage_is_not_xml() {
            assert!(WebPbn::with_content("[clues]").is_err());
        }
    }
}
