use std::fmt;
use std::ops::Add;

/// Single cell of a puzzle grid.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, PartialOrd, Ord)]
pub enum Cell {
    Undefined,
    White,
    Black,
    /// Transient marker for the line solver: valid placements disagree
    /// on this cell. It never appears on a board.
    BlackOrWhite,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Undefined
    }
}

impl Cell {
    pub fn is_known(self) -> bool {
        self == Cell::White || self == Cell::Black
    }

    fn symbol(self) -> char {
        match self {
            Cell::White => '.',
            Cell::Black => '\u{2b1b}',
            Cell::Undefined | Cell::BlackOrWhite => '?',
        }
    }
}

impl Add for Cell {
    type Output = Self;

    /// Merge another placement verdict into this one.
    fn add(self, rhs: Self) -> Self {
        match self {
            Cell::Undefined => rhs,
            value if value == rhs => value,
            _ => Cell::BlackOrWhite,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One line of cells (a row or a column).
pub type Line = Box<[Cell]>;

/// Single run of consecutive black cells.
#[derive(Debug, PartialEq, Eq, Hash, Default, Copy, Clone, PartialOrd, Ord)]
pub struct Run(pub usize);

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The run length cannot appear in a puzzle:
/// zero, negative or not expressible in the symbol alphabet.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct InvalidRun(pub String);

/// Ordered clue runs of a single line.
#[derive(Debug, PartialEq, Eq, Hash, Default, Clone)]
pub struct Description {
    pub vec: Vec<Run>,
}

impl Description {
    pub fn new(vec: Vec<Run>) -> Self {
        Self { vec }
    }

    /// Build a description from plain counts, rejecting non-positive ones.
    pub fn from_counts<I>(counts: I) -> Result<Self, InvalidRun>
    where
        I: IntoIterator<Item = i64>,
    {
        let vec: Vec<_> = counts
            .into_iter()
            .map(|count| {
                if count <= 0 {
                    Err(InvalidRun(format!(
                        "Run length is zero or negative: {}",
                        count
                    )))
                } else {
                    Ok(Run(count as usize))
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self::new(vec))
    }

    /// Parse the compact form: one symbol per run.
    /// Digits `1..=9` are literal, `A` is 10, `B` is 11 and so on up
    /// the ASCII range. Lowercase letters are accepted as well.
    pub fn from_symbols(s: &str) -> Result<Self, InvalidRun> {
        let vec: Vec<_> = s
            .trim()
            .chars()
            .map(run_from_symbol)
            .collect::<Result<_, _>>()?;

        Ok(Self::new(vec))
    }

    /// Render the description back into the compact symbol form.
    pub fn to_symbols(&self) -> Result<String, InvalidRun> {
        self.vec.iter().map(|run| run_symbol(run.0)).collect()
    }

    pub fn run_count(&self) -> usize {
        self.vec.len()
    }
}

fn run_from_symbol(symbol: char) -> Result<Run, InvalidRun> {
    if let Some(digit) = symbol.to_digit(10) {
        if digit == 0 {
            return Err(InvalidRun(format!(
                "Run length is zero or negative: {:?}",
                symbol
            )));
        }
        return Ok(Run(digit as usize));
    }

    let symbol = symbol.to_ascii_uppercase();
    if !symbol.is_ascii() || symbol < 'A' {
        return Err(InvalidRun(format!("Bad run symbol: {:?}", symbol)));
    }

    Ok(Run(symbol as usize - 'A' as usize + 10))
}

fn run_symbol(len: usize) -> Result<char, InvalidRun> {
    match len {
        0 => Err(InvalidRun("Run length is zero or negative: 0".to_string())),
        1..=9 => Ok(char::from(b'0' + len as u8)),
        _ => {
            let code = len - 10 + usize::from(b'A');
            if code > usize::from(b'~') {
                return Err(InvalidRun(format!("Run length has no symbol: {}", len)));
            }
            Ok(char::from(code as u8))
        }
    }
}
