use crate::{
    block::{Cell, Description},
    board::{Board, LineDirection},
    utils::rc::{MutRc, ReadRc, ReadRef},
};

pub trait Renderer {
    fn with_board(board: MutRc<Board>) -> Self;
    fn render(&self) -> String;
}

/// Draws the board as a character grid with the clue numbers
/// along the top and left edges.
pub struct ShellRenderer {
    board: MutRc<Board>,
}

impl Renderer for ShellRenderer {
    fn with_board(board: MutRc<Board>) -> Self {
        Self { board }
    }

    fn render(&self) -> String {
        let side = Self::clue_matrix(self.board().descriptions(LineDirection::Row));
        let side_width = side.first().map_or(0, Vec::len);

        let mut lines = self.header_lines();
        for header in &mut lines {
            let mut full = vec!["#".to_string(); side_width];
            full.append(header);
            *header = full;
        }

        lines.extend(
            side.into_iter()
                .zip(self.grid_lines())
                .map(|(mut clues, row)| {
                    clues.extend(row);
                    clues
                }),
        );

        let lines: Vec<String> = lines
            .iter()
            .map(|line| {
                line.iter()
                    .map(|symbol| format!("{:<2}", symbol))
                    .collect()
            })
            .collect();
        lines.join("\n")
    }
}

impl ShellRenderer {
    fn board(&self) -> ReadRef<'_, Board> {
        self.board.read()
    }

    /// Clue runs as strings, front-padded with blanks to a uniform depth
    /// so they align to the grid edge.
    fn clue_matrix(descriptions: &[ReadRc<Description>]) -> Vec<Vec<String>> {
        let depth = descriptions
            .iter()
            .map(|desc| desc.vec.len())
            .max()
            .unwrap_or(0);

        descriptions
            .iter()
            .map(|desc| {
                let mut clue = vec![" ".to_string(); depth - desc.vec.len()];
                clue.extend(desc.vec.iter().map(ToString::to_string));
                clue
            })
            .collect()
    }

    /// Column clues written top-down: the transposed clue matrix.
    fn header_lines(&self) -> Vec<Vec<String>> {
        let columns = Self::clue_matrix(self.board().descriptions(LineDirection::Column));
        let depth = columns.first().map_or(0, Vec::len);

        (0..depth)
            .map(|level| columns.iter().map(|clue| clue[level].clone()).collect())
            .collect()
    }

    fn grid_lines(&self) -> Vec<Vec<String>> {
        let board = self.board();
        (0..board.height())
            .map(|index| {
                board
                    .get_row(index)
                    .iter()
                    .map(|&cell| Self::cell_symbol(cell))
                    .collect()
            })
            .collect()
    }

    #[cfg(not(feature = "colors"))]
    fn cell_symbol(cell: Cell) -> String {
        cell.to_string()
    }

    /// Paint the not-yet-solved cells so they stand out between passes.
    /// The symbol is padded before painting to keep columns aligned.
    #[cfg(feature = "colors")]
    fn cell_symbol(cell: Cell) -> String {
        use colored::Colorize;

        let symbol = format!("{:<2}", cell);
        match cell {
            Cell::Undefined => symbol.yellow().to_string(),
            Cell::White => symbol.dimmed().to_string(),
            _ => symbol,
        }
    }
}
