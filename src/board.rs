use std::fmt;

use crate::block::{Cell, Description, Line};
use crate::utils::rc::ReadRc;

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct Point {
    x: usize,
    y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> usize {
        self.x
    }

    pub fn y(self) -> usize {
        self.y
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum LineDirection {
    Row,
    Column,
}

/// Address of a single line on the board.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum LinePosition {
    Row(usize),
    Column(usize),
}

impl LinePosition {
    pub fn direction(self) -> LineDirection {
        match self {
            LinePosition::Row(_) => LineDirection::Row,
            LinePosition::Column(_) => LineDirection::Column,
        }
    }

    pub fn index(self) -> usize {
        match self {
            LinePosition::Row(index) | LinePosition::Column(index) => index,
        }
    }
}

impl fmt::Display for LinePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinePosition::Row(index) => write!(f, "row {}", index),
            LinePosition::Column(index) => write!(f, "column {}", index),
        }
    }
}

/// The initial cell grid does not fit the clue dimensions.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DimensionMismatch(pub String);

/// Tri-state cell grid with clue descriptions for every row and column.
#[derive(Debug, Clone)]
pub struct Board {
    cells: Vec<Cell>,
    desc_rows: Vec<ReadRc<Description>>,
    desc_cols: Vec<ReadRc<Description>>,
}

impl Board {
    pub fn with_descriptions(rows: Vec<Description>, columns: Vec<Description>) -> Self {
        let cells = vec![Cell::default(); rows.len() * columns.len()];

        Self {
            cells,
            desc_rows: rows.into_iter().map(ReadRc::new).collect(),
            desc_cols: columns.into_iter().map(ReadRc::new).collect(),
        }
    }

    /// Build a board with some cells already pinned to a color.
    /// The grid is given row-major and must match the clue dimensions.
    pub fn with_descriptions_and_cells(
        rows: Vec<Description>,
        columns: Vec<Description>,
        cells: Vec<Cell>,
    ) -> Result<Self, DimensionMismatch> {
        let expected = rows.len() * columns.len();
        if cells.len() != expected {
            return Err(DimensionMismatch(format!(
                "Initial grid has {} cells while the clues declare {}x{}",
                cells.len(),
                rows.len(),
                columns.len()
            )));
        }

        Ok(Self {
            cells,
            desc_rows: rows.into_iter().map(ReadRc::new).collect(),
            desc_cols: columns.into_iter().map(ReadRc::new).collect(),
        })
    }

    pub fn height(&self) -> usize {
        self.desc_rows.len()
    }

    pub fn width(&self) -> usize {
        self.desc_cols.len()
    }

    pub fn descriptions(&self, direction: LineDirection) -> &[ReadRc<Description>] {
        match direction {
            LineDirection::Row => &self.desc_rows,
            LineDirection::Column => &self.desc_cols,
        }
    }

    pub fn description(&self, position: LinePosition) -> ReadRc<Description> {
        let desc = match position {
            LinePosition::Row(index) => &self.desc_rows[index],
            LinePosition::Column(index) => &self.desc_cols[index],
        };
        ReadRc::clone(desc)
    }

    fn linear_index(&self, point: Point) -> usize {
        point.y() * self.width() + point.x()
    }

    pub fn cell(&self, point: Point) -> Cell {
        self.cells[self.linear_index(point)]
    }

    pub fn set_cell(&mut self, point: Point, value: Cell) {
        let index = self.linear_index(point);
        self.cells[index] = value;
    }

    pub fn get_row(&self, index: usize) -> Line {
        let width = self.width();
        let start = index * width;
        self.cells[start..start + width].to_vec().into_boxed_slice()
    }

    pub fn get_column(&self, index: usize) -> Line {
        (0..self.height())
            .map(|y| self.cells[y * self.width() + index])
            .collect::<Vec<_>>()
            .into_boxed_slice()
    }

    pub fn get_line(&self, position: LinePosition) -> Line {
        match position {
            LinePosition::Row(index) => self.get_row(index),
            LinePosition::Column(index) => self.get_column(index),
        }
    }

    /// Point of cell `at` inside the given line.
    pub fn point_at(&self, position: LinePosition, at: usize) -> Point {
        match position {
            LinePosition::Row(index) => Point::new(at, index),
            LinePosition::Column(index) => Point::new(index, at),
        }
    }

    /// Disambiguates rows and columns inside a single cache.
    pub fn cache_index(&self, position: LinePosition) -> usize {
        match position.direction() {
            LineDirection::Row => position.index(),
            LineDirection::Column => self.height() + position.index(),
        }
    }

    pub fn unsolved_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_known()).count()
    }

    pub fn is_solved_full(&self) -> bool {
        self.unsolved_count() == 0
    }

    pub fn solution_rate(&self) -> f64 {
        let total = self.cells.len();
        if total == 0 {
            return 1.0;
        }

        let solved = total - self.unsolved_count();
        solved as f64 / total as f64
    }

    pub fn make_snapshot(&self) -> Vec<Cell> {
        self.cells.clone()
    }

    pub fn restore(&mut self, cells: Vec<Cell>) {
        self.cells = cells;
    }

    /// Iterate all cell positions in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let width = self.width();
        let height = self.height();
        (0..height).flat_map(move |y| (0..width).map(move |x| Point::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Run;

    fn u_letter() -> Board {
        // X   X
        // X   X
        // X X X
        let rows = vec![
            Description::new(vec![Run(1), Run(1)]),
            Description::new(vec![Run(1), Run(1)]),
            Description::new(vec![Run(3)]),
        ];
        let columns = vec![
            Description::new(vec![Run(3)]),
            Description::new(vec![Run(1)]),
            Description::new(vec![Run(3)]),
        ];

        Board::with_descriptions(rows, columns)
    }

    #[test]
    fn starts_undefined() {
        let board = u_letter();
        assert_eq!(board.height(), 3);
        assert_eq!(board.width(), 3);
        assert_eq!(board.unsolved_count(), 9);
        assert_eq!(
            &*board.get_row(0),
            [Cell::Undefined, Cell::Undefined, Cell::Undefined]
        );
    }

    #[test]
    fn set_and_read_back() {
        let mut board = u_letter();
        board.set_cell(Point::new(2, 1), Cell::Black);

        assert_eq!(board.cell(Point::new(2, 1)), Cell::Black);
        assert_eq!(
            &*board.get_column(2),
            [Cell::Undefined, Cell::Black, Cell::Undefined]
        );
        assert_eq!(board.unsolved_count(), 8);
    }

    #[test]
    fn snapshot_and_restore() {
        let mut board = u_letter();
        let snapshot = board.make_snapshot();

        board.set_cell(Point::new(0, 0), Cell::White);
        assert_eq!(board.unsolved_count(), 8);

        board.restore(snapshot);
        assert_eq!(board.unsolved_count(), 9);
        assert_eq!(board.cell(Point::new(0, 0)), Cell::Undefined);
    }

    #[test]
    fn pinned_cells_must_fit() {
        let rows = vec![Description::new(vec![Run(1)])];
        let columns = vec![
            Description::new(vec![Run(1)]),
            Description::default(),
        ];

        let too_small = vec![Cell::Undefined];
        assert!(Board::with_descriptions_and_cells(rows, columns, too_small).is_err());
    }

    #[test]
    fn solution_rate_counts_known_cells() {
        let mut board = u_letter();
        assert!(board.solution_rate() < 1e-6);

        for x in 0..3 {
            board.set_cell(Point::new(x, 2), Cell::Black);
        }
        assert!((board.solution_rate() - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn row_major_scan_order() {
        let board = u_letter();
        let points: Vec<_> = board.points().take(4).collect();
        assert_eq!(
            points,
            [
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(0, 1)
            ]
        );
    }
}
