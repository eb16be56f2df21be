//! Depth-first refinement of a board stuck at an ambiguous fixed point.

use log::{debug, info, warn};

use crate::{
    block::Cell,
    board::{Board, Point},
    solver::{
        line::LineSolver,
        propagation::{self, Status},
    },
    utils::rc::{MutRc, ReadRef},
};

/// How the search over ambiguous cells ended.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum SearchResult {
    /// some hypothesis chain completed the whole board
    Solved,
    /// one level of lookahead ran out of useful guesses
    Exhausted,
}

pub struct Solver {
    board: MutRc<Board>,
    depth_reached: usize,
}

impl Solver {
    pub fn new(board: MutRc<Board>) -> Self {
        Self {
            board,
            depth_reached: 0,
        }
    }

    fn board(&self) -> ReadRef<'_, Board> {
        self.board.read()
    }

    pub fn depth_reached(&self) -> usize {
        self.depth_reached
    }

    /// Search for a full solution, committing it to the shared board
    /// when one is found. The board is left untouched on exhaustion.
    pub fn run<S>(&mut self) -> SearchResult
    where
        S: LineSolver,
    {
        if self.board().is_solved_full() {
            return SearchResult::Solved;
        }

        warn!(
            "Starting depth-first search (initial rate is {:.4})",
            self.board().solution_rate()
        );

        let start = Board::clone(&self.board());
        let result = match self.search::<S>(&start, 0) {
            Some(solution) => {
                self.board.write().restore(solution.make_snapshot());
                SearchResult::Solved
            }
            None => SearchResult::Exhausted,
        };

        warn!(
            "Search completed (depth reached: {}, result: {:?})",
            self.depth_reached, result
        );
        result
    }

    /// Scan ambiguous cells in row-major order, probing both colors
    /// for each. A hypothesis that completes the board wins outright.
    /// When exactly one color survives propagation, the cell is forced
    /// and the search restarts from the top of that narrowed board.
    fn search<S>(&mut self, board: &Board, depth: usize) -> Option<Board>
    where
        S: LineSolver,
    {
        self.depth_reached = self.depth_reached.max(depth);

        for point in board.points() {
            if board.cell(point).is_known() {
                continue;
            }

            let (black_status, black_board) = Self::hypothesis::<S>(board, point, Cell::Black);
            if black_status == Status::Completed {
                info!("Guessing {} black completes the board", point);
                return Some(black_board);
            }

            let (white_status, white_board) = Self::hypothesis::<S>(board, point, Cell::White);
            if white_status == Status::Completed {
                info!("Guessing {} white completes the board", point);
                return Some(white_board);
            }

            let (color, branch) = match (black_status, white_status) {
                (Status::FinishedValid, Status::FinishedInvalid) => (Cell::Black, black_board),
                (Status::FinishedInvalid, Status::FinishedValid) => (Cell::White, white_board),
                _ => {
                    debug!(
                        "No verdict for {}: black leads to {:?}, white to {:?}",
                        point, black_status, white_status
                    );
                    continue;
                }
            };

            info!(
                "Forcing {} to {:?}: the opposite guess is contradictory",
                point, color
            );

            if let Some(solution) = self.search::<S>(&branch, depth + 1) {
                return Some(solution);
            }
            // the forced branch ran dry further down; other cells of
            // the current board may still yield a verdict
        }

        None
    }

    /// Assign one color to one cell on a private copy of the board and
    /// drive propagation to its fixed point.
    fn hypothesis<S>(board: &Board, point: Point, color: Cell) -> (Status, Board)
    where
        S: LineSolver,
    {
        let mut guess = board.clone();
        guess.set_cell(point, color);

        let guess = MutRc::new(guess);
        let status = propagation::Solver::new(MutRc::clone(&guess)).run::<S>();

        let settled = Board::clone(&guess.read());
        (status, settled)
    }
}

#[cfg(test)]
mod tests {
    use super::{SearchResult, Solver};
    use crate::block::{Cell, Description, Run};
    use crate::board::{Board, Point};
    use crate::solver::line::TraceSolver;
    use crate::solver::propagation::{self, Status};
    use crate::utils::rc::MutRc;

    fn descs(runs: &[&[usize]]) -> Vec<Description> {
        runs.iter()
            .map(|line| Description::new(line.iter().map(|&x| Run(x)).collect()))
            .collect()
    }

    fn propagate(board: &MutRc<Board>) -> Status {
        propagation::Solver::new(MutRc::clone(board)).run::<TraceSolver>()
    }

    const B: Cell = Cell::Black;
    const W: Cell = Cell::White;

    #[test]
    fn finds_the_branch_that_survives() {
        let rows = descs(&[&[1], &[1], &[1, 1], &[2]]);
        let columns = descs(&[&[1], &[2], &[1], &[1, 1]]);
        let board = MutRc::new(Board::with_descriptions(rows, columns));

        // every line admits several placements, so no cell is forced
        assert_eq!(propagate(&board), Status::FinishedValid);
        assert_eq!(board.read().unsolved_count(), 16);

        let mut solver = Solver::new(MutRc::clone(&board));
        assert_eq!(solver.run::<TraceSolver>(), SearchResult::Solved);
        // two whites are forced on the top row before the black guess
        // on the second row completes the grid
        assert_eq!(solver.depth_reached(), 2);

        #[rustfmt::skip]
        let expected = vec![
            W, W, W, B,
            B, W, W, W,
            W, B, W, B,
            W, B, B, W,
        ];
        assert_eq!(board.read().make_snapshot(), expected);
    }

    #[test]
    fn forces_black_when_white_contradicts() {
        // mirror image of the clues above: guessing the corner white
        // breaks two columns at once, so black is forced even though
        // it does not complete anything by itself
        let rows = descs(&[&[1], &[1], &[1, 1], &[2]]);
        let columns = descs(&[&[1, 1], &[1], &[2], &[1]]);
        let board = MutRc::new(Board::with_descriptions(rows, columns));

        assert_eq!(propagate(&board), Status::FinishedValid);

        let mut solver = Solver::new(MutRc::clone(&board));
        assert_eq!(solver.run::<TraceSolver>(), SearchResult::Solved);
        assert_eq!(solver.depth_reached(), 1);

        #[rustfmt::skip]
        let expected = vec![
            B, W, W, W,
            W, B, W, W,
            B, W, B, W,
            W, W, B, B,
        ];
        assert_eq!(board.read().make_snapshot(), expected);
    }

    #[test]
    fn two_solution_board_settles_on_one() {
        let clues = descs(&[&[3], &[1, 1], &[5], &[1, 1], &[3]]);
        let board = MutRc::new(Board::with_descriptions(clues.clone(), clues));

        assert_eq!(propagate(&board), Status::FinishedValid);

        let mut solver = Solver::new(MutRc::clone(&board));
        assert_eq!(solver.run::<TraceSolver>(), SearchResult::Solved);

        let board = board.read();
        assert!(board.is_solved_full());
        // the black guess on the top-left corner completes first
        assert_eq!(board.cell(Point::new(0, 0)), Cell::Black);
        for at in 0..5 {
            assert_eq!(board.cell(Point::new(at, 2)), Cell::Black);
            assert_eq!(board.cell(Point::new(2, at)), Cell::Black);
        }
    }

    #[test]
    fn permutation_grid_defeats_one_level_lookahead() {
        // rows and columns all [1]: every guess leaves both colors open
        let clues = descs(&[&[1], &[1], &[1]]);
        let board = MutRc::new(Board::with_descriptions(clues.clone(), clues));

        assert_eq!(propagate(&board), Status::FinishedValid);

        let mut solver = Solver::new(MutRc::clone(&board));
        assert_eq!(solver.run::<TraceSolver>(), SearchResult::Exhausted);

        // exhaustion leaves the shared board exactly as it was
        assert_eq!(solver.depth_reached(), 0);
        assert_eq!(board.read().unsolved_count(), 9);
    }

    #[test]
    fn solved_board_needs_no_guessing() {
        let rows = descs(&[&[1]]);
        let columns = descs(&[&[1]]);
        let board = MutRc::new(Board::with_descriptions(rows, columns));
        board.write().set_cell(Point::new(0, 0), Cell::Black);

        let mut solver = Solver::new(MutRc::clone(&board));
        assert_eq!(solver.run::<TraceSolver>(), SearchResult::Solved);
        assert_eq!(solver.depth_reached(), 0);
    }
}
