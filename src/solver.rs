pub mod backtracking;
pub mod line;
pub mod propagation;

use log::warn;

use self::{backtracking::SearchResult, line::LineSolver, propagation::Status};
use crate::{board::Board, utils::rc::MutRc};

/// Terminal outcome of a whole solve.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Outcome {
    Solved,
    /// the board is satisfiable but one-level lookahead cannot finish it
    NoSolutionFound,
}

/// The clues and pinned cells contradict each other before any guessing.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct UnsolvableInitialState;

/// Drive propagation to a fixed point, then fall back to backtracking
/// over whatever cells remain ambiguous.
pub fn run<S>(board: &MutRc<Board>) -> Result<Outcome, UnsolvableInitialState>
where
    S: LineSolver,
{
    let start = crate::utils::time::now();

    warn!("Solving with line propagation");
    let mut solver = propagation::Solver::with_cache(MutRc::clone(board));
    let status = solver.run::<S>();
    drop(solver);

    if status == Status::FinishedInvalid {
        return Err(UnsolvableInitialState);
    }

    let outcome = if status == Status::Completed {
        Outcome::Solved
    } else {
        warn!("Trying to solve with backtracking");
        let mut search = backtracking::Solver::new(MutRc::clone(board));
        match search.run::<S>() {
            SearchResult::Solved => Outcome::Solved,
            SearchResult::Exhausted => Outcome::NoSolutionFound,
        }
    };

    if let Some(start) = start {
        let total = start.elapsed();
        warn!(
            "Full solution: {}.{:06} sec. The rate is {:.4}",
            total.as_secs(),
            total.subsec_micros(),
            board.read().solution_rate(),
        );
    }

    Ok(outcome)
}
