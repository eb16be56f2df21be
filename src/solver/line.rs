use smallvec::SmallVec;

use crate::block::{Cell, Description, Line};
use crate::utils::{self, rc::ReadRc};

/// No placement of the line's runs agrees with its current cells.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct UnsolvableLine;

pub trait LineSolver {
    fn new(desc: ReadRc<Description>, line: ReadRc<Line>) -> Self;
    fn solve(&mut self) -> Result<(), UnsolvableLine>;
    fn get_solution(self) -> Line;
}

pub fn solve<L>(desc: ReadRc<Description>, line: ReadRc<Line>) -> Result<Line, UnsolvableLine>
where
    L: LineSolver,
{
    let mut solver = L::new(desc, line);
    solver.solve()?;
    Ok(solver.get_solution())
}

/// Identity of a partial placement: the number of runs already consumed.
/// Traces reaching the same position with the same state are merged,
/// which keeps the live sets small without changing any cell verdict.
type TraceState = u16;

type LiveStates = SmallVec<[TraceState; 4]>;

/// Enumerates every run placement consistent with the known cells by
/// sweeping traces from the left edge, then intersects the placements
/// that can still be completed to decide each cell.
pub struct TraceSolver {
    desc: ReadRc<Description>,
    line: ReadRc<Line>,
    /// live trace states at every position `0..=len`
    live: Vec<LiveStates>,
    /// whether a (position, state) pair can still reach a complete
    /// placement; flat `(len + 1) x (runs + 1)`
    completable: Vec<bool>,
    job_size: usize,
    solved_line: Vec<Cell>,
}

impl LineSolver for TraceSolver {
    fn new(desc: ReadRc<Description>, line: ReadRc<Line>) -> Self {
        let job_size = desc.run_count() + 1;
        let live = vec![LiveStates::new(); line.len() + 1];
        let completable = vec![false; job_size * (line.len() + 1)];
        let solved_line = line.to_vec();

        Self {
            desc,
            line,
            live,
            completable,
            job_size,
            solved_line,
        }
    }

    fn solve(&mut self) -> Result<(), UnsolvableLine> {
        self.forward_sweep();
        if !self.has_complete_traces() {
            return Err(UnsolvableLine);
        }

        self.fill_completable();
        self.mark_realized();

        utils::replace(&mut self.solved_line, Cell::BlackOrWhite, Cell::Undefined);
        Ok(())
    }

    fn get_solution(self) -> Line {
        self.solved_line.into_boxed_slice()
    }
}

impl TraceSolver {
    /// Seed a single trace before the first cell and extend every live
    /// trace either with one white cell or with its next whole run.
    fn forward_sweep(&mut self) {
        Self::record(&mut self.live[0], 0);

        for position in 0..self.line.len() {
            if self.live[position].is_empty() {
                continue;
            }

            let white_ok = self.can_be_white(position);
            let states = self.live[position].clone();
            for &state in &states {
                if white_ok {
                    Self::record(&mut self.live[position + 1], state);
                }
                if let Some(next) = self.run_placement(position, state) {
                    Self::record(&mut self.live[next], state + 1);
                }
            }
        }
    }

    fn record(states: &mut LiveStates, state: TraceState) {
        if !states.contains(&state) {
            states.push(state);
        }
    }

    fn can_be_white(&self, position: usize) -> bool {
        self.line[position] != Cell::Black
    }

    fn run_len(&self, state: TraceState) -> usize {
        self.desc.vec[usize::from(state)].0
    }

    /// Where a trace lands after placing its next run at `position`
    /// (separator included), or `None` when the placement is illegal:
    /// the run must fit the line, must not cover a white cell and must
    /// not touch a black cell on either flank.
    fn run_placement(&self, position: usize, state: TraceState) -> Option<usize> {
        if usize::from(state) >= self.desc.run_count() {
            return None;
        }

        let end = position + self.run_len(state);
        if end > self.line.len() {
            return None;
        }

        if self.line[position..end]
            .iter()
            .any(|&cell| cell == Cell::White)
        {
            return None;
        }

        if position > 0 && self.line[position - 1] == Cell::Black {
            return None;
        }
        if end < self.line.len() && self.line[end] == Cell::Black {
            return None;
        }

        let last_run = usize::from(state) + 1 == self.desc.run_count();
        let next = if last_run { end } else { end + 1 };
        if next > self.line.len() {
            return None;
        }

        Some(next)
    }

    /// A trace is complete when it reaches the end of the line with
    /// every run consumed.
    fn has_complete_traces(&self) -> bool {
        let terminal = self.desc.run_count() as TraceState;
        self.live[self.line.len()].contains(&terminal)
    }

    fn completable_at(&self, position: usize, state: usize) -> bool {
        self.completable[position * self.job_size + state]
    }

    /// Backward reachability of the completed placement.
    fn fill_completable(&mut self) {
        let len = self.line.len();
        let runs = self.desc.run_count();
        self.completable[len * self.job_size + runs] = true;

        for position in (0..len).rev() {
            for state in 0..=runs {
                let mut reachable =
                    self.can_be_white(position) && self.completable_at(position + 1, state);

                if !reachable {
                    if let Some(next) = self.run_placement(position, state as TraceState) {
                        reachable = self.completable_at(next, state + 1);
                    }
                }

                if reachable {
                    self.completable[position * self.job_size + state] = true;
                }
            }
        }
    }

    /// Tag the cells of every step that belongs to at least one complete
    /// trace: forward-reachable and backward-completable.
    fn mark_realized(&mut self) {
        for position in 0..self.line.len() {
            let states = self.live[position].clone();
            for &state in &states {
                if self.can_be_white(position)
                    && self.completable_at(position + 1, usize::from(state))
                {
                    self.update_solved(position, Cell::White);
                }

                if let Some(next) = self.run_placement(position, state) {
                    if self.completable_at(next, usize::from(state) + 1) {
                        let run_end = position + self.run_len(state);
                        for cell in position..run_end {
                            self.update_solved(cell, Cell::Black);
                        }
                        if next > run_end {
                            // mandatory separator between runs
                            self.update_solved(run_end, Cell::White);
                        }
                    }
                }
            }
        }
    }

    fn update_solved(&mut self, position: usize, color: Cell) {
        let current = self.solved_line[position];
        self.solved_line[position] = current + color;
    }
}
