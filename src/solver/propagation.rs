use log::{debug, warn};

use crate::{
    block::{Cell, Line},
    board::{Board, LineDirection, LinePosition},
    cache::{cache_info, Cached, GrowableCache},
    solver::line::{self, LineSolver, UnsolvableLine},
    utils::rc::{MutRc, ReadRc, ReadRef},
};

/// Result of a full propagation pass over all rows and columns.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Status {
    /// at least one new cell was set, another pass may learn more
    NotFinished,
    /// every line is satisfiable but some cells remain unknown
    FinishedValid,
    /// some line has no placement consistent with the current cells
    FinishedInvalid,
    /// every cell is known and every line is satisfiable
    Completed,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    line_index: usize,
    source: ReadRc<Line>,
}

type CacheValue = Result<ReadRc<Line>, UnsolvableLine>;
type LineSolverCache = GrowableCache<CacheKey, CacheValue>;

const MAX_CACHE_ENTRIES_PER_LINE: usize = 2000;

fn new_cache(capacity: usize) -> LineSolverCache {
    GrowableCache::with_capacity(capacity)
}

pub struct Solver {
    board: MutRc<Board>,
    cache_rows: Option<LineSolverCache>,
    cache_cols: Option<LineSolverCache>,
    contradictions: usize,
}

impl Solver {
    pub fn new(board: MutRc<Board>) -> Self {
        Self {
            board,
            cache_rows: None,
            cache_cols: None,
            contradictions: 0,
        }
    }

    pub fn with_cache(board: MutRc<Board>) -> Self {
        let mut self_ = Self::new(board);

        self_.init_cache();
        self_
    }

    fn board(&self) -> ReadRef<'_, Board> {
        self.board.read()
    }

    fn init_cache(&mut self) {
        let width = self.board().width();
        let height = self.board().height();

        self.cache_rows = Some(new_cache(MAX_CACHE_ENTRIES_PER_LINE * height));
        self.cache_cols = Some(new_cache(MAX_CACHE_ENTRIES_PER_LINE * width));
    }

    fn cached_solution(&mut self, direction: LineDirection, key: &CacheKey) -> Option<CacheValue> {
        let cache = match direction {
            LineDirection::Row => self.cache_rows.as_mut(),
            LineDirection::Column => self.cache_cols.as_mut(),
        };

        cache.and_then(|cache| cache.cache_get(key).cloned())
    }

    fn set_cached_solution(&mut self, direction: LineDirection, key: CacheKey, solved: CacheValue) {
        let cache = match direction {
            LineDirection::Row => self.cache_rows.as_mut(),
            LineDirection::Column => self.cache_cols.as_mut(),
        };

        if let Some(cache) = cache {
            cache.cache_set(key, solved);
        }
    }

    fn print_cache_info(&self) {
        if let Some(cache) = &self.cache_cols {
            let (s, h, r) = cache_info(cache);
            warn!("Cache columns: Size={}, hits={}, hit rate={}.", s, h, r);
        }
        if let Some(cache) = &self.cache_rows {
            let (s, h, r) = cache_info(cache);
            warn!("Cache rows: Size={}, hits={}, hit rate={}.", s, h, r);
        }
    }

    /// Cells overwritten because a later verdict disagreed with them.
    pub fn contradictions(&self) -> usize {
        self.contradictions
    }

    /// Repeat passes until one of them stops making progress.
    pub fn run<S>(&mut self) -> Status
    where
        S: LineSolver,
    {
        let mut pass_number = 0_u32;
        loop {
            pass_number += 1;
            let status = self.pass::<S>();
            debug!(
                "Pass {}: {:?}. Solution rate: {}",
                pass_number,
                status,
                self.board().solution_rate()
            );

            if status != Status::NotFinished {
                return status;
            }
        }
    }

    /// Solve every row and column against the same snapshot of the
    /// board, then merge the verdicts: rows first, then columns.
    pub fn pass<S>(&mut self) -> Status
    where
        S: LineSolver,
    {
        let (height, width) = {
            let board = self.board();
            (board.height(), board.width())
        };

        let row_solutions: Vec<_> = (0..height)
            .map(|index| self.solve_line::<S>(LinePosition::Row(index)))
            .collect();
        let col_solutions: Vec<_> = (0..width)
            .map(|index| self.solve_line::<S>(LinePosition::Column(index)))
            .collect();

        let mut resolved = 0;
        let mut contradictions = 0;
        let mut invalid_lines = 0;

        {
            let mut board = self.board.write();

            let rows = row_solutions
                .iter()
                .enumerate()
                .map(|(index, solution)| (LinePosition::Row(index), solution));
            let columns = col_solutions
                .iter()
                .enumerate()
                .map(|(index, solution)| (LinePosition::Column(index), solution));

            for (position, solution) in rows.chain(columns) {
                match solution {
                    Ok(line) => Self::merge_solution(
                        &mut board,
                        position,
                        line,
                        &mut resolved,
                        &mut contradictions,
                    ),
                    Err(UnsolvableLine) => {
                        debug!("No valid placements for {}", position);
                        invalid_lines += 1;
                    }
                }
            }
        }

        self.contradictions += contradictions;

        let unsolved = self.board().unsolved_count();
        debug!(
            "Resolved {} cells, {} still unknown, {} unsatisfiable lines",
            resolved, unsolved, invalid_lines
        );

        if resolved > 0 {
            Status::NotFinished
        } else if invalid_lines > 0 {
            Status::FinishedInvalid
        } else if unsolved == 0 {
            Status::Completed
        } else {
            Status::FinishedValid
        }
    }

    fn merge_solution(
        board: &mut Board,
        position: LinePosition,
        solution: &[Cell],
        resolved: &mut usize,
        contradictions: &mut usize,
    ) {
        for (at, &value) in solution.iter().enumerate() {
            if !value.is_known() {
                continue;
            }

            let point = board.point_at(position, at);
            let current = board.cell(point);
            if current == value {
                continue;
            }

            if current.is_known() {
                // conflicting verdicts are diagnosed but not fatal;
                // the later write wins and the pass carries on
                warn!(
                    "Cell {} already resolved to {}; the {} verdict {} overrides it",
                    point, current, position, value
                );
                *contradictions += 1;
            } else {
                *resolved += 1;
            }

            board.set_cell(point, value);
        }
    }

    fn solve_line<S>(&mut self, position: LinePosition) -> CacheValue
    where
        S: LineSolver,
    {
        let (cache_key, line) = {
            let board = self.board();
            let line = ReadRc::new(board.get_line(position));
            let key = CacheKey {
                line_index: board.cache_index(position),
                source: ReadRc::clone(&line),
            };
            (key, line)
        };

        if let Some(cached) = self.cached_solution(position.direction(), &cache_key) {
            return cached;
        }

        let line_desc = self.board().description(position);
        debug!("Solving {}: {:?}. Partial: {:?}", position, line_desc, line);

        let value = line::solve::<S>(line_desc, ReadRc::clone(&line)).map(ReadRc::new);

        self.set_cached_solution(position.direction(), cache_key, value.clone());
        value
    }
}

impl Drop for Solver {
    fn drop(&mut self) {
        self.print_cache_info();
    }
}
