use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::engine::{Puzzle, SliceStack, MAX_SLICES};
use crate::error::Result;
use crate::heuristics::{
    find_first_double_move, find_single_joining_move, ProposedMove, ScanDirection,
};
use crate::prng::{GaloisLfsr, DEFAULT_LFSR_SEED};

/// Configuration for the solver loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Scan order handed to `find_first_double_move`
    pub scan_direction: ScanDirection,
    /// Reverse the scan order after every double move
    pub alternate_scan: bool,
    /// Give up after this many flips
    pub max_moves: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            scan_direction: ScanDirection::Forward,
            alternate_scan: false,
            max_moves: 4 * MAX_SLICES as u32,
        }
    }
}

/// How a solve attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Every color forms a single run.
    Complete,
    /// Neither finder proposed a move on an incomplete stack. Indicates a defect.
    Stuck,
    /// `SolverConfig::max_moves` flips were applied without completing.
    MoveLimitReached,
}

/// Result of one solve attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    /// Flips applied during this attempt.
    pub moves: u32,
    pub initial_fragmentation: usize,
    pub final_fragmentation: usize,
}

impl SolveOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == SolveStatus::Complete
    }

    /// Whether the attempt used more than two flips per initial run.
    ///
    /// Each join removes a run and needs at most one double move to set it up, so a
    /// healthy solve stays within `2 * initial_fragmentation`. Exceeding it is a
    /// regression signal for the heuristics, not a failure of the solve.
    pub fn exceeds_move_budget(&self) -> bool {
        self.moves as usize > 2 * self.initial_fragmentation
    }
}

/// Which finder produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Join,
    Double,
}

/// One step of the solver: a joining move if there is one, else a double move.
pub fn next_move<P>(stack: &SliceStack<P>, scan: ScanDirection) -> Option<(MoveKind, ProposedMove)> {
    find_single_joining_move(stack)
        .map(|join| (MoveKind::Join, join))
        .or_else(|| find_first_double_move(stack, scan).map(|double| (MoveKind::Double, double)))
}

/// Drives a puzzle toward completion with the greedy finders.
///
/// Each step tries `find_single_joining_move` and falls back to
/// `find_first_double_move`, translates the proposal into a flip and applies it. The
/// loop ends when the stack is complete, when no move is found, or when the
/// configured move ceiling is hit. Moves already counted by the puzzle before the
/// call are not included in the outcome.
pub fn solve<P>(puzzle: &mut Puzzle<P>, config: &SolverConfig) -> SolveOutcome {
    let start_moves = puzzle.moves();
    let initial_fragmentation = puzzle.stack().fragmentation();
    let mut scan = config.scan_direction;
    let mut status = SolveStatus::Complete;

    while !puzzle.is_complete() {
        if puzzle.moves() - start_moves >= config.max_moves {
            warn!(
                max_moves = config.max_moves,
                stack = %puzzle.stack(),
                "move limit reached before completion"
            );
            status = SolveStatus::MoveLimitReached;
            break;
        }

        let proposal = match next_move(puzzle.stack(), scan) {
            Some((MoveKind::Join, join)) => join,
            Some((MoveKind::Double, double)) => {
                if config.alternate_scan {
                    scan = scan.reversed();
                }
                double
            }
            None => {
                warn!(stack = %puzzle.stack(), "no move found for an incomplete stack");
                status = SolveStatus::Stuck;
                break;
            }
        };

        match puzzle.apply_move(proposal) {
            Ok(flip) => trace!(
                index = flip.index,
                direction = ?flip.direction,
                stack = %puzzle.stack(),
                "applied flip"
            ),
            Err(err) => {
                warn!(%err, ?proposal, "finder proposed an invalid flip");
                status = SolveStatus::Stuck;
                break;
            }
        }
    }

    let outcome = SolveOutcome {
        status,
        moves: puzzle.moves() - start_moves,
        initial_fragmentation,
        final_fragmentation: puzzle.stack().fragmentation(),
    };
    debug!(
        status = ?outcome.status,
        moves = outcome.moves,
        initial_fragmentation,
        "solve finished"
    );
    outcome
}

/// Solves a stack in place. See `solve`.
pub fn solve_stack<P: Copy>(stack: &mut SliceStack<P>, config: &SolverConfig) -> SolveOutcome {
    let mut puzzle = Puzzle::new(*stack);
    let outcome = solve(&mut puzzle, config);
    *stack = puzzle.into_stack();
    outcome
}

/// Configuration for a batch of random solves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of stacks to generate
    pub stacks: usize,
    /// Slices per stack
    pub slices: usize,
    /// Colors per stack
    pub colors: usize,
    /// Seed for the generator shared by the whole batch
    pub seed: u32,
    pub solver: SolverConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            stacks: 1024,
            slices: MAX_SLICES,
            colors: 8,
            seed: DEFAULT_LFSR_SEED,
            solver: SolverConfig::default(),
        }
    }
}

/// A stack that needed more flips than `SolveOutcome::exceeds_move_budget` allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverBudget {
    /// Position of the stack in the batch
    pub index: usize,
    pub initial_fragmentation: usize,
    pub moves: u32,
}

/// Aggregate results of `run_batch`.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub stacks: usize,
    pub completed: usize,
    pub stuck: usize,
    pub move_limited: usize,
    pub total_moves: u64,
    pub total_initial_fragmentation: u64,
    pub over_budget: Vec<OverBudget>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn average_moves(&self) -> f64 {
        if self.stacks == 0 {
            0.0
        } else {
            self.total_moves as f64 / self.stacks as f64
        }
    }

    pub fn average_initial_fragmentation(&self) -> f64 {
        if self.stacks == 0 {
            0.0
        } else {
            self.total_initial_fragmentation as f64 / self.stacks as f64
        }
    }

    /// Whether every stack in the batch was solved.
    pub fn all_completed(&self) -> bool {
        self.completed == self.stacks
    }
}

/// Generates `config.stacks` random stacks from one seeded generator and solves each.
///
/// All stacks are generated before solving starts, so the colors depend only on the
/// seed and shape, never on the solver settings.
///
/// # Errors
/// Shape errors from `SliceStack::new_random` (too many slices, bad color count).
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport> {
    let mut rng = GaloisLfsr::new(config.seed);
    let stacks = (0..config.stacks)
        .map(|_| SliceStack::<()>::new_random(&mut rng, config.slices, config.colors))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        stacks = config.stacks,
        slices = config.slices,
        colors = config.colors,
        seed = config.seed,
        "starting batch solve"
    );

    let started = Instant::now();
    let mut report = BatchReport {
        stacks: stacks.len(),
        ..BatchReport::default()
    };

    for (index, stack) in stacks.into_iter().enumerate() {
        let mut puzzle = Puzzle::new(stack);
        let outcome = solve(&mut puzzle, &config.solver);

        report.total_moves += outcome.moves as u64;
        report.total_initial_fragmentation += outcome.initial_fragmentation as u64;
        match outcome.status {
            SolveStatus::Complete => report.completed += 1,
            SolveStatus::Stuck => report.stuck += 1,
            SolveStatus::MoveLimitReached => report.move_limited += 1,
        }
        if outcome.exceeds_move_budget() {
            report.over_budget.push(OverBudget {
                index,
                initial_fragmentation: outcome.initial_fragmentation,
                moves: outcome.moves,
            });
        }
    }
    report.elapsed = started.elapsed();

    debug!(
        completed = report.completed,
        total_moves = report.total_moves,
        over_budget = report.over_budget.len(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "batch solve finished"
    );
    Ok(report)
}
