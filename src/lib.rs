//! # Slice Sort Library
//!
//! This library provides the engine for a single-pile color-sorting puzzle: a
//! fixed-capacity stack of colored slices rearranged only by end-anchored reversals
//! ("flips") until every color occupies one contiguous run.
//!
//! It is used by two binaries:
//! - `batch_solver`: generates a large batch of random stacks, solves them with the
//!   greedy solver loop and reports move statistics.
//! - `stack_solver`: solves a single stack given on the command line, printing every flip.
//!
//! ## Modules
//! - `engine`: the stack (`SliceStack`), its slices, metrics and the flip, plus the
//!   `Puzzle` session that counts moves.
//! - `heuristics`: the greedy move finders (joining move and double move).
//! - `solver`: the reference solver loop and the batch runner.
//! - `prng`: the deterministic generators used to create random stacks.
//! - `utils`: parsing stacks from their textual form.
//! - `error`: the crate's error type.

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod prng;
pub mod solver;
pub mod utils;

pub use engine::{Color, Flip, FlipDirection, Puzzle, Slice, SliceStack, MAX_COLORS, MAX_SLICES};
pub use error::StackError;
pub use heuristics::{
    find_first_double_move, find_single_joining_move, MoveSide, ProposedMove, ScanDirection,
};
pub use prng::{GaloisLfsr, SplitMix64};
pub use solver::{
    next_move, run_batch, solve, solve_stack, BatchConfig, BatchReport, MoveKind, SolveOutcome,
    SolveStatus, SolverConfig,
};
