//! Error types for building and mutating slice stacks.

use thiserror::Error;

use crate::engine::{Color, MAX_COLORS, MAX_SLICES};

/// Error type for stack construction and checked moves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    /// More slices requested than the stack can hold
    #[error("stack holds at most {max} slices, got {0}", max = MAX_SLICES)]
    CapacityExceeded(usize),

    /// Color count outside 1..=MAX_COLORS
    #[error("color count must be between 1 and {max}, got {0}", max = MAX_COLORS)]
    InvalidColorCount(usize),

    /// A slice color not below the declared color count
    #[error("color {color} at position {position} is not below color count {color_count}")]
    ColorOutOfRange {
        position: usize,
        color: Color,
        color_count: usize,
    },

    /// Flip index outside the valid slices
    #[error("flip index {index} is out of range for a stack of {count} slices")]
    IndexOutOfRange { index: usize, count: usize },

    /// Textual stack could not be parsed
    #[error("invalid stack description: {0}")]
    Parse(String),
}

/// Result type alias for stack operations
pub type Result<T> = std::result::Result<T, StackError>;
