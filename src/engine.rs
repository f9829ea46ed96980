//! Core state for the slice-sorting puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Slice`: one colored unit of the pile, carrying an opaque caller payload.
//! - `SliceStack`: the fixed-capacity pile, its metrics (fragmentation and completeness)
//!   and the flip, the only operation that reorders it.
//! - `Puzzle`: a play session around a stack that counts the flips applied to it.
use std::fmt;

use crate::error::{Result, StackError};
use crate::heuristics::ProposedMove;
use crate::prng::GaloisLfsr;

/// Maximum number of slices a stack can hold.
pub const MAX_SLICES: usize = 16;

/// Maximum number of colors. Completeness tracks seen colors as bits of a `u32`.
pub const MAX_COLORS: usize = 32;

/// Color class of a slice, always below the stack's color count.
pub type Color = u8;

/// One unit of the pile.
///
/// `payload` belongs to the caller (typically an index into a rendering table). The
/// engine moves it along with `color` when flipping and never looks at it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Slice<P = ()> {
    pub color: Color,
    pub payload: P,
}

/// Which end of the pile a flip is anchored to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlipDirection {
    /// Reverse positions `0..=index`.
    TowardFront,
    /// Reverse positions `index..count`.
    TowardBack,
}

impl FlipDirection {
    /// Maps the signed convention: positive flips toward the back, anything else
    /// toward the front.
    pub fn from_sign(direction: i32) -> Self {
        if direction > 0 {
            FlipDirection::TowardBack
        } else {
            FlipDirection::TowardFront
        }
    }

    /// `-1` for `TowardFront`, `1` for `TowardBack`.
    pub fn sign(self) -> i32 {
        match self {
            FlipDirection::TowardFront => -1,
            FlipDirection::TowardBack => 1,
        }
    }
}

/// A flip to apply: the anchor index and the end it reaches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Flip {
    pub index: usize,
    pub direction: FlipDirection,
}

/// The puzzle pile: up to `MAX_SLICES` colored slices stored inline.
///
/// Only the first `count` entries are meaningful. The whole stack is a small `Copy`
/// value when the payload is `Copy`, so solver code can cheaply snapshot it.
#[derive(Clone, Copy, Debug)]
pub struct SliceStack<P = ()> {
    count: usize,
    color_count: usize,
    slices: [Slice<P>; MAX_SLICES],
}

fn check_shape(count: usize, color_count: usize) -> Result<()> {
    if count > MAX_SLICES {
        return Err(StackError::CapacityExceeded(count));
    }
    if color_count == 0 || color_count > MAX_COLORS {
        return Err(StackError::InvalidColorCount(color_count));
    }
    Ok(())
}

impl<P: Copy + Default> SliceStack<P> {
    /// Creates a stack of `count` slices with colors drawn from `rng`.
    ///
    /// Each color comes from `GaloisLfsr::next_in_range(0, color_count - 1)`, so every
    /// color is below `color_count` (a color may still be missing entirely). Slice
    /// order is whatever the draws produce; payloads are `P::default()`.
    ///
    /// # Errors
    /// `CapacityExceeded` if `count > MAX_SLICES`, `InvalidColorCount` if
    /// `color_count` is zero or above `MAX_COLORS`.
    ///
    /// # Examples
    /// ```
    /// use slice_sort::engine::SliceStack;
    /// use slice_sort::prng::GaloisLfsr;
    ///
    /// let mut rng = GaloisLfsr::new(1234);
    /// let stack: SliceStack = SliceStack::new_random(&mut rng, 16, 8).unwrap();
    /// assert_eq!(stack.count(), 16);
    /// assert!(stack.colors().all(|c| c < 8));
    /// ```
    pub fn new_random(rng: &mut GaloisLfsr, count: usize, color_count: usize) -> Result<Self> {
        check_shape(count, color_count)?;
        let mut slices = [Slice::default(); MAX_SLICES];
        let top = color_count as i32 - 1;
        for slice in slices.iter_mut().take(count) {
            slice.color = rng.next_in_range(0, top) as Color;
        }
        Ok(SliceStack {
            count,
            color_count,
            slices,
        })
    }

    /// Creates a stack holding exactly `colors`, front first.
    ///
    /// # Errors
    /// Same shape errors as `new_random`, plus `ColorOutOfRange` for the first color
    /// that is not below `color_count`.
    pub fn from_colors(colors: &[Color], color_count: usize) -> Result<Self> {
        check_shape(colors.len(), color_count)?;
        let mut slices = [Slice::default(); MAX_SLICES];
        for (position, (slice, &color)) in slices.iter_mut().zip(colors).enumerate() {
            if color as usize >= color_count {
                return Err(StackError::ColorOutOfRange {
                    position,
                    color,
                    color_count,
                });
            }
            slice.color = color;
        }
        Ok(SliceStack {
            count: colors.len(),
            color_count,
            slices,
        })
    }
}

impl<P> SliceStack<P> {
    /// Number of valid slices.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of colors the stack was declared with.
    pub fn color_count(&self) -> usize {
        self.color_count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The valid slices, front first.
    pub fn slices(&self) -> &[Slice<P>] {
        &self.slices[..self.count]
    }

    /// Color at `index`.
    ///
    /// # Panics
    /// Panics if `index >= count`.
    pub fn color(&self, index: usize) -> Color {
        self.slices()[index].color
    }

    /// Colors of the valid slices, front first.
    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.slices().iter().map(|s| s.color)
    }

    /// Payload at `index`.
    ///
    /// # Panics
    /// Panics if `index >= count`.
    pub fn payload(&self, index: usize) -> &P {
        &self.slices()[index].payload
    }

    /// Replaces the payload at `index`. Colors are untouched.
    ///
    /// # Panics
    /// Panics if `index >= count`.
    pub fn set_payload(&mut self, index: usize, payload: P) {
        let count = self.count;
        self.slices[..count][index].payload = payload;
    }

    /// Reverses an end-anchored run of slices in place. Color and payload move together.
    ///
    /// - `TowardBack` reverses `index..count`.
    /// - `TowardFront` reverses `0..=index`.
    ///
    /// Reversing the same range twice restores the original order.
    ///
    /// # Panics
    /// Panics if `index >= count`. Use `Puzzle::apply_flip` for a checked flip.
    ///
    /// # Examples
    /// ```
    /// use slice_sort::engine::{FlipDirection, SliceStack};
    ///
    /// let mut stack: SliceStack = SliceStack::from_colors(&[0, 1, 2, 3], 4).unwrap();
    /// stack.flip(1, FlipDirection::TowardBack);
    /// assert_eq!(stack.colors().collect::<Vec<_>>(), vec![0, 3, 2, 1]);
    /// stack.flip(1, FlipDirection::TowardFront);
    /// assert_eq!(stack.colors().collect::<Vec<_>>(), vec![3, 0, 2, 1]);
    /// ```
    pub fn flip(&mut self, index: usize, direction: FlipDirection) {
        assert!(
            index < self.count,
            "flip index {} out of range for {} slices",
            index,
            self.count
        );
        match direction {
            FlipDirection::TowardBack => self.slices[index..self.count].reverse(),
            FlipDirection::TowardFront => self.slices[..=index].reverse(),
        }
    }

    /// Number of maximal runs of equal color; `0` for an empty stack.
    pub fn fragmentation(&self) -> usize {
        if self.count == 0 {
            return 0;
        }
        1 + self
            .slices()
            .windows(2)
            .filter(|pair| pair[0].color != pair[1].color)
            .count()
    }

    /// Whether every color present forms exactly one contiguous run.
    ///
    /// This is the authoritative "solved" test. It does not consult `color_count`.
    pub fn is_complete(&self) -> bool {
        let mut seen: u32 = 0;
        let mut last: Option<Color> = None;
        for color in self.colors() {
            let flag = 1u32 << color;
            if seen & flag != 0 && last != Some(color) {
                return false;
            }
            seen |= flag;
            last = Some(color);
        }
        true
    }

    /// Cheap completeness filter: `fragmentation() <= color_count()`.
    ///
    /// Agrees with `is_complete` only when every declared color is present. When a
    /// color is missing (random creation can skip one) this may report `true` for a
    /// stack that is not complete, so never use it as the final answer.
    pub fn is_complete_approx(&self) -> bool {
        self.fragmentation() <= self.color_count
    }

    /// Number of distinct colors actually present.
    pub fn distinct_colors(&self) -> usize {
        self.colors()
            .fold(0u32, |mask, color| mask | (1u32 << color))
            .count_ones() as usize
    }

    /// Formats the colors space separated, wrapping the slice at `marker` (if any) in
    /// brackets. Used to show where a flip is anchored.
    pub fn to_string_with_marker(&self, marker: Option<usize>) -> String {
        self.colors()
            .enumerate()
            .map(|(i, color)| {
                if marker == Some(i) {
                    format!("[{}]", color)
                } else {
                    color.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<P: PartialEq> PartialEq for SliceStack<P> {
    fn eq(&self, other: &Self) -> bool {
        self.color_count == other.color_count && self.slices() == other.slices()
    }
}

impl<P: Eq> Eq for SliceStack<P> {}

impl<P> fmt::Display for SliceStack<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_marker(None))
    }
}

/// A play session: a stack plus the number of flips applied so far.
///
/// Only the count is kept; there is no history to undo.
///
/// # Examples
/// ```
/// use slice_sort::engine::{FlipDirection, Puzzle, SliceStack};
///
/// let stack: SliceStack = SliceStack::from_colors(&[0, 1, 0, 1], 2).unwrap();
/// let mut puzzle = Puzzle::new(stack);
/// puzzle.apply_flip(1, FlipDirection::TowardFront).unwrap();
/// assert_eq!(puzzle.moves(), 1);
/// assert!(puzzle.apply_flip(4, FlipDirection::TowardBack).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Puzzle<P = ()> {
    stack: SliceStack<P>,
    moves: u32,
    initial_fragmentation: usize,
}

impl<P> Puzzle<P> {
    pub fn new(stack: SliceStack<P>) -> Self {
        let initial_fragmentation = stack.fragmentation();
        Puzzle {
            stack,
            moves: 0,
            initial_fragmentation,
        }
    }

    pub fn stack(&self) -> &SliceStack<P> {
        &self.stack
    }

    pub fn into_stack(self) -> SliceStack<P> {
        self.stack
    }

    /// Flips applied since the session started.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Fragmentation of the stack the session started with.
    pub fn initial_fragmentation(&self) -> usize {
        self.initial_fragmentation
    }

    pub fn is_complete(&self) -> bool {
        self.stack.is_complete()
    }

    /// Applies a flip after checking the index, counting it as one move.
    ///
    /// # Errors
    /// `IndexOutOfRange` if `index >= count`; the stack is left unchanged.
    pub fn apply_flip(&mut self, index: usize, direction: FlipDirection) -> Result<()> {
        if index >= self.stack.count() {
            return Err(StackError::IndexOutOfRange {
                index,
                count: self.stack.count(),
            });
        }
        self.stack.flip(index, direction);
        self.moves += 1;
        Ok(())
    }

    /// Translates a move-finder proposal into a flip and applies it.
    pub fn apply_move(&mut self, proposal: ProposedMove) -> Result<Flip> {
        let flip = proposal.to_flip();
        self.apply_flip(flip.index, flip.direction)?;
        Ok(flip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::stack_from_str;

    fn colors_of<P>(stack: &SliceStack<P>) -> Vec<Color> {
        stack.colors().collect()
    }

    #[test]
    fn test_new_random_shape_and_bounds() {
        let mut rng = GaloisLfsr::new(77);
        let stack: SliceStack = SliceStack::new_random(&mut rng, 16, 8).unwrap();
        assert_eq!(stack.count(), 16);
        assert_eq!(stack.color_count(), 8);
        assert!(stack.colors().all(|c| c < 8));
    }

    #[test]
    fn test_new_random_small_stack() {
        let mut rng = GaloisLfsr::default();
        let stack: SliceStack = SliceStack::new_random(&mut rng, 4, 2).unwrap();
        assert_eq!(stack.count(), 4);
        assert_eq!(stack.color_count(), 2);
    }

    #[test]
    fn test_new_random_single_color() {
        let mut rng = GaloisLfsr::new(3);
        let stack: SliceStack = SliceStack::new_random(&mut rng, 10, 1).unwrap();
        assert!(stack.colors().all(|c| c == 0));
        assert!(stack.is_complete());
    }

    #[test]
    fn test_new_random_determinism() {
        let a: SliceStack = SliceStack::new_random(&mut GaloisLfsr::new(12345), 16, 8).unwrap();
        let b: SliceStack = SliceStack::new_random(&mut GaloisLfsr::new(12345), 16, 8).unwrap();
        let c: SliceStack = SliceStack::new_random(&mut GaloisLfsr::new(54321), 16, 8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_new_random_rejects_bad_shape() {
        let mut rng = GaloisLfsr::default();
        assert_eq!(
            SliceStack::<()>::new_random(&mut rng, MAX_SLICES + 1, 4).unwrap_err(),
            StackError::CapacityExceeded(MAX_SLICES + 1)
        );
        assert_eq!(
            SliceStack::<()>::new_random(&mut rng, 4, 0).unwrap_err(),
            StackError::InvalidColorCount(0)
        );
        assert_eq!(
            SliceStack::<()>::new_random(&mut rng, 4, MAX_COLORS + 1).unwrap_err(),
            StackError::InvalidColorCount(MAX_COLORS + 1)
        );
    }

    #[test]
    fn test_from_colors_rejects_out_of_range_color() {
        let err = SliceStack::<()>::from_colors(&[0, 1, 3], 3).unwrap_err();
        assert_eq!(
            err,
            StackError::ColorOutOfRange {
                position: 2,
                color: 3,
                color_count: 3
            }
        );
    }

    #[test]
    fn test_flip_toward_back() {
        let mut stack = stack_from_str("0 1 2 3 4", 5).unwrap();
        stack.flip(2, FlipDirection::TowardBack);
        assert_eq!(colors_of(&stack), vec![0, 1, 4, 3, 2]);
        stack.flip(0, FlipDirection::TowardBack);
        assert_eq!(colors_of(&stack), vec![2, 3, 4, 1, 0]);
        stack.flip(4, FlipDirection::TowardBack);
        assert_eq!(colors_of(&stack), vec![2, 3, 4, 1, 0]);
    }

    #[test]
    fn test_flip_toward_front() {
        let mut stack = stack_from_str("0 1 2 3 4", 5).unwrap();
        stack.flip(2, FlipDirection::TowardFront);
        assert_eq!(colors_of(&stack), vec![2, 1, 0, 3, 4]);
        stack.flip(0, FlipDirection::TowardFront);
        assert_eq!(colors_of(&stack), vec![2, 1, 0, 3, 4]);
        stack.flip(3, FlipDirection::TowardFront);
        assert_eq!(colors_of(&stack), vec![3, 0, 1, 2, 4]);
    }

    #[test]
    fn test_flip_moves_payload_with_color() {
        let mut stack: SliceStack<u16> = SliceStack::from_colors(&[0, 1, 2], 3).unwrap();
        for i in 0..3 {
            stack.set_payload(i, 100 + i as u16);
        }
        stack.flip(0, FlipDirection::TowardBack);
        assert_eq!(colors_of(&stack), vec![2, 1, 0]);
        assert_eq!(*stack.payload(0), 102);
        assert_eq!(*stack.payload(1), 101);
        assert_eq!(*stack.payload(2), 100);
    }

    #[test]
    fn test_flip_is_an_involution() {
        let original = stack_from_str("3 1 4 1 5 0 2 6", 7).unwrap();
        for index in 0..original.count() {
            for direction in [FlipDirection::TowardFront, FlipDirection::TowardBack] {
                let mut stack = original;
                stack.flip(index, direction);
                stack.flip(index, direction);
                assert_eq!(stack, original, "index {} {:?}", index, direction);
            }
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_flip_panics_past_count() {
        let mut stack = stack_from_str("0 1", 2).unwrap();
        stack.flip(2, FlipDirection::TowardBack);
    }

    #[test]
    fn test_flip_direction_from_sign() {
        assert_eq!(FlipDirection::from_sign(1), FlipDirection::TowardBack);
        assert_eq!(FlipDirection::from_sign(0), FlipDirection::TowardFront);
        assert_eq!(FlipDirection::from_sign(-1), FlipDirection::TowardFront);
        assert_eq!(FlipDirection::TowardFront.sign(), -1);
        assert_eq!(FlipDirection::TowardBack.sign(), 1);
    }

    #[test]
    fn test_fragmentation() {
        assert_eq!(stack_from_str("0 2 1 1", 3).unwrap().fragmentation(), 3);
        assert_eq!(stack_from_str("0 1 0 1", 2).unwrap().fragmentation(), 4);
        assert_eq!(stack_from_str("0 0 1 1", 2).unwrap().fragmentation(), 2);
        assert_eq!(stack_from_str("1", 2).unwrap().fragmentation(), 1);
        assert_eq!(stack_from_str("", 2).unwrap().fragmentation(), 0);
    }

    #[test]
    fn test_is_complete() {
        let solved = stack_from_str("0 2 1 1", 3).unwrap();
        assert!(solved.is_complete());
        assert!(solved.is_complete_approx());

        let unsolved = stack_from_str("1 0 2 1", 3).unwrap();
        assert!(!unsolved.is_complete());
        assert!(!unsolved.is_complete_approx());

        assert!(stack_from_str("", 1).unwrap().is_complete());
        assert!(!stack_from_str("0 1 0 1", 2).unwrap().is_complete());
        assert!(stack_from_str("0 0 1 1", 2).unwrap().is_complete());
    }

    #[test]
    fn test_is_complete_approx_diverges_when_color_missing() {
        // Declared three colors, only two present: three runs pass the filter.
        let stack = stack_from_str("0 1 0", 3).unwrap();
        assert_eq!(stack.distinct_colors(), 2);
        assert!(stack.is_complete_approx());
        assert!(!stack.is_complete());
    }

    #[test]
    fn test_is_complete_uses_high_colors() {
        let stack = stack_from_str("31 31 0 31", 32).unwrap();
        assert!(!stack.is_complete());
        let stack = stack_from_str("31 31 0 0", 32).unwrap();
        assert!(stack.is_complete());
    }

    #[test]
    fn test_display_and_marker() {
        let stack = stack_from_str("0 1 2", 3).unwrap();
        assert_eq!(stack.to_string(), "0 1 2");
        assert_eq!(stack.to_string_with_marker(Some(1)), "0 [1] 2");
    }

    #[test]
    fn test_puzzle_counts_moves() {
        let mut puzzle = Puzzle::new(stack_from_str("0 1 0 1", 2).unwrap());
        assert_eq!(puzzle.initial_fragmentation(), 4);
        assert_eq!(puzzle.moves(), 0);
        puzzle.apply_flip(1, FlipDirection::TowardFront).unwrap();
        assert_eq!(colors_of(puzzle.stack()), vec![1, 0, 0, 1]);
        assert_eq!(puzzle.moves(), 1);
        assert_eq!(puzzle.initial_fragmentation(), 4);
    }

    #[test]
    fn test_puzzle_rejects_out_of_range_flip() {
        let mut puzzle = Puzzle::new(stack_from_str("0 1 0", 2).unwrap());
        let err = puzzle.apply_flip(3, FlipDirection::TowardBack).unwrap_err();
        assert_eq!(err, StackError::IndexOutOfRange { index: 3, count: 3 });
        assert_eq!(puzzle.moves(), 0);
        assert_eq!(colors_of(puzzle.stack()), vec![0, 1, 0]);
    }
}
