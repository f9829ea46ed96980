//! Greedy move finders.
//!
//! Each finder inspects a stack and proposes at most one flip. None of them remember
//! earlier calls or look more than one move ahead; they are heuristics, not a search.
//! A finder returning `None` is a normal answer: try the next finder, or conclude the
//! stack is already complete.
//!
//! - `find_single_joining_move`: joins a displaced slice to the run at one end.
//! - `find_first_double_move`: sets up a joining move when no join is available.
use tracing::trace;

use crate::engine::{Flip, FlipDirection, SliceStack, MAX_COLORS};

/// The side of the pile a proposed move reaches toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveSide {
    Front,
    Back,
}

/// Order in which `find_first_double_move` walks the pile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScanDirection {
    /// From the first slice toward the last.
    #[default]
    Forward,
    /// From the last slice toward the first.
    Backward,
}

impl ScanDirection {
    pub fn reversed(self) -> Self {
        match self {
            ScanDirection::Forward => ScanDirection::Backward,
            ScanDirection::Backward => ScanDirection::Forward,
        }
    }
}

/// A move proposed by one of the finders.
///
/// `index` is the position the finder reported, not the flip anchor; use `to_flip`
/// to get the flip to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProposedMove {
    pub index: usize,
    pub side: MoveSide,
}

impl ProposedMove {
    /// Translates the proposal into a flip.
    ///
    /// A `Front` proposal flips toward the front one position before `index`; a `Back`
    /// proposal flips toward the back one position after it. In both cases the
    /// anchor is `index + direction.sign()`.
    ///
    /// # Examples
    /// ```
    /// use slice_sort::engine::{Flip, FlipDirection};
    /// use slice_sort::heuristics::{MoveSide, ProposedMove};
    ///
    /// let front = ProposedMove { index: 2, side: MoveSide::Front };
    /// assert_eq!(front.to_flip(), Flip { index: 1, direction: FlipDirection::TowardFront });
    /// let back = ProposedMove { index: 2, side: MoveSide::Back };
    /// assert_eq!(back.to_flip(), Flip { index: 3, direction: FlipDirection::TowardBack });
    /// ```
    pub fn to_flip(self) -> Flip {
        match self.side {
            // Finders never report a front move at index 0.
            MoveSide::Front => Flip {
                index: self.index.saturating_sub(1),
                direction: FlipDirection::TowardFront,
            },
            MoveSide::Back => Flip {
                index: self.index + 1,
                direction: FlipDirection::TowardBack,
            },
        }
    }
}

/// Finds a slice that matches an end's color but is cut off from that end.
///
/// The front is tried first: with the edge color taken from position 0, the first
/// slice of that color seen after any slice of another color is reported with
/// `MoveSide::Front`. Failing that, the back is scanned the same way from the last
/// position and reported with `MoveSide::Back`. Flipping between the end and the
/// reported slice (see `ProposedMove::to_flip`) joins the two, lowering
/// fragmentation by one.
///
/// Returns `None` when neither end color reappears, which happens when the stack is
/// complete or when a double move is needed first.
///
/// # Examples
/// ```
/// use slice_sort::heuristics::{find_single_joining_move, MoveSide, ProposedMove};
/// use slice_sort::utils::stack_from_str;
///
/// let stack = stack_from_str("0 1 0 1", 2).unwrap();
/// assert_eq!(
///     find_single_joining_move(&stack),
///     Some(ProposedMove { index: 2, side: MoveSide::Front })
/// );
/// ```
pub fn find_single_joining_move<P>(stack: &SliceStack<P>) -> Option<ProposedMove> {
    let count = stack.count();
    if count == 0 {
        return None;
    }

    let edge = stack.color(0);
    let mut found_other = false;
    for (i, color) in stack.colors().enumerate() {
        if color == edge {
            if found_other {
                return Some(ProposedMove {
                    index: i,
                    side: MoveSide::Front,
                });
            }
        } else {
            found_other = true;
        }
    }

    let edge = stack.color(count - 1);
    found_other = false;
    for i in (1..count).rev() {
        if stack.color(i) == edge {
            if found_other {
                return Some(ProposedMove {
                    index: i,
                    side: MoveSide::Back,
                });
            }
        } else {
            found_other = true;
        }
    }

    None
}

/// Alternate formulation of `find_single_joining_move`.
///
/// Instead of tracking whether another color has been passed, it looks for an
/// edge-colored slice whose neighbor on the edge side has a different color. Both
/// formulations report the same move for every stack.
pub fn find_single_joining_move_v2<P>(stack: &SliceStack<P>) -> Option<ProposedMove> {
    let count = stack.count();
    if count == 0 {
        return None;
    }

    let front = stack.color(0);
    if let Some(index) = (1..count).find(|&i| {
        let color = stack.color(i);
        color == front && color != stack.color(i - 1)
    }) {
        return Some(ProposedMove {
            index,
            side: MoveSide::Front,
        });
    }

    let back = stack.color(count - 1);
    (1..count.saturating_sub(1))
        .rev()
        .find(|&i| {
            let color = stack.color(i);
            color == back && color != stack.color(i + 1)
        })
        .map(|index| ProposedMove {
            index,
            side: MoveSide::Back,
        })
}

/// Finds the first color that reappears after its run has ended.
///
/// Walks the pile in `scan` order, recording where each color is first seen. The
/// first slice whose color was already recorded but differs from the slice just
/// before it (in scan order) marks a split color. The reported index is the slice
/// just before that occurrence, and the side is opposite the scan: a forward scan
/// reports `MoveSide::Back`, a backward scan `MoveSide::Front`.
///
/// The resulting flip does not join anything by itself. It carries the split
/// occurrence to an end of the pile, where `find_single_joining_move` can join it on
/// the next step.
///
/// The backward scan stops before position 0. Returns `None` when no color is split,
/// i.e. the stack is complete.
pub fn find_first_double_move<P>(
    stack: &SliceStack<P>,
    scan: ScanDirection,
) -> Option<ProposedMove> {
    let count = stack.count();
    let mut first_seen: [Option<usize>; MAX_COLORS] = [None; MAX_COLORS];

    match scan {
        ScanDirection::Forward => {
            for i in 0..count {
                let color = stack.color(i);
                match first_seen[color as usize] {
                    None => first_seen[color as usize] = Some(i),
                    Some(first) if color != stack.color(i - 1) => {
                        trace!(color, first, split_at = i, "split color found scanning forward");
                        return Some(ProposedMove {
                            index: i - 1,
                            side: MoveSide::Back,
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        ScanDirection::Backward => {
            for i in (1..count).rev() {
                let color = stack.color(i);
                match first_seen[color as usize] {
                    None => first_seen[color as usize] = Some(i),
                    Some(first) if color != stack.color(i + 1) => {
                        trace!(color, first, split_at = i, "split color found scanning backward");
                        return Some(ProposedMove {
                            index: i + 1,
                            side: MoveSide::Front,
                        });
                    }
                    Some(_) => {}
                }
            }
        }
    }

    None
}
