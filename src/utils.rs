use crate::engine::{Color, SliceStack};
use crate::error::{Result, StackError};

/// Parses a textual stack description into a `SliceStack`.
///
/// The description lists color numbers front first, separated by whitespace and/or
/// commas. An empty description yields an empty stack. This is the same form
/// `SliceStack`'s `Display` produces, so printed stacks can be pasted back in.
///
/// # Arguments
/// * `text`: The color list, e.g. `"0 1 0 1"` or `"0,1,0,1"`.
/// * `color_count`: Number of colors the stack is declared with.
///
/// # Returns
/// * `Ok(SliceStack)` with one slice per listed color.
/// * `Err(StackError::Parse)` if a token is not a color number.
/// * Any shape error from `SliceStack::from_colors` (too many slices, bad color count,
///   color not below `color_count`).
///
/// # Examples
/// ```
/// use slice_sort::utils::stack_from_str;
///
/// let stack = stack_from_str("0, 1 1  2", 3).unwrap();
/// assert_eq!(stack.count(), 4);
/// assert_eq!(stack.to_string(), "0 1 1 2");
///
/// assert!(stack_from_str("0 x", 3).is_err());
/// assert!(stack_from_str("0 3", 3).is_err());
/// ```
pub fn stack_from_str(text: &str, color_count: usize) -> Result<SliceStack> {
    let colors = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(position, token)| {
            token.parse::<Color>().map_err(|_| {
                StackError::Parse(format!(
                    "unrecognized color '{}' at position {}",
                    token, position
                ))
            })
        })
        .collect::<Result<Vec<Color>>>()?;
    SliceStack::from_colors(&colors, color_count)
}
