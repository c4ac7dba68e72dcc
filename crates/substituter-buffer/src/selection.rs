//! Text selection handling.
//!
//! ## Learning: Range Types
//!
//! Rust's standard library has `Range<T>` (exclusive end) and
//! `RangeInclusive<T>` (inclusive end). For text, we use exclusive
//! ranges because:
//! - Empty selections (start == end) are natural
//! - Consistent with slice semantics

use crate::Position;

/// A span of text between two positions.
///
/// The start is always before or equal to the end (normalized). Used both
/// for the span an expansion replaces and for the caret/selection the
/// editor shows afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Selection {
    /// Creates a new selection.
    ///
    /// Automatically normalizes so start <= end.
    pub fn new(start: Position, end: Position) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Creates a zero-width selection (caret position).
    pub fn cursor(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_normalization() {
        let sel = Selection::new(Position::new(2, 5), Position::new(1, 3));
        assert_eq!(sel.start, Position::new(1, 3));
        assert_eq!(sel.end, Position::new(2, 5));
    }

    #[test]
    fn test_cursor_selection() {
        let sel = Selection::cursor(Position::new(4, 2));
        assert_eq!(sel, Selection::new(Position::new(4, 2), Position::new(4, 2)));
    }
}
