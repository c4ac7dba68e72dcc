//! # Substituter Buffer
//!
//! Coordinate handling for editor buffers.
//!
//! ## Key Concepts for Learning Rust
//!
//! ### Bytes vs Characters
//! - Rust strings are UTF-8: `str::len()` counts bytes, not characters
//! - Regex matches report byte offsets
//! - The editor counts characters, so every offset crossing that boundary
//!   goes through [`position_at`] or [`byte_offset`]
//!
//! ### Borrowing
//! - The translation functions borrow the buffer (`&[u8]`) and never copy it
//! - [`CaretText`] takes its `String` by value and hands it back edited

mod caret;
mod offsets;
mod position;
mod selection;

pub use caret::{extract_caret, CaretText, CARET_MARKER};
pub use offsets::{
    byte_offset, char_count, column_offset, decode_char, line_start_offset, position_at,
    CharScanner,
};
pub use position::Position;
pub use selection::Selection;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during coordinate translation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("Invalid UTF-8 at byte offset {offset}")]
    InvalidEncoding { offset: usize },

    #[error("Buffer too short; no line {line}")]
    LineNotFound { line: usize },

    #[error("Byte offset {offset} is past the end of the text ({len} bytes)")]
    OffsetOutOfBounds { offset: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BufferError::LineNotFound { line: 7 };
        assert_eq!(err.to_string(), "Buffer too short; no line 7");

        let err = BufferError::InvalidEncoding { offset: 3 };
        assert!(err.to_string().contains("byte offset 3"));
    }

    #[test]
    fn test_translation_across_lines() {
        let text = "fn main() {\n    let ß = 1;\n}".as_bytes();
        let pos = Position::new(1, 10);
        let offset = byte_offset(text, pos).unwrap();
        assert_eq!(&text[offset..offset + 1], b"=");
        assert_eq!(position_at(text, offset, Position::ZERO).unwrap(), pos);
    }
}
