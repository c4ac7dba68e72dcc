//! Translation between byte offsets and line/character positions.
//!
//! ## Two Index Spaces
//!
//! Regex engines report matches as byte offsets into UTF-8 text, while the
//! editor protocol speaks in lines and characters. Mixing the two up is the
//! classic multi-byte bug: in `"é=1"` the `=` sits at byte 2 but character 1.
//!
//! Everything here walks the text one character at a time, so the buffer
//! never has to be valid UTF-8 past the point being asked about. A malformed
//! sequence before that point is reported as [`BufferError::InvalidEncoding`].
//!
//! ```
//! use substituter_buffer::{byte_offset, position_at, Position};
//!
//! let text = "héllo\nwörld".as_bytes();
//! let offset = byte_offset(text, Position::new(1, 2)).unwrap();
//! assert_eq!(offset, 10);
//! assert_eq!(position_at(text, offset, Position::ZERO).unwrap(), Position::new(1, 2));
//! ```

use crate::{BufferError, BufferResult, Position};

/// Iterator over `(byte_offset, char)` pairs of a UTF-8 byte slice.
///
/// Yields an error at the first malformed sequence and stops afterwards.
#[derive(Debug, Clone)]
pub struct CharScanner<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> CharScanner<'a> {
    /// Starts scanning `bytes` at `offset`.
    pub fn new(bytes: &'a [u8], offset: usize) -> Self {
        Self {
            bytes,
            offset,
            failed: false,
        }
    }

    /// Byte offset of the next character to be yielded.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for CharScanner<'_> {
    type Item = BufferResult<(usize, char)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }
        let start = self.offset;
        match decode_char(self.bytes, start) {
            Ok((ch, width)) => {
                self.offset += width;
                Some(Ok((start, ch)))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Decodes the character starting at `offset`, returning it and its width
/// in bytes.
pub fn decode_char(bytes: &[u8], offset: usize) -> BufferResult<(char, usize)> {
    let invalid = BufferError::InvalidEncoding { offset };
    let width = match bytes.get(offset).copied() {
        Some(0x00..=0x7F) => 1,
        Some(0xC2..=0xDF) => 2,
        Some(0xE0..=0xEF) => 3,
        Some(0xF0..=0xF4) => 4,
        _ => return Err(invalid),
    };
    let unit = bytes.get(offset..offset + width).ok_or(invalid)?;
    std::str::from_utf8(unit)
        .ok()
        .and_then(|s| s.chars().next())
        .map(|ch| (ch, width))
        .ok_or(BufferError::InvalidEncoding { offset })
}

/// Returns the byte offset where the 0-based `line` starts.
///
/// Line 0 always starts at offset 0. A buffer ending in `\n` has an empty
/// final line starting at its length.
pub fn line_start_offset(text: &[u8], line: usize) -> BufferResult<usize> {
    if line == 0 {
        return Ok(0);
    }
    let mut current = 0;
    for item in CharScanner::new(text, 0) {
        let (offset, ch) = item?;
        if ch == '\n' {
            current += 1;
            if current == line {
                return Ok(offset + 1);
            }
        }
    }
    Err(BufferError::LineNotFound { line })
}

/// Returns the byte offset `column` characters after `line_start`.
///
/// Stops early at the end of the line (before its `\n`) or the end of the
/// buffer, so the result never leaves the line it started on.
pub fn column_offset(text: &[u8], line_start: usize, column: usize) -> BufferResult<usize> {
    let mut scanner = CharScanner::new(text, line_start);
    for _ in 0..column {
        match scanner.next() {
            Some(Ok((offset, '\n'))) => return Ok(offset),
            Some(Ok(_)) => {}
            Some(Err(err)) => return Err(err),
            None => break,
        }
    }
    Ok(scanner.offset().min(text.len()))
}

/// Converts a line/character position to a byte offset.
pub fn byte_offset(text: &[u8], pos: Position) -> BufferResult<usize> {
    let line_start = line_start_offset(text, pos.line)?;
    column_offset(text, line_start, pos.column)
}

/// Converts a byte offset into a position, walking from `origin`.
///
/// `origin` is the position of `text`'s first byte, which lets callers
/// translate offsets within a fragment (such as freshly inserted text)
/// into absolute buffer coordinates. An offset inside a multi-byte
/// character resolves to the character that follows it. Offsets past the
/// end of `text` are a caller bug and reported as
/// [`BufferError::OffsetOutOfBounds`].
pub fn position_at(text: &[u8], byte_offset: usize, origin: Position) -> BufferResult<Position> {
    if byte_offset > text.len() {
        return Err(BufferError::OffsetOutOfBounds {
            offset: byte_offset,
            len: text.len(),
        });
    }
    let mut pos = origin;
    for item in CharScanner::new(text, 0) {
        let (offset, ch) = item?;
        if offset >= byte_offset {
            return Ok(pos);
        }
        pos.advance(ch);
    }
    Ok(pos)
}

/// Number of characters that start before `byte_offset`.
///
/// For text without newlines this is the character column of the offset.
pub fn char_count(text: &[u8], byte_offset: usize) -> BufferResult<usize> {
    let mut count = 0;
    for item in CharScanner::new(text, 0) {
        let (offset, _) = item?;
        if offset >= byte_offset {
            break;
        }
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_char_widths() {
        let text = "aé日🦀".as_bytes();
        assert_eq!(decode_char(text, 0).unwrap(), ('a', 1));
        assert_eq!(decode_char(text, 1).unwrap(), ('é', 2));
        assert_eq!(decode_char(text, 3).unwrap(), ('日', 3));
        assert_eq!(decode_char(text, 6).unwrap(), ('🦀', 4));
    }

    #[test]
    fn test_decode_char_rejects_malformed() {
        // Continuation byte without a lead byte
        assert!(matches!(
            decode_char(&[0x80], 0),
            Err(BufferError::InvalidEncoding { offset: 0 })
        ));
        // Truncated three-byte sequence
        assert!(matches!(
            decode_char(&[b'a', 0xE6, 0x97], 1),
            Err(BufferError::InvalidEncoding { offset: 1 })
        ));
        // Lead byte followed by ASCII
        assert!(decode_char(&[0xC3, b'a'], 0).is_err());
    }

    #[test]
    fn test_line_start_offset() {
        let text = b"one\ntwo\n\nfour";
        assert_eq!(line_start_offset(text, 0).unwrap(), 0);
        assert_eq!(line_start_offset(text, 1).unwrap(), 4);
        assert_eq!(line_start_offset(text, 2).unwrap(), 8);
        assert_eq!(line_start_offset(text, 3).unwrap(), 9);
        assert!(matches!(
            line_start_offset(text, 4),
            Err(BufferError::LineNotFound { line: 4 })
        ));
    }

    #[test]
    fn test_line_start_after_trailing_newline() {
        assert_eq!(line_start_offset(b"abc\n", 1).unwrap(), 4);
        assert!(line_start_offset(b"", 1).is_err());
    }

    #[test]
    fn test_line_start_reports_bad_encoding() {
        let text = [b'a', 0xFF, b'\n', b'b'];
        assert!(matches!(
            line_start_offset(&text, 1),
            Err(BufferError::InvalidEncoding { offset: 1 })
        ));
    }

    #[test]
    fn test_column_offset_counts_characters() {
        let text = "日本語 text\nnext".as_bytes();
        assert_eq!(column_offset(text, 0, 0).unwrap(), 0);
        assert_eq!(column_offset(text, 0, 2).unwrap(), 6);
        assert_eq!(column_offset(text, 0, 4).unwrap(), 10);
    }

    #[test]
    fn test_column_offset_clamps_to_line() {
        let text = b"ab\ncd";
        assert_eq!(column_offset(text, 0, 10).unwrap(), 2);
        assert_eq!(column_offset(text, 3, 10).unwrap(), 5);
    }

    #[test]
    fn test_position_at_with_origin() {
        let text = "for k, v := range \n}".as_bytes();
        let origin = Position::new(7, 4);
        assert_eq!(position_at(text, 0, origin).unwrap(), origin);
        assert_eq!(position_at(text, 18, origin).unwrap(), Position::new(7, 22));
        assert_eq!(position_at(text, 19, origin).unwrap(), Position::new(8, 0));
        assert_eq!(position_at(text, text.len(), origin).unwrap(), Position::new(8, 1));
    }

    #[test]
    fn test_position_at_multibyte() {
        let text = "ñandú x".as_bytes();
        // 'x' is at byte 8, character 6
        assert_eq!(position_at(text, 8, Position::ZERO).unwrap(), Position::new(0, 6));
    }

    #[test]
    fn test_position_at_out_of_bounds() {
        assert!(matches!(
            position_at(b"abc", 4, Position::ZERO),
            Err(BufferError::OffsetOutOfBounds { offset: 4, len: 3 })
        ));
    }

    #[test]
    fn test_char_count() {
        let text = "«x» = y".as_bytes();
        assert_eq!(char_count(text, 0).unwrap(), 0);
        assert_eq!(char_count(text, 2).unwrap(), 1);
        assert_eq!(char_count(text, 5).unwrap(), 3);
        assert_eq!(char_count(text, text.len()).unwrap(), 7);
    }

    proptest! {
        #[test]
        fn prop_position_round_trip(text in "[a-z é日🦀\n]{0,64}") {
            let bytes = text.as_bytes();
            let ends = std::iter::once((text.len(), '\0'));
            let mut pos = Position::ZERO;
            for (offset, ch) in text.char_indices().chain(ends) {
                prop_assert_eq!(byte_offset(bytes, pos).unwrap(), offset);
                prop_assert_eq!(position_at(bytes, offset, Position::ZERO).unwrap(), pos);
                pos.advance(ch);
            }
        }
    }
}
