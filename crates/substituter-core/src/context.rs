//! Per-request snapshot of the editor state.

use substituter_buffer::{column_offset, line_start_offset, BufferError, Position};

use crate::CoreResult;

/// The filename and caret position for one request, plus the text in
/// front of the caret.
///
/// Built once from the raw editor input and never mutated afterwards.
/// The text before the caret is located up front, so malformed UTF-8 or a
/// line past the end of the buffer fails here rather than inside a rule.
#[derive(Debug, Clone)]
pub struct RequestContext {
    filename: String,
    cursor: Position,
    line_before_cursor: String,
}

impl RequestContext {
    /// Creates a context for a caret at `cursor` (0-based line and character).
    pub fn new(
        full_text: impl AsRef<[u8]>,
        filename: impl Into<String>,
        cursor: Position,
    ) -> CoreResult<Self> {
        let full_text = full_text.as_ref();
        let line_start = line_start_offset(full_text, cursor.line)?;
        let cursor_offset = column_offset(full_text, line_start, cursor.column)?;
        let line_before_cursor = std::str::from_utf8(&full_text[line_start..cursor_offset])
            .map_err(|e| BufferError::InvalidEncoding {
                offset: line_start + e.valid_up_to(),
            })?
            .to_string();

        Ok(Self {
            filename: filename.into(),
            cursor,
            line_before_cursor,
        })
    }

    /// Name of the file being edited.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// 0-based line the caret is on.
    pub fn line(&self) -> usize {
        self.cursor.line
    }

    /// Text from the start of the caret's line up to the caret.
    pub fn line_before_cursor(&self) -> &str {
        &self.line_before_cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_before_cursor() {
        let text = b"package main\n\nfunc f() {\n\tforkv\n}\n";
        let ctx = RequestContext::new(text, "main.go", Position::new(3, 6)).unwrap();
        assert_eq!(ctx.line_before_cursor(), "\tforkv");
        assert_eq!(ctx.line(), 3);
    }

    #[test]
    fn test_cursor_mid_line_with_multibyte() {
        let text = "naïve café = 1";
        let ctx = RequestContext::new(text, "notes.txt", Position::new(0, 10)).unwrap();
        assert_eq!(ctx.line_before_cursor(), "naïve café");
    }

    #[test]
    fn test_column_past_end_of_line() {
        let ctx = RequestContext::new("ab\ncd", "x", Position::new(0, 40)).unwrap();
        assert_eq!(ctx.line_before_cursor(), "ab");
    }

    #[test]
    fn test_first_line() {
        let ctx = RequestContext::new(b"abc\ndef".to_vec(), "x", Position::new(0, 2)).unwrap();
        assert_eq!(ctx.line_before_cursor(), "ab");
    }

    #[test]
    fn test_missing_line_is_an_error() {
        let err = RequestContext::new(b"one line".to_vec(), "x", Position::new(3, 0)).unwrap_err();
        assert!(matches!(
            err,
            crate::CoreError::Buffer(BufferError::LineNotFound { line: 3 })
        ));
    }

    #[test]
    fn test_bad_encoding_is_an_error() {
        let text = vec![b'a', b'\n', b'x', 0xFE, b'y'];
        let err = RequestContext::new(text, "x", Position::new(1, 3)).unwrap_err();
        assert!(matches!(
            err,
            crate::CoreError::Buffer(BufferError::InvalidEncoding { offset: 3 })
        ));
    }
}
