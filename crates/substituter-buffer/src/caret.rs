//! Caret markers embedded in expansion text.
//!
//! A replacement template may contain up to two `^` characters. The first
//! marks where the selection starts, the second where it ends:
//!
//! | template            | result             | caret/selection   |
//! |---------------------|--------------------|-------------------|
//! | `foo()`             | `foo()`            | caret after `)`   |
//! | `foo(^)`            | `foo()`            | caret between `()`|
//! | `foo(^name^)`       | `foo(name)`        | `name` selected   |
//!
//! Offsets are byte offsets into the text with the markers removed.

/// The reserved marker character.
pub const CARET_MARKER: char = '^';

/// Removes the first marker at or after byte offset `from`.
///
/// Returns the text without that marker together with the byte offset it
/// occupied, or the unchanged text and `default` if there is none.
pub fn extract_caret(mut text: String, from: usize, default: usize) -> (String, usize) {
    let found = text
        .get(from..)
        .and_then(|rest| rest.find(CARET_MARKER))
        .map(|idx| from + idx);
    match found {
        Some(offset) => {
            text.remove(offset);
            (text, offset)
        }
        None => (text, default),
    }
}

/// Expansion text with its caret markers stripped out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretText {
    /// Text to insert, without markers
    pub text: String,
    /// Byte offset of the selection start within `text`
    pub start: usize,
    /// Byte offset of the selection end within `text`
    pub end: usize,
}

impl CaretText {
    /// Strips the selection start and end markers from `text`.
    ///
    /// With no marker the caret goes to the end of the text; with one it
    /// becomes a zero-width caret at the marker.
    pub fn extract(text: String) -> Self {
        let len = text.len();
        let (text, start) = extract_caret(text, 0, len);
        let (text, end) = extract_caret(text, start, start);
        Self { text, start, end }
    }

    /// Returns true if start and end coincide.
    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_markers() {
        let caret = CaretText::extract("fmt.Println()".to_string());
        assert_eq!(caret.text, "fmt.Println()");
        assert_eq!((caret.start, caret.end), (13, 13));
        assert!(caret.is_caret());
    }

    #[test]
    fn test_single_marker() {
        let caret = CaretText::extract("if ^ {\n}".to_string());
        assert_eq!(caret.text, "if  {\n}");
        assert_eq!((caret.start, caret.end), (3, 3));
    }

    #[test]
    fn test_selection_markers() {
        let caret = CaretText::extract("for k, v := range ^MAPNAME^ {\n}".to_string());
        assert_eq!(caret.text, "for k, v := range MAPNAME {\n}");
        assert_eq!(&caret.text[caret.start..caret.end], "MAPNAME");
        assert!(!caret.is_caret());
    }

    #[test]
    fn test_only_first_two_markers_are_consumed() {
        let caret = CaretText::extract("a^b^c^d".to_string());
        assert_eq!(caret.text, "abc^d");
        assert_eq!((caret.start, caret.end), (1, 2));
    }

    #[test]
    fn test_markers_after_multibyte_text() {
        let caret = CaretText::extract("«^x^»".to_string());
        assert_eq!(caret.text, "«x»");
        assert_eq!((caret.start, caret.end), (2, 3));
    }

    #[test]
    fn test_extract_caret_search_start() {
        let (text, offset) = extract_caret("^ab".to_string(), 1, 9);
        assert_eq!(text, "^ab");
        assert_eq!(offset, 9);

        let (text, offset) = extract_caret("ab^".to_string(), 1, 9);
        assert_eq!(text, "ab");
        assert_eq!(offset, 2);
    }
}
