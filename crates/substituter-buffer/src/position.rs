//! Line/character coordinates.
//!
//! ## Learning: Newtype Pattern
//!
//! `Position` wraps line/character coordinates instead of passing
//! `(usize, usize)` around:
//! - Type safety: Can't accidentally swap line and character
//! - Named fields: Self-documenting code
//! - Methods: Behavior such as wire conversion lives next to the data

/// A position in a text buffer (line and character).
///
/// Both line and column are 0-indexed. The column counts characters,
/// never bytes: `é` advances it by one even though it is two bytes of UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters not bytes)
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position at the start of the buffer.
    pub const ZERO: Position = Position { line: 0, column: 0 };

    /// Builds a position from a 1-based wire line number.
    ///
    /// Returns `None` for line 0, which the editor never sends.
    pub fn from_wire(line: usize, column: usize) -> Option<Self> {
        line.checked_sub(1).map(|line| Self { line, column })
    }

    /// The line number as the editor protocol expects it (1-based).
    pub fn wire_line(&self) -> usize {
        self.line + 1
    }

    /// Advances past one character.
    ///
    /// A newline moves to the start of the next line; anything else
    /// moves one column right.
    pub fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.column.cmp(&other.column),
            other => other,
        }
    }
}
