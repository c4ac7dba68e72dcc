//! The editor's line-oriented tool protocol.
//!
//! Input arrives as the buffer on stdin plus three environment variables.
//! Output is a sequence of `key=value` directives, one per line, with
//! commands separated by a blank line:
//!
//! ```text
//! command=replace
//! start_line=1
//! start_char=0
//! end_line=1
//! end_char=5
//! new_text="for k, v := range MAPNAME {
//! }"
//!
//! command=select
//! ...
//! ```
//!
//! Lines on the wire are 1-based; characters are 0-based.

use std::fmt;
use std::io::{Read, Write};

use substituter_buffer::{Position, Selection};

use crate::{CoreError, CoreResult, ExpansionResult, RequestContext};

/// 1-based line number of the caret.
pub const LINE_NUMBER_VAR: &str = "EVERGREEN_CURRENT_LINE_NUMBER";
/// 0-based character offset of the caret within its line.
pub const CHAR_OFFSET_VAR: &str = "EVERGREEN_CURRENT_CHAR_OFFSET";
/// Name of the file being edited.
pub const FILENAME_VAR: &str = "EVERGREEN_CURRENT_FILENAME";

/// Caret position and filename sent alongside the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInput {
    /// Caret position, already converted to 0-based lines
    pub cursor: Position,
    /// Name of the file being edited
    pub filename: String,
}

impl RequestInput {
    /// Reads the request variables from the process environment.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Reads the request variables through `lookup`.
    ///
    /// A missing filename is treated as empty; missing or malformed
    /// coordinates are errors.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        let line = parse_var(&lookup, LINE_NUMBER_VAR)?;
        let column = parse_var(&lookup, CHAR_OFFSET_VAR)?;
        let cursor = Position::from_wire(line, column).ok_or_else(|| CoreError::InvalidEnv {
            name: LINE_NUMBER_VAR.to_string(),
            value: line.to_string(),
        })?;
        Ok(Self {
            cursor,
            filename: lookup(FILENAME_VAR).unwrap_or_default(),
        })
    }

    /// Reads the whole buffer from `reader` and builds the request context.
    pub fn read_context(self, mut reader: impl Read) -> CoreResult<RequestContext> {
        let mut text = Vec::new();
        reader.read_to_end(&mut text)?;
        RequestContext::new(text, self.filename, self.cursor)
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> CoreResult<usize> {
    let value = lookup(name).ok_or_else(|| CoreError::MissingEnv(name.to_string()))?;
    value.trim().parse().map_err(|_| CoreError::InvalidEnv {
        name: name.to_string(),
        value,
    })
}

/// A directive sent back to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Replace the span with new text
    Replace { span: Selection, text: String },
    /// Move the caret or select a range
    Select { span: Selection },
}

impl EditCommand {
    /// The commands that apply an expansion: replace, then select.
    pub fn for_expansion(result: &ExpansionResult) -> [EditCommand; 2] {
        [
            EditCommand::Replace {
                span: result.replace,
                text: result.new_text.clone(),
            },
            EditCommand::Select {
                span: result.selection,
            },
        ]
    }
}

impl fmt::Display for EditCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, span) = match self {
            EditCommand::Replace { span, .. } => ("replace", span),
            EditCommand::Select { span } => ("select", span),
        };
        writeln!(f, "command={name}")?;
        writeln!(f, "start_line={}", span.start.wire_line())?;
        writeln!(f, "start_char={}", span.start.column)?;
        writeln!(f, "end_line={}", span.end.wire_line())?;
        writeln!(f, "end_char={}", span.end.column)?;
        if let EditCommand::Replace { text, .. } = self {
            writeln!(f, "new_text=\"{}\"", double_quotes(text))?;
        }
        Ok(())
    }
}

/// Escapes `"` by doubling it.
pub fn double_quotes(text: &str) -> String {
    text.replace('"', "\"\"")
}

/// Writes the directives for an expansion.
pub fn emit(out: &mut impl Write, result: &ExpansionResult) -> std::io::Result<()> {
    let commands = EditCommand::for_expansion(result);
    for (i, command) in commands.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        write!(out, "{command}")?;
    }
    out.flush()
}
