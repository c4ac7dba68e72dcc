//! Applying a rule at the caret.
//!
//! A rule applies when its file filter matches the filename and the *last*
//! match of its pattern in the text before the caret ends exactly at the
//! caret. Earlier matches on the line never count, which is what makes a
//! rule behave like completion at the caret rather than find-and-replace.

use substituter_buffer::{char_count, position_at, CaretText, Position, Selection};

use crate::{CoreResult, RequestContext, Rule};

/// The edit produced by a successful rule application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionResult {
    /// Span of the original text being replaced
    pub replace: Selection,
    /// Replacement text with caret markers removed
    pub new_text: String,
    /// Caret or selection to show once the edit is applied
    pub selection: Selection,
}

impl Rule {
    /// Tries to expand this rule at the caret described by `ctx`.
    ///
    /// Returns `Ok(None)` when the rule doesn't apply and an error only when
    /// one of its regular expressions fails to compile.
    pub fn try_apply(&self, ctx: &RequestContext) -> CoreResult<Option<ExpansionResult>> {
        if !self.file_filter()?.is_match(ctx.filename()) {
            return Ok(None);
        }

        let matcher = self.matcher()?;
        let line = ctx.line_before_cursor();
        let Some(captures) = matcher.captures_iter(line).last() else {
            return Ok(None);
        };
        let Some(found) = captures.get(0) else {
            return Ok(None);
        };
        if found.end() != line.len() {
            tracing::trace!(
                pattern = %self.pattern,
                end = found.end(),
                "last match does not reach the caret"
            );
            return Ok(None);
        }

        let mut expanded = String::new();
        captures.expand(&self.replacement, &mut expanded);
        let caret = CaretText::extract(expanded);

        let line_bytes = line.as_bytes();
        let replace = Selection::new(
            Position::new(ctx.line(), char_count(line_bytes, found.start())?),
            Position::new(ctx.line(), char_count(line_bytes, found.end())?),
        );

        // Marker offsets are relative to the inserted text, which starts
        // where the replaced span starts.
        let inserted = caret.text.as_bytes();
        let start = position_at(inserted, caret.start, replace.start)?;
        let selection = if caret.is_caret() {
            Selection::cursor(start)
        } else {
            Selection::new(start, position_at(inserted, caret.end, replace.start)?)
        };

        tracing::debug!(pattern = %self.pattern, "rule applied");
        Ok(Some(ExpansionResult {
            replace,
            new_text: caret.text,
            selection,
        }))
    }
}
