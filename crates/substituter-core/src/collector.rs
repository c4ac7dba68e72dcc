//! Teaching new rules.
//!
//! When nothing matches, the user is asked for a new rule, pre-filled with
//! suggestions taken from the request. How the question is asked is behind
//! the [`RuleCollector`] trait: the binary uses a `yad` form dialog, tests
//! use a closure.
//!
//! ## Learning: Blanket Implementations
//!
//! `impl<F: FnMut(..)> RuleCollector for F` makes every matching closure a
//! collector, so callers never need a wrapper struct for simple cases.

use std::process::Command;

use crate::config::DialogConfig;
use crate::{CoreError, CoreResult, RequestContext, Rule};

/// Pre-filled values for the new-rule dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSuggestion {
    /// Suggested match pattern
    pub pattern: String,
    /// Suggested file filter
    pub file_pattern: String,
}

impl RuleSuggestion {
    /// Suggests the trimmed text before the caret and a filter for the
    /// current file's extension or name.
    pub fn from_context(ctx: &RequestContext) -> Self {
        Self {
            pattern: ctx.line_before_cursor().trim().to_string(),
            file_pattern: Self::file_pattern_for(ctx.filename()),
        }
    }

    /// Builds a file filter from the last `/` or `.` onwards.
    ///
    /// `src/main.go` gives `.*\.go`, `src/Makefile` gives `.*/Makefile`,
    /// and a bare `Makefile` is offered as-is.
    pub fn file_pattern_for(filename: &str) -> String {
        match filename.rfind(['/', '.']) {
            Some(idx) => format!(".*{}", regex::escape(&filename[idx..])),
            None => filename.to_string(),
        }
    }
}

/// Something that can ask for a new rule.
pub trait RuleCollector {
    /// Returns the rule the user entered, or an error if they cancelled or
    /// the dialog failed.
    fn collect(&mut self, suggestion: &RuleSuggestion) -> CoreResult<Rule>;
}

impl<F> RuleCollector for F
where
    F: FnMut(&RuleSuggestion) -> CoreResult<Rule>,
{
    fn collect(&mut self, suggestion: &RuleSuggestion) -> CoreResult<Rule> {
        self(suggestion)
    }
}

/// Collects rules through a `yad` form dialog.
#[derive(Debug, Clone, Default)]
pub struct DialogCollector {
    config: DialogConfig,
}

impl DialogCollector {
    /// Creates a collector for the configured dialog program.
    pub fn new(config: DialogConfig) -> Self {
        Self { config }
    }

    /// Command-line arguments for the form.
    ///
    /// Four fields: a label, the pattern, a multi-line replacement and the
    /// file filter. The trailing positional values pre-fill them in order.
    pub fn args(&self, suggestion: &RuleSuggestion) -> Vec<String> {
        vec![
            format!("--title={}", self.config.title),
            "--mouse".to_string(),
            "--form".to_string(),
            r"--separator=\n".to_string(),
            "--field=No matching replacements found. Add a new one?:LBL".to_string(),
            "--field=Replace:".to_string(),
            "--field=With::TXT".to_string(),
            "--field=In files whose names match:".to_string(),
            format!("--width={}", self.config.width),
            String::new(),
            suggestion.pattern.clone(),
            String::new(),
            suggestion.file_pattern.clone(),
        ]
    }
}

impl RuleCollector for DialogCollector {
    fn collect(&mut self, suggestion: &RuleSuggestion) -> CoreResult<Rule> {
        tracing::info!(program = %self.config.program, "asking for a new rule");
        let output = Command::new(&self.config.program)
            .args(self.args(suggestion))
            .output()
            .map_err(|e| CoreError::Collector(format!("{}: {}", self.config.program, e)))?;
        if !output.status.success() {
            return Err(CoreError::Collector(format!(
                "{} exited with {}",
                self.config.program, output.status
            )));
        }
        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| CoreError::Collector(format!("dialog output is not UTF-8: {e}")))?;
        parse_form_output(&stdout)
    }
}

/// Parses the dialog's newline-separated form output into a rule.
///
/// The first line belongs to the label field and is ignored. The
/// replacement comes from a multi-line field and is backslash-escaped.
pub fn parse_form_output(output: &str) -> CoreResult<Rule> {
    let fields: Vec<&str> = output.split('\n').collect();
    if fields.len() < 4 {
        return Err(CoreError::Collector(format!(
            "missing output; only got {} lines",
            fields.len()
        )));
    }
    let rule = Rule::new(fields[1], unescape(fields[2]), fields[3]);
    rule.validate()?;
    Ok(rule)
}

/// Decodes `\n`, `\r`, `\t` and `\\`. Other escapes are left untouched.
pub fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use substituter_buffer::Position;

    #[test]
    fn test_file_pattern_for() {
        assert_eq!(RuleSuggestion::file_pattern_for("/src/main.go"), r".*\.go");
        assert_eq!(RuleSuggestion::file_pattern_for("/src/Makefile"), ".*/Makefile");
        assert_eq!(RuleSuggestion::file_pattern_for("Makefile"), "Makefile");
        assert_eq!(RuleSuggestion::file_pattern_for("a.tar.gz"), r".*\.gz");
    }

    #[test]
    fn test_suggestion_from_context() {
        let ctx = RequestContext::new(b"  \tforkv  ".to_vec(), "x/y.go", Position::new(0, 10))
            .unwrap();
        let suggestion = RuleSuggestion::from_context(&ctx);
        assert_eq!(suggestion.pattern, "forkv");
        assert_eq!(suggestion.file_pattern, r".*\.go");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"if x {\n\t^\n}"), "if x {\n\t^\n}");
        assert_eq!(unescape(r"a\\nb"), r"a\nb");
        assert_eq!(unescape(r"\r"), "\r");
        assert_eq!(unescape(r"\d+"), r"\d+");
        assert_eq!(unescape("tail\\"), "tail\\");
    }

    #[test]
    fn test_parse_form_output() {
        let rule = parse_form_output("\nforkv\nfor k, v := range ^M^ {\\n}\n.*\\.go\n").unwrap();
        assert_eq!(rule, Rule::new("forkv", "for k, v := range ^M^ {\n}", r".*\.go"));
    }

    #[test]
    fn test_parse_form_output_too_short() {
        assert!(matches!(
            parse_form_output("\nforkv\n"),
            Err(CoreError::Collector(_))
        ));
    }

    #[test]
    fn test_parse_form_output_rejects_bad_regex() {
        assert!(matches!(
            parse_form_output("\nfor(\nx\n.*\n"),
            Err(CoreError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_dialog_args_prefill() {
        let collector = DialogCollector::default();
        let suggestion = RuleSuggestion {
            pattern: "forkv".to_string(),
            file_pattern: r".*\.go".to_string(),
        };
        let args = collector.args(&suggestion);
        assert_eq!(args[0], "--title=Add an auto-complete");
        assert_eq!(args[8], "--width=600");
        assert_eq!(&args[9..], ["", "forkv", "", r".*\.go"]);
    }

    #[test]
    fn test_closure_collector() {
        let mut seen = None;
        let mut collector = |s: &RuleSuggestion| -> CoreResult<Rule> {
            seen = Some(s.pattern.clone());
            Ok(Rule::new("a", "b", ".*"))
        };
        let suggestion = RuleSuggestion {
            pattern: "abc".to_string(),
            file_pattern: ".*".to_string(),
        };
        assert_eq!(collector.collect(&suggestion).unwrap().pattern, "a");
        assert_eq!(seen.as_deref(), Some("abc"));
    }

    fn dialog(program: &str) -> DialogCollector {
        DialogCollector::new(DialogConfig {
            program: program.to_string(),
            ..Default::default()
        })
    }

    fn suggestion() -> RuleSuggestion {
        RuleSuggestion {
            pattern: "forkv".to_string(),
            file_pattern: r".*\.go".to_string(),
        }
    }

    #[test]
    fn test_dialog_failure_is_an_error() {
        let err = dialog("false").collect(&suggestion()).unwrap_err();
        assert!(matches!(err, CoreError::Collector(ref msg) if msg.contains("exited with")));
    }

    #[test]
    fn test_missing_dialog_program_is_an_error() {
        let err = dialog("substituter-no-such-dialog")
            .collect(&suggestion())
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Collector(ref msg) if msg.starts_with("substituter-no-such-dialog:")
        ));
    }
}
