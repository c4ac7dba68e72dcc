//! Substitution rules.
//!
//! ## Learning: Serde Field Renaming
//!
//! The rule file predates this crate and uses `PascalCase` keys
//! (`"Pattern"`, `"FilePattern"`). `#[serde(rename_all = "PascalCase")]`
//! keeps idiomatic `snake_case` field names in Rust while reading and
//! writing the existing format unchanged.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{CoreError, CoreResult};

/// A single abbreviation rule.
///
/// `pattern` is matched against the text before the caret, `replacement`
/// is the expansion template (capture references like `$1` or `${name}`
/// plus up to two `^` caret markers), and `file_pattern` restricts the
/// rule to files whose name matches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rule {
    pub pattern: String,
    pub replacement: String,
    pub file_pattern: String,
}

impl Rule {
    /// Creates a new rule.
    pub fn new(
        pattern: impl Into<String>,
        replacement: impl Into<String>,
        file_pattern: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            file_pattern: file_pattern.into(),
        }
    }

    /// Compiles the match pattern.
    pub fn matcher(&self) -> CoreResult<Regex> {
        compile(&self.pattern)
    }

    /// Compiles the file filter.
    pub fn file_filter(&self) -> CoreResult<Regex> {
        compile(&self.file_pattern)
    }

    /// Checks that both regular expressions compile.
    pub fn validate(&self) -> CoreResult<()> {
        self.matcher()?;
        self.file_filter()?;
        Ok(())
    }
}

/// Compiles a regular expression, keeping the source text in the error.
pub fn compile(pattern: &str) -> CoreResult<Regex> {
    Regex::new(pattern).map_err(|source| CoreError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// The ordered rule list as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub entries: Vec<Rule>,
}

impl RuleList {
    /// Creates a list from rules in priority order.
    pub fn new(entries: Vec<Rule>) -> Self {
        Self { entries }
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates rules in priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.entries.iter()
    }

    /// Appends a rule with the lowest priority.
    pub fn push(&mut self, rule: Rule) {
        self.entries.push(rule);
    }
}

impl<'a> IntoIterator for &'a RuleList {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// Older rule files store an empty list as `"Entries": null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Rule>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Rule>>::deserialize(deserializer)?.unwrap_or_default())
}
