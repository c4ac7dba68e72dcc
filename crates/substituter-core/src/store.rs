//! Persistent rule storage.
//!
//! Rules live in a single JSON file that is read once at startup and
//! rewritten whole when a rule is added. The location is always passed in
//! explicitly, so tests can point it at a temporary directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::{CoreResult, RuleList};

/// A rule file on disk.
#[derive(Debug, Clone)]
pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The rule file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all rules. A missing file means no rules yet.
    pub fn load(&self) -> CoreResult<RuleList> {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no rule file yet");
                return Ok(RuleList::default());
            }
            Err(err) => return Err(err.into()),
        };
        let rules: RuleList = serde_json::from_slice(&content)?;
        tracing::debug!(path = %self.path.display(), count = rules.len(), "loaded rules");
        Ok(rules)
    }

    /// Replaces the rule file with `rules`.
    ///
    /// Writes to a sibling `.tmp` file first, then renames it over the
    /// target, so a crash mid-write leaves the previous rules intact.
    pub fn save(&self, rules: &RuleList) -> CoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(rules)?;

        let temp_path = self.temp_path();
        tracing::info!(path = %temp_path.display(), "writing rules");
        std::fs::write(&temp_path, content.as_bytes())?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}
