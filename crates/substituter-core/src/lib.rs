//! # Substituter Core
//!
//! Rule matching, expansion and the editor protocol.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                       Substituter                          │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐  │
//! │  │  RuleStore  │ │   Config    │ │    RuleCollector    │  │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘  │
//! │         │                                                  │
//! │  ┌──────┴──────────────────────────────────┐              │
//! │  │     Rule::try_apply(RequestContext)      │              │
//! │  │  filter → last match → anchor → expand   │              │
//! │  └─────────────────────────────────────────┘              │
//! │         │                                                  │
//! │  ┌──────┴──────────┐                                       │
//! │  │ protocol::emit  │  command=replace / command=select     │
//! │  └─────────────────┘                                       │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Learning: Module Organization
//!
//! Rust modules map to files:
//! - `mod foo;` looks for `foo.rs` or `foo/mod.rs`
//! - `pub use` re-exports items for cleaner public APIs

pub mod collector;
pub mod config;
pub mod context;
pub mod engine;
pub mod expand;
pub mod protocol;
pub mod rule;
pub mod store;

pub use collector::{DialogCollector, RuleCollector, RuleSuggestion};
pub use config::{Config, ConfigError, DialogConfig};
pub use context::RequestContext;
pub use engine::{Outcome, Substituter};
pub use expand::ExpansionResult;
pub use protocol::{EditCommand, RequestInput};
pub use rule::{Rule, RuleList};
pub use store::RuleStore;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Buffer error: {0}")]
    Buffer(#[from] substituter_buffer::BufferError),

    #[error("Invalid regular expression {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rule file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing environment variable {0}")]
    MissingEnv(String),

    #[error("Invalid value {value:?} for {name}")]
    InvalidEnv { name: String, value: String },

    #[error("Rule collection failed: {0}")]
    Collector(String),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
