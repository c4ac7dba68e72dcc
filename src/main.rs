//! # Substituter
//!
//! Expands the abbreviation before the editor's caret into a snippet.
//!
//! ## Quick Start
//!
//! Register it as an editor tool that receives the buffer on stdin:
//!
//! ```text
//! command=|!substituter
//! ```
//!
//! Typing `forkv` in a Go file and running the tool can then produce
//!
//! ```text
//! for k, v := range MAPNAME {
//! }
//! ```
//!
//! with `MAPNAME` selected. When nothing matches, a dialog asks for a new
//! rule, pre-filled from the text before the caret.

use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use substituter_core::{
    Config, DialogCollector, Outcome, RequestInput, RuleStore, Substituter,
};

/// Substituter - abbreviation expansion at the caret
#[derive(Parser, Debug)]
#[command(name = "substituter")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Rule file (overrides the configured location)
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the stored rules and exit
    #[arg(long)]
    list: bool,

    /// Ask for a new rule when nothing matches, but don't save it
    #[arg(long)]
    dry_run: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn open_rules(path: &Path) -> anyhow::Result<Substituter> {
    Substituter::open(RuleStore::new(path)).with_context(|| format!("Reading {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging; stdout belongs to the editor protocol
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::debug!("Starting substituter v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(args.config.as_deref())?;
    let rules_path = match args.rules {
        Some(path) => path,
        None => config.rules_path()?,
    };
    let mut substituter = open_rules(&rules_path)?;

    if args.list {
        substituter.write_rules(&mut io::stdout().lock())?;
        return Ok(());
    }

    let ctx = RequestInput::from_env()?.read_context(io::stdin().lock())?;
    let mut collector = DialogCollector::new(config.dialog.clone());
    let mut out = io::stdout().lock();

    if args.dry_run {
        if let Outcome::Learned(rule) = substituter.preview(&ctx, &mut collector, &mut out)? {
            eprintln!("{rule:?}");
        }
        return Ok(());
    }

    match substituter.handle(&ctx, &mut collector, &mut out)? {
        Outcome::Expanded(_) => {}
        Outcome::Learned(rule) => {
            tracing::info!(pattern = %rule.pattern, path = %rules_path.display(), "saved new rule");
        }
    }

    Ok(())
}
