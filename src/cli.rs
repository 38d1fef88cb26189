//! Command-line interface definitions.
//!
//! A single build command with no required flags: `feedroll` reads
//! `sources.json` and rewrites `docs/data/content.json`. Everything else is
//! an override.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the snapshot build.
///
/// # Examples
///
/// ```sh
/// # Default run
/// feedroll
///
/// # Explicit paths and a tighter timeout
/// feedroll --sources ./sources.json --output ./docs/data/content.json --timeout-secs 10
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the source configuration document
    #[arg(short, long, default_value = "sources.json")]
    pub sources: PathBuf,

    /// Path of the content snapshot artifact
    #[arg(short, long, default_value = "docs/data/content.json")]
    pub output: PathBuf,

    /// Timeout applied to every network operation, in seconds
    #[arg(long, default_value_t = 20)]
    pub timeout_secs: u64,

    /// Worker count for per-article image resolution within one source
    #[arg(long, default_value_t = 4)]
    pub image_workers: usize,

    /// Access token for facebook-type sources
    #[arg(long, env = "FACEBOOK_ACCESS_TOKEN", hide_env_values = true)]
    pub facebook_access_token: Option<String>,
}
