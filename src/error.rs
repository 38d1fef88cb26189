//! Error taxonomy for the aggregation pipeline.
//!
//! Two families with very different blast radii:
//! - [`ConfigError`]: fatal. Raised while loading the source registry,
//!   before any network activity, and aborts the whole run.
//! - [`AdapterError`]: recovered. Raised by a feed, scrape, or Graph API
//!   adapter and absorbed at that source's boundary; it surfaces, at most,
//!   as a warning string on the affected source's result.
//!
//! Image-resolution and date-parse failures are even narrower: they degrade
//! silently to "no image" / no date and never reach either type.

use thiserror::Error;

/// Fatal configuration error. No partial registry is ever produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The source configuration document could not be read.
    #[error("failed to read sources file: {0}")]
    Io(#[from] std::io::Error),

    /// The source configuration document is not the expected JSON shape.
    #[error("failed to parse sources file: {0}")]
    Json(#[from] serde_json::Error),

    /// A source record is missing a required field after trimming.
    #[error("source entry {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    /// Two source records share the same id.
    #[error("duplicate source id: {id}")]
    DuplicateId { id: String },
}

/// Recoverable per-source adapter failure.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Network-level failure (connect, timeout, body read).
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The remote endpoint answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be interpreted.
    #[error("{0}")]
    Parse(String),

    /// The adapter requires a credential that is not configured.
    #[error("{0}")]
    MissingCredential(String),
}
