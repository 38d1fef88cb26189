//! Content snapshot writer.
//!
//! Serializes the snapshot and replaces the previous artifact atomically:
//! the document is written to a sibling temp file and renamed over the
//! target, so a reader never observes a partial snapshot.

use crate::models::Snapshot;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Write the snapshot to `path`, creating parent directories as needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &json).await?;
    fs::rename(&tmp, path).await?;

    info!(bytes = json.len(), "Wrote content snapshot");
    Ok(())
}
