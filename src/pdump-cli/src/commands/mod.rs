//! Command handlers for pdump CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod diff;
pub mod summary;

use anyhow::{Context, Result};
use pdump::{LoadOptions, Snapshot};
use std::path::Path;

/// Load a dump file, attaching the path to any error
fn load_snapshot(path: &Path, options: LoadOptions) -> Result<Snapshot> {
    let snapshot = Snapshot::open(path, options)
        .with_context(|| format!("Failed to load dump {}", path.display()))?;

    if snapshot.skipped() > 0 {
        tracing::warn!(
            path = %path.display(),
            skipped = snapshot.skipped(),
            "some lines were malformed and ignored"
        );
    }

    Ok(snapshot)
}
