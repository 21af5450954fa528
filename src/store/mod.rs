//! Persisted snapshot files for offline comparison.
//!
//! A snapshot serializes to pretty-printed JSON with all maps ordered, so
//! two captures of an unchanged database write byte-identical files.

use crate::model::Snapshot;
use crate::pg::{capture_snapshot, PgConnection};
use crate::util::{CompareError, Result};
use std::path::Path;

pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| CompareError::SnapshotFormat(format!("Failed to serialize snapshot: {e}")))?;
    std::fs::write(path, json + "\n")
        .map_err(|e| CompareError::SnapshotIo(format!("Failed to write {}: {e}", path.display())))
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CompareError::SnapshotIo(format!("Failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| {
        CompareError::SnapshotFormat(format!("{} is not a valid snapshot: {e}", path.display()))
    })
}

/// Resolves one comparison side: a path to an existing file is loaded as a
/// saved snapshot, anything else is treated as a connection string and
/// captured live.
pub async fn resolve_target(
    target: &str,
    schemas: &[String],
    ignore_partitions: bool,
) -> Result<Snapshot> {
    let path = Path::new(target);
    if path.exists() {
        load_snapshot(path)
    } else {
        let connection = PgConnection::new(target).await?;
        capture_snapshot(&connection, schemas, ignore_partitions).await
    }
}
