//! High-level API for embedding pgcompare in other applications.
//!
//! This module provides functions that mirror CLI commands with structured
//! inputs and outputs. Both async and blocking variants are available.
//!
//! # Example
//!
//! ```no_run
//! use pgcompare::api::{compare_blocking, CompareOptions};
//!
//! let result = compare_blocking(CompareOptions::new(
//!     "postgres://localhost/staging",
//!     "postgres://localhost/prod",
//! )).unwrap();
//!
//! for line in &result.lines {
//!     println!("{}", line);
//! }
//! ```
//!
//! # Async vs Blocking
//!
//! All functions have both async and blocking variants. Use async when you
//! already have a tokio runtime. Blocking variants create a new tokio
//! runtime per call, so prefer the async API for high-frequency usage.

mod error;
mod options;
mod results;

pub use error::Error;
pub use options::{CompareOptions, SaveOptions};
pub use results::{CompareResult, SaveResult};

use crate::diff::diff;
use crate::pg::{capture_snapshot, PgConnection};
use crate::{report, store};
use std::collections::BTreeSet;
use std::path::Path;

/// Compare two databases or saved snapshots and report every structural
/// difference.
///
/// The two sides are resolved concurrently; a snapshot is immutable once
/// built, so the diff always sees fully-formed inputs. Schema and
/// partition filters are re-applied after loading so a saved snapshot
/// captured with different options still compares under the current ones.
pub async fn compare(options: CompareOptions) -> Result<CompareResult, Error> {
    let (mut a, mut b) = tokio::try_join!(
        store::resolve_target(&options.target_a, &options.schemas, options.ignore_partitions),
        store::resolve_target(&options.target_b, &options.schemas, options.ignore_partitions),
    )?;

    if !options.schemas.is_empty() {
        a.retain_schemas(&options.schemas);
        b.retain_schemas(&options.schemas);
    }
    if options.ignore_partitions {
        let partitions: BTreeSet<String> = a.partitions.union(&b.partitions).cloned().collect();
        a.exclude_relations(&partitions);
        b.exclude_relations(&partitions);
    }

    let records = diff(&a, &b);
    let (lines, count) = report::render(&records);
    Ok(CompareResult {
        is_identical: count == 0,
        records,
        lines,
        count,
    })
}

/// Capture a database schema snapshot and write it to a file.
pub async fn save(options: SaveOptions) -> Result<SaveResult, Error> {
    let connection = PgConnection::new(&options.database_url).await?;
    let snapshot =
        capture_snapshot(&connection, &options.schemas, options.ignore_partitions).await?;
    store::save_snapshot(Path::new(&options.output_path), &snapshot)?;

    Ok(SaveResult {
        path: options.output_path,
        fingerprint: snapshot.fingerprint(),
        object_count: snapshot.objects.len(),
    })
}

// ============================================================================
// Blocking variants
// ============================================================================

fn create_runtime() -> Result<tokio::runtime::Runtime, Error> {
    tokio::runtime::Runtime::new().map_err(|e| Error::runtime(e.to_string()))
}

/// Blocking variant of [`compare`].
///
/// Creates a new tokio runtime for each call. For high-frequency usage,
/// prefer the async API with a shared runtime.
pub fn compare_blocking(options: CompareOptions) -> Result<CompareResult, Error> {
    create_runtime()?.block_on(compare(options))
}

/// Blocking variant of [`save`].
pub fn save_blocking(options: SaveOptions) -> Result<SaveResult, Error> {
    create_runtime()?.block_on(save(options))
}
