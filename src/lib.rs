//! pgcompare - PostgreSQL schema comparison library.
//!
//! Compares the tables, columns, indexes and constraints of two PostgreSQL
//! databases (or previously captured snapshots of them) and reports every
//! structural difference. Useful for drift detection between environments,
//! e.g. staging vs. production.
//!
//! # Quick Start
//!
//! Use the high-level API via the [`api`] module or [`prelude`]:
//!
//! ```no_run
//! use pgcompare::prelude::*;
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
//! # Modules
//!
//! - [`api`] - High-level API mirroring CLI commands
//! - [`prelude`] - Convenient re-exports for common usage
//! - [`model`] - Snapshot model types (Snapshot, ObjectKey, Value, ...)
//! - [`snapshot`] - Catalog row normalization and partition exclusion
//! - [`diff`] - Recursive structural comparison
//! - [`report`] - Diff line rendering
//! - [`store`] - Persisted snapshot files

pub mod api;
pub mod diff;
pub mod model;
pub mod pg;
pub mod prelude;
pub mod report;
pub mod snapshot;
pub mod store;
pub mod util;
