//! Convenient re-exports for common pgcompare usage.
//!
//! # Example
//!
//! ```no_run
//! use pgcompare::prelude::*;
//!
//! let result = compare_blocking(CompareOptions::new(
//!     "postgres://localhost/staging",
//!     "postgres://localhost/prod",
//! )).unwrap();
//!
//! println!("{}", summary(result.count));
//! ```

// Async functions
pub use crate::api::{compare, save};

// Blocking functions
pub use crate::api::{compare_blocking, save_blocking};

// Options
pub use crate::api::{CompareOptions, SaveOptions};

// Results
pub use crate::api::{CompareResult, SaveResult};

// Error type
pub use crate::api::Error;

// Core types
pub use crate::diff::{Change, ChangeRecord};
pub use crate::model::{ObjectKey, PropertyBag, Scalar, Snapshot, Topic, Value};
pub use crate::report::{render, summary};
