use crate::util::CompareError;
use thiserror::Error;

/// Structured error type for pgcompare library operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Database connection failed: {message}")]
    Connection { message: String },

    #[error("Catalog introspection failed: {message}")]
    Introspection { message: String },

    #[error("Snapshot file error: {message}")]
    Snapshot { message: String },

    #[error("Runtime error: {message}")]
    Runtime { message: String },
}

impl Error {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn introspection(message: impl Into<String>) -> Self {
        Self::Introspection {
            message: message.into(),
        }
    }

    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::Snapshot {
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }
}

impl From<CompareError> for Error {
    fn from(err: CompareError) -> Self {
        match err {
            CompareError::Database(message) => Error::Connection { message },
            CompareError::MalformedRow(message) => Error::Introspection { message },
            CompareError::SnapshotIo(message) | CompareError::SnapshotFormat(message) => {
                Error::Snapshot { message }
            }
        }
    }
}
