//! Error types for sharded reads.
//!
//! Only two shapes cross the public read boundary: [`ShardedFileError::InvalidArgument`]
//! for a bad pattern at construction, and [`ShardedFileError::Unavailable`] once
//! the retry budget is spent. Everything else is an [`AttemptError`] that the
//! retry controller absorbs.

use crate::evaluator::Incompleteness;
use thiserror::Error;

/// Result type for storage collaborator operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Failures raised by a [`FileSystem`](crate::filesystem::FileSystem) or a
/// [`ShardReader`](crate::reader::ShardReader).
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error opening, listing or reading a resource
    #[error("I/O error on {resource}: {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    /// The storage layer rejected the match expression
    #[error("Invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A directory entry could not be read while expanding a pattern
    #[error("Failed to list {pattern:?}: {source}")]
    Listing {
        pattern: String,
        #[source]
        source: glob::GlobError,
    },

    /// A structured record could not be decoded
    #[error("Failed to decode line {line} of {resource}: {source}")]
    Decode {
        resource: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Wraps an I/O error with the resource it occurred on.
    pub fn io(resource: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            resource: resource.into(),
            source,
        }
    }
}

/// Why a single read attempt did not produce a result.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// Listing or reading failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The matched set is not (yet) a complete shard set
    #[error("Incomplete shard set: {0}")]
    Incomplete(#[from] Incompleteness),
}

/// Errors returned by [`ShardedFile`](crate::sharded_file::ShardedFile).
#[derive(Debug, Error)]
pub enum ShardedFileError {
    /// The pattern given at construction is unusable; never retried
    #[error("Expected valid file path, but received {0:?}")]
    InvalidArgument(String),

    /// The retry budget ran out before a complete, readable shard set appeared
    #[error("Unable to read file(s) after retrying ({attempts} attempts)")]
    Unavailable {
        attempts: u32,
        #[source]
        last_error: Option<AttemptError>,
    },
}

impl ShardedFileError {
    /// Returns true for configuration errors raised at construction.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns true if the data never became available.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Returns the last transient failure observed before giving up.
    pub fn last_error(&self) -> Option<&AttemptError> {
        match self {
            Self::Unavailable { last_error, .. } => last_error.as_ref(),
            Self::InvalidArgument(_) => None,
        }
    }
}
