//! Shard content readers.
//!
//! A [`ShardReader`] turns one matched resource into its logical content.
//! Retry and completeness logic only ever see the trait, so a new content
//! type needs a new reader and nothing else.
//!
//! - [`LineShardReader`] - UTF-8 text as a sequence of lines
//! - [`JsonLinesShardReader`] - one JSON record per non-blank line

use crate::error::{StorageError, StorageResult};
use crate::filesystem::FileSystem;
use serde::de::DeserializeOwned;
use shardread_core::ResourceId;
use std::fmt;
use std::io::{BufRead, BufReader};
use std::marker::PhantomData;

/// Reads one resource into its logical unit.
pub trait ShardReader: Send + Sync {
    /// Content produced for a single shard.
    type Output;

    /// Reads `resource` in full. Any failure fails the whole shard.
    fn read_shard(&self, fs: &dyn FileSystem, resource: &ResourceId)
        -> StorageResult<Self::Output>;

    /// Number of lines or records in one shard's output, for logging.
    fn record_count(&self, output: &Self::Output) -> usize;

    /// Returns a description of the reader for logging.
    fn describe(&self) -> String;
}

fn read_lines(fs: &dyn FileSystem, resource: &ResourceId) -> StorageResult<Vec<String>> {
    let reader = BufReader::new(fs.open(resource)?);
    reader
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::io(resource.as_str(), e))
}

// =============================================================================
// Lines
// =============================================================================

/// Reads UTF-8 text split on `\n` or `\r\n`.
///
/// An empty resource yields no lines. A trailing newline does not produce a
/// final empty line. Invalid UTF-8 is an I/O failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineShardReader;

impl LineShardReader {
    pub fn new() -> Self {
        Self
    }
}

impl ShardReader for LineShardReader {
    type Output = Vec<String>;

    fn read_shard(&self, fs: &dyn FileSystem, resource: &ResourceId) -> StorageResult<Vec<String>> {
        read_lines(fs, resource)
    }

    fn record_count(&self, output: &Vec<String>) -> usize {
        output.len()
    }

    fn describe(&self) -> String {
        "LineShardReader".to_string()
    }
}

// =============================================================================
// JSON lines
// =============================================================================

/// Decodes one `T` per non-blank line.
///
/// A line that fails to decode fails the shard with
/// [`StorageError::Decode`], which is retried like any other read failure.
pub struct JsonLinesShardReader<T> {
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonLinesShardReader<T> {
    pub fn new() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<T> Default for JsonLinesShardReader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonLinesShardReader<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonLinesShardReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format!("JsonLinesShardReader<{}>", std::any::type_name::<T>()))
    }
}

impl<T: DeserializeOwned> ShardReader for JsonLinesShardReader<T> {
    type Output = Vec<T>;

    fn read_shard(&self, fs: &dyn FileSystem, resource: &ResourceId) -> StorageResult<Vec<T>> {
        read_lines(fs, resource)?
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|source| StorageError::Decode {
                    resource: resource.to_string(),
                    line: i + 1,
                    source,
                })
            })
            .collect()
    }

    fn record_count(&self, output: &Vec<T>) -> usize {
        output.len()
    }

    fn describe(&self) -> String {
        format!("JsonLinesShardReader<{}>", std::any::type_name::<T>())
    }
}
