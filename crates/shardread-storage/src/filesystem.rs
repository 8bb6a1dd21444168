//! Storage collaborators.
//!
//! A [`FileSystem`] knows how to expand a match expression into resources and
//! how to open one resource for reading. Two implementations ship here:
//!
//! - [`LocalFileSystem`] - the local disk, patterns expanded with `glob`
//! - [`MemoryFileSystem`] - an in-process store whose listings can lag behind
//!   writes and whose operations can be made to fail, for modelling
//!   eventually-consistent object stores
//!
//! # Example
//!
//! ```
//! use shardread_storage::filesystem::{FileSystem, MemoryFileSystem};
//!
//! let fs = MemoryFileSystem::new();
//! fs.insert("/out/result-000-of-001", "hello");
//!
//! let matched = fs.match_pattern("/out/result-*").unwrap();
//! assert_eq!(matched.len(), 1);
//! ```

use crate::error::{StorageError, StorageResult};
use glob::{MatchOptions, Pattern};
use parking_lot::Mutex;
use shardread_core::ResourceId;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::Path;

/// Listing and reading capability of a storage layer.
///
/// Implementations must not cache listings: every call to
/// [`match_pattern`](FileSystem::match_pattern) reflects storage as it is now.
pub trait FileSystem: Send + Sync + fmt::Debug {
    /// Returns every resource matched by `pattern`.
    ///
    /// Glob syntax is this layer's contract. An empty result is not an error.
    fn match_pattern(&self, pattern: &str) -> StorageResult<Vec<ResourceId>>;

    /// Opens a matched resource for reading.
    fn open(&self, resource: &ResourceId) -> StorageResult<Box<dyn Read + Send>>;
}

// =============================================================================
// Local filesystem
// =============================================================================

/// The local disk.
///
/// Supports standard glob syntax: `*`, `?`, `**` and `[...]` classes.
/// Only regular files are returned; directories matching the pattern are
/// skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    fn match_pattern(&self, pattern: &str) -> StorageResult<Vec<ResourceId>> {
        let paths = glob::glob(pattern).map_err(|source| StorageError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut matched = Vec::new();
        for entry in paths {
            let path = entry.map_err(|source| StorageError::Listing {
                pattern: pattern.to_string(),
                source,
            })?;
            if path.is_file() {
                matched.push(ResourceId::new(path.to_string_lossy().into_owned()));
            }
        }
        Ok(matched)
    }

    fn open(&self, resource: &ResourceId) -> StorageResult<Box<dyn Read + Send>> {
        let file = File::open(Path::new(resource.as_str()))
            .map_err(|e| StorageError::io(resource.as_str(), e))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

// =============================================================================
// In-memory filesystem
// =============================================================================

#[derive(Debug)]
struct MemoryFile {
    contents: Vec<u8>,
    /// Number of upcoming listings this file is still missing from.
    hidden_listings: u32,
    /// Number of upcoming opens that fail.
    read_failures: u32,
}

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<String, MemoryFile>,
    listing_failures: u32,
    listings: u64,
}

/// In-process storage with controllable listing lag and failures.
///
/// Paths are plain strings; `*` and `?` in patterns do not cross `/`.
/// Each call to [`match_pattern`](FileSystem::match_pattern) counts as one
/// listing, whether or not it succeeds.
#[derive(Default)]
pub struct MemoryFileSystem {
    state: Mutex<MemoryState>,
}

impl MemoryFileSystem {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a file that is visible to the next listing.
    pub fn insert(&self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.insert_delayed(path, contents, 0);
    }

    /// Writes a file that stays out of the next `hidden_listings` listings.
    ///
    /// Overwrites any existing file at `path`.
    pub fn insert_delayed(
        &self,
        path: impl Into<String>,
        contents: impl Into<Vec<u8>>,
        hidden_listings: u32,
    ) {
        self.state.lock().files.insert(
            path.into(),
            MemoryFile {
                contents: contents.into(),
                hidden_listings,
                read_failures: 0,
            },
        );
    }

    /// Deletes a file. Returns true if it existed.
    pub fn remove(&self, path: &str) -> bool {
        self.state.lock().files.remove(path).is_some()
    }

    /// Makes the next `count` listings fail with an I/O error.
    pub fn fail_next_listings(&self, count: u32) {
        self.state.lock().listing_failures = count;
    }

    /// Makes the next `count` opens of `path` fail with an I/O error.
    ///
    /// Has no effect if `path` does not exist.
    pub fn fail_next_reads(&self, path: &str, count: u32) {
        if let Some(file) = self.state.lock().files.get_mut(path) {
            file.read_failures = count;
        }
    }

    /// Number of listings served so far, failed ones included.
    pub fn listing_count(&self) -> u64 {
        self.state.lock().listings
    }

    /// Number of files stored, visible or not.
    pub fn len(&self) -> usize {
        self.state.lock().files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for MemoryFileSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryFileSystem")
            .field("files", &state.files.len())
            .field("listings", &state.listings)
            .finish()
    }
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

impl FileSystem for MemoryFileSystem {
    fn match_pattern(&self, pattern: &str) -> StorageResult<Vec<ResourceId>> {
        let mut state = self.state.lock();
        state.listings += 1;

        // Lag elapses with every listing, failed or not.
        let mut visible = Vec::new();
        for (path, file) in state.files.iter_mut() {
            if file.hidden_listings > 0 {
                file.hidden_listings -= 1;
            } else {
                visible.push(path.clone());
            }
        }

        if state.listing_failures > 0 {
            state.listing_failures -= 1;
            return Err(StorageError::io(
                pattern,
                io::Error::new(io::ErrorKind::Other, "listing unavailable"),
            ));
        }

        let matcher = Pattern::new(pattern).map_err(|source| StorageError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(visible
            .into_iter()
            .filter(|path| matcher.matches_with(path, MATCH_OPTIONS))
            .map(ResourceId::new)
            .collect())
    }

    fn open(&self, resource: &ResourceId) -> StorageResult<Box<dyn Read + Send>> {
        let mut state = self.state.lock();
        let file = state.files.get_mut(resource.as_str()).ok_or_else(|| {
            StorageError::io(
                resource.as_str(),
                io::Error::new(io::ErrorKind::NotFound, "no such file"),
            )
        })?;

        if file.read_failures > 0 {
            file.read_failures -= 1;
            return Err(StorageError::io(
                resource.as_str(),
                io::Error::new(io::ErrorKind::Other, "read unavailable"),
            ));
        }

        Ok(Box::new(Cursor::new(file.contents.clone())))
    }
}
