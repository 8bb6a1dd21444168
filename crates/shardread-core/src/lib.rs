//! # Shardread Core
//!
//! Core types for reading sharded job output.
//!
//! This crate provides the storage-independent building blocks:
//! - [`ResourceId`] - Opaque handle to one matched storage object
//! - [`ShardSpec`] - The `index`/`total` pair encoded in a shard name
//! - [`parse_shard_name`] - Pure parser for the `<prefix>-<index>-of-<total>` convention

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

/// An opaque handle to a concrete storage object matched by a pattern.
///
/// Resource identifiers are produced fresh by every listing and are never
/// cached between attempts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a new ResourceId from a storage path or URI.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last path component, the shard name.
    ///
    /// Both `/` and `\` are treated as separators. A trailing separator
    /// yields an empty name.
    pub fn file_name(&self) -> &str {
        match self.0.rfind(['/', '\\']) {
            Some(pos) => &self.0[pos + 1..],
            None => &self.0,
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Shard naming convention
// =============================================================================

/// Position of one shard within a declared shard set.
///
/// Parsed from names such as `result-001-of-002` (index 1 of 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShardSpec {
    /// Zero-based shard number.
    pub index: u32,
    /// Declared number of shards in the set.
    pub total: u32,
}

impl ShardSpec {
    /// Creates a new ShardSpec.
    #[inline]
    pub const fn new(index: u32, total: u32) -> Self {
        Self { index, total }
    }

    /// Returns true if `index` lies in `[0, total)`.
    #[inline]
    pub const fn in_range(&self) -> bool {
        self.index < self.total
    }
}

impl fmt::Display for ShardSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-of-{}", self.index, self.total)
    }
}

const OF_SEPARATOR: &str = "-of-";

/// Parses a shard name of the form `<prefix>-<index>-of-<total>`.
///
/// The whole name must match: `index` and `total` are non-empty runs of
/// ASCII digits, and `prefix` is non-empty. Their widths may differ, so a
/// writer whose zero-padding is narrower than its shard count
/// (`result-00000-of-100000`) still declares a total. Anything else (a
/// missing suffix, stray characters after `total`, malformed digits, values
/// that overflow `u32`) returns `None`.
///
/// The index is not checked against the total here; see
/// [`ShardSpec::in_range`].
///
/// # Example
///
/// ```
/// use shardread_core::{parse_shard_name, ShardSpec};
///
/// assert_eq!(parse_shard_name("result-001-of-002"), Some(ShardSpec::new(1, 2)));
/// assert_eq!(parse_shard_name("result"), None);
/// ```
pub fn parse_shard_name(name: &str) -> Option<ShardSpec> {
    let of_pos = name.rfind(OF_SEPARATOR)?;
    let total_digits = &name[of_pos + OF_SEPARATOR.len()..];
    let head = &name[..of_pos];

    let dash = head.rfind('-')?;
    let index_digits = &head[dash + 1..];
    let prefix = &head[..dash];

    if prefix.is_empty() || !is_digits(index_digits) || !is_digits(total_digits) {
        return None;
    }

    let index = index_digits.parse().ok()?;
    let total = total_digits.parse().ok()?;
    Some(ShardSpec { index, total })
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
