//! Pattern resolution against a storage layer.

use crate::error::StorageResult;
use crate::filesystem::FileSystem;
use shardread_core::ResourceId;
use std::sync::Arc;

/// Resolves a pattern to the set of resources it currently matches.
///
/// Holds no state besides the storage handle: every call lists storage
/// again, so a later call observes files that appeared in between.
#[derive(Debug, Clone)]
pub struct ResourceMatcher {
    fs: Arc<dyn FileSystem>,
}

impl ResourceMatcher {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Returns the matched resources, sorted and without duplicates.
    ///
    /// A listing failure is returned as-is; retrying is the caller's call.
    pub fn match_pattern(&self, pattern: &str) -> StorageResult<Vec<ResourceId>> {
        let mut matched = self.fs.match_pattern(pattern)?;
        matched.sort();
        matched.dedup();

        tracing::debug!(
            pattern = pattern,
            count = matched.len(),
            resources = ?matched,
            "Matched resources"
        );
        Ok(matched)
    }

    /// Returns the storage handle this matcher lists.
    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }
}
