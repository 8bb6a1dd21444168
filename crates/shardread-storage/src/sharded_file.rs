//! The sharded-file façade.
//!
//! A [`ShardedFile`] owns one pattern and reads the complete shard set it
//! resolves to, retrying until storage listings settle.
//!
//! # Example
//!
//! ```no_run
//! use shardread_storage::ShardedFile;
//!
//! let output = ShardedFile::new("/tmp/wordcount/result-*")?;
//! for shard in output.read_all_shards()? {
//!     println!("{}", shard);
//! }
//! # Ok::<(), shardread_storage::ShardedFileError>(())
//! ```
//!
//! Tests inject the sleeper and backoff policy directly:
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use shardread_storage::{BackOffConfig, MemoryFileSystem, ShardedFile};
//!
//! let fs = Arc::new(MemoryFileSystem::new());
//! fs.insert("/out/result-000-of-001", "done");
//!
//! let file = ShardedFile::new("/out/result-*")?.with_file_system(fs);
//! let mut backoff = BackOffConfig::immediate(3).backoff();
//! let shards = file.read_all_shards_with(&|_: Duration| {}, &mut backoff)?;
//! assert_eq!(shards, vec!["done".to_string()]);
//! # Ok::<(), shardread_storage::ShardedFileError>(())
//! ```

use crate::error::{AttemptError, ShardedFileError};
use crate::evaluator::{evaluate, Evaluation};
use crate::filesystem::{FileSystem, LocalFileSystem};
use crate::matcher::ResourceMatcher;
use crate::reader::{LineShardReader, ShardReader};
use crate::retry::{BackOff, BackOffConfig, RetryController, Sleeper, ThreadSleeper};
use std::sync::Arc;

/// The complete output of a sharded write, addressed by pattern.
///
/// The pattern is fixed for the life of the instance. Listings, evaluations
/// and contents are rebuilt on every attempt.
#[derive(Debug, Clone)]
pub struct ShardedFile<R = LineShardReader> {
    pattern: String,
    matcher: ResourceMatcher,
    reader: R,
    backoff: BackOffConfig,
}

impl ShardedFile<LineShardReader> {
    /// Creates a line-reading sharded file on the local filesystem.
    ///
    /// Fails with [`ShardedFileError::InvalidArgument`] if `pattern` is empty.
    pub fn new(pattern: impl Into<String>) -> Result<Self, ShardedFileError> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(ShardedFileError::InvalidArgument(pattern));
        }
        Ok(Self {
            pattern,
            matcher: ResourceMatcher::new(Arc::new(LocalFileSystem::new())),
            reader: LineShardReader::new(),
            backoff: BackOffConfig::default(),
        })
    }

    /// Reads every shard with the configured backoff and real sleeps.
    ///
    /// Each entry is one shard's lines joined with `\n`.
    pub fn read_all_shards(&self) -> Result<Vec<String>, ShardedFileError> {
        let mut backoff = self.backoff.backoff();
        self.read_all_shards_with(&ThreadSleeper, &mut backoff)
    }

    /// Reads every shard using the given sleeper and backoff policy.
    ///
    /// Each entry is one shard's lines joined with `\n`; an empty shard
    /// yields `""`.
    pub fn read_all_shards_with(
        &self,
        sleeper: &dyn Sleeper,
        backoff: &mut dyn BackOff,
    ) -> Result<Vec<String>, ShardedFileError> {
        let shards = self.read_shards_with(sleeper, backoff)?;
        Ok(shards.into_iter().map(|lines| lines.join("\n")).collect())
    }

    /// Reads every shard and concatenates their lines.
    pub fn read_all_lines_with(
        &self,
        sleeper: &dyn Sleeper,
        backoff: &mut dyn BackOff,
    ) -> Result<Vec<String>, ShardedFileError> {
        let shards = self.read_shards_with(sleeper, backoff)?;
        Ok(shards.into_iter().flatten().collect())
    }
}

impl<R: ShardReader> ShardedFile<R> {
    /// Replaces the shard reader, e.g. with a record-decoding variant.
    pub fn with_reader<R2: ShardReader>(self, reader: R2) -> ShardedFile<R2> {
        ShardedFile {
            pattern: self.pattern,
            matcher: self.matcher,
            reader,
            backoff: self.backoff,
        }
    }

    /// Replaces the storage layer.
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.matcher = ResourceMatcher::new(fs);
        self
    }

    /// Sets the policy used by the default read entry points.
    pub fn with_backoff(mut self, backoff: BackOffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn backoff_config(&self) -> &BackOffConfig {
        &self.backoff
    }

    /// Reads every shard with the configured backoff and real sleeps.
    pub fn read_shards(&self) -> Result<Vec<R::Output>, ShardedFileError> {
        let mut backoff = self.backoff.backoff();
        self.read_shards_with(&ThreadSleeper, &mut backoff)
    }

    /// Reads every shard, one output per shard, using the given sleeper and
    /// backoff policy.
    ///
    /// Order across shards follows the storage listing and is not part of
    /// the contract.
    pub fn read_shards_with(
        &self,
        sleeper: &dyn Sleeper,
        backoff: &mut dyn BackOff,
    ) -> Result<Vec<R::Output>, ShardedFileError> {
        tracing::debug!(
            pattern = %self.pattern,
            reader = %self.reader.describe(),
            "Reading sharded file"
        );
        RetryController::new(sleeper, backoff).run(|_| self.attempt())
    }

    /// One match, evaluate, read pass. Partial results are dropped on failure.
    fn attempt(&self) -> Result<Vec<R::Output>, AttemptError> {
        let matched = self.matcher.match_pattern(&self.pattern)?;
        let members = match evaluate(&matched) {
            Evaluation::Complete(members) => members,
            Evaluation::Incomplete(reason) => return Err(reason.into()),
        };

        let fs = self.matcher.file_system().as_ref();
        let count = members.len();
        let mut outputs = Vec::with_capacity(count);
        for (i, resource) in members.iter().enumerate() {
            let output = self.reader.read_shard(fs, resource)?;
            tracing::debug!(
                shard = i + 1,
                of = count,
                resource = %resource,
                records = self.reader.record_count(&output),
                "Read shard"
            );
            outputs.push(output);
        }

        tracing::info!(pattern = %self.pattern, shards = count, "Read complete shard set");
        Ok(outputs)
    }
}
