//! # Shardread Storage
//!
//! Reads the complete output of a job that writes its result as a set of
//! shard files (`result-000-of-002`, `result-001-of-002`, ...) to storage
//! whose listings are only eventually consistent.
//!
//! A read lists the pattern, checks that the listing is a complete shard
//! set, and reads every member. Any failure or gap discards the attempt and
//! retries under a backoff policy until the set is complete or the budget
//! runs out.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         ShardedFile                           │
//! │                                                               │
//! │   ┌──────────────────── RetryController ───────────────────┐  │
//! │   │                                                        │  │
//! │   │  ResourceMatcher ──▶ evaluate() ──▶ ShardReader (each) │  │
//! │   │        │                                   │           │  │
//! │   └────────┼───────────────────────────────────┼───────────┘  │
//! │            ▼                                   ▼              │
//! │                  FileSystem (local / memory)                  │
//! └───────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod evaluator;
pub mod filesystem;
pub mod logging;
pub mod matcher;
pub mod reader;
pub mod retry;
pub mod sharded_file;

// Re-exports
pub use config::{ConfigError, LoggingConfig, ShardReadConfig};
pub use error::{AttemptError, ShardedFileError, StorageError, StorageResult};
pub use evaluator::{evaluate, Evaluation, Incompleteness};
pub use filesystem::{FileSystem, LocalFileSystem, MemoryFileSystem};
pub use matcher::ResourceMatcher;
pub use reader::{JsonLinesShardReader, LineShardReader, ShardReader};
pub use retry::{BackOff, BackOffConfig, ExponentialBackOff, RetryController, Sleeper, ThreadSleeper};
pub use sharded_file::ShardedFile;
pub use shardread_core::{parse_shard_name, ResourceId, ShardSpec};
