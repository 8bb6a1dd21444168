//! Shard-set completeness.
//!
//! Decides whether the resources matched in one attempt form the full,
//! final output of the writer.
//!
//! # Rules
//!
//! - **Convention present**: if any name parses as `<prefix>-<index>-of-<total>`,
//!   only those names count. The set is complete when every one shares the
//!   same `total`, every index lies in `[0, total)`, and the number of
//!   distinct indices equals `total`. Names without the convention (temp
//!   files, markers) are dropped and never read.
//! - **Convention absent**: any non-empty set is accepted as-is.
//! - **Empty set**: never complete.
//!
//! Two different `total` values in the same listing are reported as
//! [`Incompleteness::MixedTotals`]; the attempt is retried rather than
//! guessing which output is current.

use shardread_core::{parse_shard_name, ResourceId, ShardSpec};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

/// Why a matched set was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Incompleteness {
    /// Nothing matched the pattern
    #[error("no resources matched the pattern")]
    Empty,

    /// Fewer distinct shard indices than the declared total
    #[error("found {found} of {total} declared shards")]
    MissingShards { total: u32, found: usize },

    /// A shard name declares an index outside `[0, total)`
    #[error("shard {name} has index {index} outside of [0, {total})")]
    IndexOutOfRange { name: String, index: u32, total: u32 },

    /// Shard names disagree on the declared total
    #[error("shard names declare conflicting totals {0:?}")]
    MixedTotals(Vec<u32>),
}

/// Outcome of evaluating one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// The resources to read, in presentation order
    Complete(Vec<ResourceId>),
    /// The attempt must be retried
    Incomplete(Incompleteness),
}

impl Evaluation {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Evaluates a matched set against the completeness rules above.
///
/// Pure: the result depends only on `matched`.
pub fn evaluate(matched: &[ResourceId]) -> Evaluation {
    if matched.is_empty() {
        return Evaluation::Incomplete(Incompleteness::Empty);
    }

    let numbered: Vec<(&ResourceId, ShardSpec)> = matched
        .iter()
        .filter_map(|id| parse_shard_name(id.file_name()).map(|spec| (id, spec)))
        .collect();

    if numbered.is_empty() {
        return Evaluation::Complete(matched.to_vec());
    }

    let totals: BTreeSet<u32> = numbered.iter().map(|(_, spec)| spec.total).collect();
    if totals.len() > 1 {
        return Evaluation::Incomplete(Incompleteness::MixedTotals(
            totals.into_iter().collect(),
        ));
    }
    let total = numbered[0].1.total;

    if let Some((id, spec)) = numbered.iter().find(|(_, spec)| !spec.in_range()) {
        return Evaluation::Incomplete(Incompleteness::IndexOutOfRange {
            name: id.file_name().to_string(),
            index: spec.index,
            total,
        });
    }

    let distinct: HashSet<u32> = numbered.iter().map(|(_, spec)| spec.index).collect();
    if distinct.len() != total as usize {
        return Evaluation::Incomplete(Incompleteness::MissingShards {
            total,
            found: distinct.len(),
        });
    }

    Evaluation::Complete(numbered.into_iter().map(|(id, _)| id.clone()).collect())
}
