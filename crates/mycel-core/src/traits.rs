// crates/mycel-core/src/traits.rs

use std::collections::HashMap;

use futures::stream::BoxStream;

use crate::error::MycelError;
use crate::event::TrustAssignment;
use crate::identity::Username;
use crate::records::{Member, PullRequest, Repository, Review};

/// A lazy, cancellable sequence of records. Dropping the stream stops any
/// further page fetches.
pub type RecordStream<'a, T> = BoxStream<'a, Result<T, MycelError>>;

/// Trust score per reachable identity.
pub type ScoreMap = HashMap<Username, f64>;

/// Read-only view of an organization's collaboration history.
///
/// Implemented by mycel-github (REST API) and by in-memory fixtures in tests.
pub trait CollaborationSource: Send + Sync {
    /// Repositories owned by the organization.
    fn repositories(&self) -> RecordStream<'_, Repository>;

    /// Current members of the organization.
    fn members(&self) -> RecordStream<'_, Member>;

    /// Closed pull requests of one repository, merged or not.
    fn closed_pull_requests<'a>(&'a self, repo: &'a str) -> RecordStream<'a, PullRequest>;

    /// Approving reviews of one pull request.
    fn approved_reviews<'a>(&'a self, repo: &'a str, number: u64) -> RecordStream<'a, Review>;
}

/// Seed-rooted trust propagation.
///
/// Implementations must return non-negative, deterministic scores for the
/// identities reachable from `seed`, monotone in the weight of edges into a
/// node. Unreachable identities are absent; callers treat absence as 0.
/// The seed's own entry, if present, is ignored by callers.
///
/// Implemented by mycel-reputation (`OpenRank`).
pub trait TrustRankingOracle: Send + Sync {
    fn rank(&self, seed: &str, edges: &[TrustAssignment]) -> Result<ScoreMap, MycelError>;
}
