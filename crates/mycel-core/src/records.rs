// crates/mycel-core/src/records.rs
//
// Strongly typed records produced by a collaboration source. Payloads are
// validated once at the source boundary and only these shapes reach the
// aggregation code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Username;

/// A repository owned by the organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
}

/// A current member of the organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub username: Username,
}

/// A closed pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub author: Username,
    pub created_at: DateTime<Utc>,
    /// Set only when the pull request was merged (closed-unmerged otherwise).
    pub merged_at: Option<DateTime<Utc>>,
    /// The merging identity, when the source could resolve it.
    pub merged_by: Option<Username>,
}

impl PullRequest {
    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }
}

/// An approving review on a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub reviewer: Username,
    /// Missing for reviews the platform never timestamped.
    pub submitted_at: Option<DateTime<Utc>>,
}
