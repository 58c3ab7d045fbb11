// crates/mycel-core/src/identity.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unique username on the collaboration platform.
///
/// Identities carry no state of their own; trust and activity live in the
/// registries that are keyed by them.
pub type Username = String;

/// Most recent observed activity for an identity.
///
/// `Never` orders before every timestamp, so taking the maximum of a set of
/// observations always prefers a real timestamp over the sentinel.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case", tag = "kind", content = "at")]
pub enum LastActive {
    /// No activity was ever recorded.
    #[default]
    Never,
    /// Last seen at this instant.
    At(DateTime<Utc>),
}

impl LastActive {
    /// True if the activity is strictly more recent than `cutoff`.
    /// `Never` is never recent.
    pub fn is_after(&self, cutoff: DateTime<Utc>) -> bool {
        match self {
            LastActive::Never => false,
            LastActive::At(at) => *at > cutoff,
        }
    }

    /// True if the activity is strictly older than `cutoff`.
    /// `Never` is always older.
    pub fn is_before(&self, cutoff: DateTime<Utc>) -> bool {
        match self {
            LastActive::Never => true,
            LastActive::At(at) => *at < cutoff,
        }
    }
}
