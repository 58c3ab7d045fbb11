// crates/mycel-core/src/decision.rs
//
// Decision-time views: the persons the policy engine evaluates and the
// membership actions it proposes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{LastActive, Username};

/// A person as seen by the policy engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub username: Username,
    /// Propagated trust. The seed carries `f64::INFINITY`.
    pub trust: f64,
    pub is_member: bool,
    pub last_active: LastActive,
}

/// The membership action being proposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DecisionAction {
    Add,
    Remove,
}

impl fmt::Display for DecisionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionAction::Add => write!(f, "ADD"),
            DecisionAction::Remove => write!(f, "REMOVE"),
        }
    }
}

/// Why a member is proposed for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    Inactive,
    LowTrust,
}

/// A proposed membership change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: DecisionAction,
    pub username: Username,
    pub reason: String,
    pub trust: f64,
    pub last_active: LastActive,
}

impl Decision {
    pub fn add(person: &Person) -> Self {
        Self {
            action: DecisionAction::Add,
            username: person.username.clone(),
            reason: "trusted and recently active".to_string(),
            trust: person.trust,
            last_active: person.last_active,
        }
    }

    pub fn remove(person: &Person, reason: RemovalReason) -> Self {
        let reason = match reason {
            RemovalReason::Inactive => "inactive",
            RemovalReason::LowTrust => "low trust",
        };
        Self {
            action: DecisionAction::Remove,
            username: person.username.clone(),
            reason: reason.to_string(),
            trust: person.trust,
            last_active: person.last_active,
        }
    }

    /// One-line operator notice, e.g.
    /// `REMOVE @bob: inactive (trust 8.00, last active 396 days ago)`.
    pub fn notice(&self, now: DateTime<Utc>) -> String {
        format!(
            "{} @{}: {} (trust {}, last active {})",
            self.action,
            self.username,
            self.reason,
            format_trust(self.trust),
            format_last_active(self.last_active, now)
        )
    }
}

/// Render a trust score with two decimals, `inf` for the seed.
pub fn format_trust(trust: f64) -> String {
    if trust.is_infinite() {
        "inf".to_string()
    } else {
        format!("{:.2}", trust)
    }
}

/// Coarse relative rendering of an activity timestamp.
pub fn format_last_active(last_active: LastActive, now: DateTime<Utc>) -> String {
    match last_active {
        LastActive::Never => "never".to_string(),
        LastActive::At(at) => {
            let days = (now - at).num_days();
            match days {
                d if d < 0 => format!("in the future ({})", at.to_rfc3339()),
                0 => "today".to_string(),
                1 => "1 day ago".to_string(),
                d => format!("{} days ago", d),
            }
        }
    }
}
