// crates/mycel-core/src/event.rs
//
// Collaboration events and the trust edges exported to the ranking oracle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Username;

/// The kind of collaboration signal an event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A pull request was opened. Records activity only.
    Created,
    /// `actor` merged a pull request authored by `subject`.
    Merged,
    /// `actor` approved a pull request authored by `subject`.
    ApprovedReview,
}

/// A single observed collaboration signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborationEvent {
    pub kind: EventKind,
    /// The identity performing the action.
    pub actor: Username,
    /// The identity the action was performed for.
    pub subject: Username,
    pub timestamp: DateTime<Utc>,
}

impl CollaborationEvent {
    pub fn new(
        kind: EventKind,
        actor: impl Into<Username>,
        subject: impl Into<Username>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            actor: actor.into(),
            subject: subject.into(),
            timestamp,
        }
    }

    /// Whether this event contributes a trust edge `actor -> subject`.
    pub fn produces_edge(&self) -> bool {
        self.kind != EventKind::Created && self.actor != self.subject
    }
}

/// A directed, cumulative trust edge handed to the ranking oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustAssignment {
    pub src: Username,
    pub dst: Username,
    /// Sum of decayed contributions, always >= 0.0.
    pub weight: f64,
}
