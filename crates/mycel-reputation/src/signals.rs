// crates/mycel-reputation/src/signals.rs
//
// Turning collaborator records into collaboration events, and folding events
// into the owned graph + activity aggregates for one run.

use chrono::{DateTime, Utc};

use mycel_core::{
    CollaborationEvent, EventKind, LastActive, MycelError, PullRequest, Review, TrustAssignment,
    Username,
};

use crate::activity::ActivityRegistry;
use crate::trust_graph::TrustGraphBuilder;

/// Derive the collaboration events carried by one closed pull request.
///
/// - Every pull request yields a `Created` event for its author.
/// - A merged pull request yields a `Merged` event when the merger is known;
///   otherwise only the merge edge is dropped.
/// - Approving reviews on a merged pull request yield `ApprovedReview`
///   events. A review without a timestamp is dropped on its own.
pub fn events_for_pull_request(
    repo: &str,
    pr: &PullRequest,
    reviews: &[Review],
) -> Vec<CollaborationEvent> {
    let mut events = vec![CollaborationEvent::new(
        EventKind::Created,
        pr.author.clone(),
        pr.author.clone(),
        pr.created_at,
    )];

    let Some(merged_at) = pr.merged_at else {
        return events;
    };

    match &pr.merged_by {
        Some(merger) => events.push(CollaborationEvent::new(
            EventKind::Merged,
            merger.clone(),
            pr.author.clone(),
            merged_at,
        )),
        None => tracing::warn!(
            "{}#{} was merged but the merger is unknown; skipping merge signal",
            repo,
            pr.number
        ),
    }

    for review in reviews {
        match review.submitted_at {
            Some(at) => events.push(CollaborationEvent::new(
                EventKind::ApprovedReview,
                review.reviewer.clone(),
                pr.author.clone(),
                at,
            )),
            None => tracing::warn!(
                "Approval by {} on {}#{} has no timestamp; skipping",
                review.reviewer,
                repo,
                pr.number
            ),
        }
    }

    events
}

/// The per-run aggregates: a decayed trust graph and last-seen activity.
///
/// Both parts are commutative accumulations (sum and max), so aggregators
/// built from disjoint event sets can be merged in any order.
#[derive(Debug, Clone)]
pub struct SignalAggregator {
    pub graph: TrustGraphBuilder,
    pub activity: ActivityRegistry,
}

impl SignalAggregator {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            graph: TrustGraphBuilder::new(now),
            activity: ActivityRegistry::new(),
        }
    }

    /// Ensure every current member is represented, even with no activity.
    pub fn seed_members<'a>(&mut self, members: impl IntoIterator<Item = &'a Username>) {
        for member in members {
            self.activity.seed(member);
        }
    }

    /// Fold one event: the actor is seen at the event time, and a vouching
    /// event adds a trust edge actor -> subject.
    pub fn apply(&mut self, event: &CollaborationEvent) -> Result<(), MycelError> {
        self.activity.update(&event.actor, event.timestamp);
        if event.produces_edge() {
            self.graph
                .update(&event.actor, &event.subject, event.timestamp)?;
        }
        Ok(())
    }

    pub fn apply_all<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a CollaborationEvent>,
    ) -> Result<(), MycelError> {
        for event in events {
            self.apply(event)?;
        }
        Ok(())
    }

    pub fn merge(&mut self, other: SignalAggregator) {
        self.graph.merge(other.graph);
        self.activity.merge(other.activity);
    }

    pub fn last_active(&self, identity: &str) -> LastActive {
        self.activity.get(identity)
    }

    pub fn assignments(&self) -> Vec<TrustAssignment> {
        self.graph.export_assignments()
    }
}
