// crates/mycel-policy/src/engine.rs
//
// The two-pass membership decision procedure.
//
// ADD pass: walk persons by trust descending and propose every trusted,
// recently active non-member. REMOVE pass: walk members by trust ascending
// and propose removing inactive or under-trusted members, never letting the
// provisional roster fall below the configured floor.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mycel_core::{Decision, Person, RemovalReason};

use crate::config::PolicyConfig;

/// The ordered decisions of one run plus the roster size they would produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSet {
    pub decisions: Vec<Decision>,
    /// Roster size after applying every decision, starting from the
    /// current member count.
    pub provisional_member_count: usize,
}

impl DecisionSet {
    pub fn count(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

/// Stateless decision procedure over a persons list.
#[derive(Debug, Clone)]
pub struct MembershipPolicyEngine {
    config: PolicyConfig,
}

impl MembershipPolicyEngine {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// Run both passes.
    ///
    /// # Arguments
    /// * `persons` - Decision-time view, blocklisted identities already removed.
    /// * `member_count` - Size of the current roster (the provisional count's start).
    /// * `now` - Reference instant for the inactivity window.
    pub fn decide(&self, persons: &[Person], member_count: usize, now: DateTime<Utc>) -> DecisionSet {
        let cutoff = self.config.activity_cutoff(now);
        let threshold = self.config.trust_threshold;

        let mut ranked: Vec<&Person> = persons
            .iter()
            .filter(|p| p.username != self.config.pioneer && !self.config.is_blocked(&p.username))
            .collect();
        ranked.sort_by(|a, b| by_trust_descending(a, b));

        let mut decisions = Vec::new();
        let mut provisional = member_count;

        for person in &ranked {
            if person.is_member {
                continue;
            }
            if person.trust >= threshold && person.last_active.is_after(cutoff) {
                tracing::debug!("ADD {} (trust {})", person.username, person.trust);
                decisions.push(Decision::add(person));
                provisional += 1;
            }
        }

        ranked.sort_by(|a, b| by_trust_ascending(a, b));

        for person in ranked.iter().filter(|p| p.is_member) {
            if provisional <= self.config.min_member_count {
                tracing::info!(
                    "Membership floor of {} reached; no further removals considered",
                    self.config.min_member_count
                );
                break;
            }
            let reason = if person.last_active.is_before(cutoff) {
                RemovalReason::Inactive
            } else if person.trust < threshold {
                RemovalReason::LowTrust
            } else {
                continue;
            };
            tracing::debug!("REMOVE {} ({:?})", person.username, reason);
            decisions.push(Decision::remove(person, reason));
            provisional -= 1;
        }

        DecisionSet {
            decisions,
            provisional_member_count: provisional,
        }
    }
}

fn by_trust_descending(a: &Person, b: &Person) -> Ordering {
    b.trust
        .total_cmp(&a.trust)
        .then_with(|| a.username.cmp(&b.username))
}

fn by_trust_ascending(a: &Person, b: &Person) -> Ordering {
    a.trust
        .total_cmp(&b.trust)
        .then_with(|| a.username.cmp(&b.username))
}
