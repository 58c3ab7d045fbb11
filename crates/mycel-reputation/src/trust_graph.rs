// crates/mycel-reputation/src/trust_graph.rs
//
// Trust graph: cumulative, decayed edge weights between identities.
//
// Each entry W(src, dst) is the sum of decay factors of every signal in which
// `src` vouched for `dst` (approved or merged their work).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use mycel_core::{MycelError, TrustAssignment, Username};

use crate::decay::decay_factor;

/// A sparse, directed trust graph built once per run.
///
/// Entries are kept ordered by (source, destination) so exports are
/// deterministic. There is no removal operation.
#[derive(Debug, Clone)]
pub struct TrustGraphBuilder {
    /// Reference instant for decay.
    now: DateTime<Utc>,
    /// Sparse entries: (src, dst) -> cumulative weight.
    entries: BTreeMap<(Username, Username), f64>,
}

impl TrustGraphBuilder {
    /// Create an empty graph that decays signals relative to `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            entries: BTreeMap::new(),
        }
    }

    /// Record that `src` vouched for `dst` at `at`.
    ///
    /// Adds `decay_factor(at, now)` to W(src, dst). Self-edges are rejected.
    pub fn update(&mut self, src: &str, dst: &str, at: DateTime<Utc>) -> Result<(), MycelError> {
        if src == dst {
            return Err(MycelError::InvalidInput(format!(
                "self-edge for {} is not a trust signal",
                src
            )));
        }
        let weight = decay_factor(at, self.now);
        *self
            .entries
            .entry((src.to_string(), dst.to_string()))
            .or_insert(0.0) += weight;
        Ok(())
    }

    /// Get W(src, dst). Returns 0.0 if no signal connects them.
    pub fn weight(&self, src: &str, dst: &str) -> f64 {
        self.entries
            .get(&(src.to_string(), dst.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Fold another graph's weights into this one. Weights add, so the
    /// result does not depend on merge order.
    pub fn merge(&mut self, other: TrustGraphBuilder) {
        for (pair, weight) in other.entries {
            *self.entries.entry(pair).or_insert(0.0) += weight;
        }
    }

    /// Number of distinct edges.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All edges sorted by source, then destination.
    pub fn export_assignments(&self) -> Vec<TrustAssignment> {
        self.entries
            .iter()
            .map(|((src, dst), &weight)| TrustAssignment {
                src: src.clone(),
                dst: dst.clone(),
                weight,
            })
            .collect()
    }
}
