// crates/mycel-reputation/src/activity.rs
//
// Last-seen activity per identity.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use mycel_core::{LastActive, Username};

/// Tracks the most recent activity timestamp observed for each identity.
#[derive(Debug, Clone, Default)]
pub struct ActivityRegistry {
    last_seen: HashMap<Username, LastActive>,
}

impl ActivityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `identity` with no activity, unless it is already known.
    pub fn seed(&mut self, identity: &str) {
        self.last_seen
            .entry(identity.to_string())
            .or_insert(LastActive::Never);
    }

    /// Keep `at` if it is the first or the latest timestamp seen for `identity`.
    pub fn update(&mut self, identity: &str, at: DateTime<Utc>) {
        self.observe(identity, LastActive::At(at));
    }

    fn observe(&mut self, identity: &str, seen: LastActive) {
        match self.last_seen.get_mut(identity) {
            Some(current) => {
                if seen > *current {
                    *current = seen;
                }
            }
            None => {
                self.last_seen.insert(identity.to_string(), seen);
            }
        }
    }

    /// Latest activity for `identity`, or `Never`.
    pub fn get(&self, identity: &str) -> LastActive {
        self.last_seen.get(identity).copied().unwrap_or_default()
    }

    /// Fold another registry into this one, keeping the maximum per identity.
    pub fn merge(&mut self, other: ActivityRegistry) {
        for (identity, seen) in other.last_seen {
            self.observe(&identity, seen);
        }
    }

    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 5, 8, 0, 0).unwrap()
    }

    #[test]
    fn untouched_identity_is_never() {
        let registry = ActivityRegistry::new();
        assert_eq!(registry.get("ghost"), LastActive::Never);
    }

    #[test]
    fn keeps_the_maximum_regardless_of_order() {
        let mut registry = ActivityRegistry::new();
        registry.update("alice", t0());
        registry.update("alice", t0() - Duration::days(3));
        registry.update("alice", t0() + Duration::days(1));
        registry.update("alice", t0() - Duration::days(30));
        assert_eq!(registry.get("alice"), LastActive::At(t0() + Duration::days(1)));
    }

    #[test]
    fn seed_does_not_overwrite_activity() {
        let mut registry = ActivityRegistry::new();
        registry.seed("bob");
        assert_eq!(registry.get("bob"), LastActive::Never);
        registry.update("bob", t0());
        registry.seed("bob");
        assert_eq!(registry.get("bob"), LastActive::At(t0()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn merge_keeps_latest() {
        let mut a = ActivityRegistry::new();
        a.update("carol", t0());
        a.seed("dave");
        let mut b = ActivityRegistry::new();
        b.update("carol", t0() - Duration::days(5));
        b.update("dave", t0());
        a.merge(b);
        assert_eq!(a.get("carol"), LastActive::At(t0()));
        assert_eq!(a.get("dave"), LastActive::At(t0()));
    }
}
