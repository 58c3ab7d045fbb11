// crates/mycel-policy/src/config.rs
//
// Policy thresholds for a single evaluation run.

use std::collections::BTreeSet;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use mycel_core::{MycelError, Username};

/// Policy thresholds consumed by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// The seed identity. Maximally trusted and never evaluated.
    pub pioneer: Username,
    /// Minimum propagated trust to be added, and to avoid low-trust removal.
    pub trust_threshold: f64,
    /// Removals stop once the provisional roster reaches this size.
    pub min_member_count: usize,
    /// Months without activity after which a member is inactive. At least 1.
    pub inactive_after_months: u32,
    /// Usernames excluded from every decision.
    pub blocklist: BTreeSet<Username>,
}

impl PolicyConfig {
    /// Create a config with the given seed and permissive defaults.
    pub fn new(pioneer: impl Into<Username>) -> Self {
        Self {
            pioneer: pioneer.into(),
            trust_threshold: 0.0,
            min_member_count: 0,
            inactive_after_months: 12,
            blocklist: BTreeSet::new(),
        }
    }

    pub fn with_trust_threshold(mut self, trust_threshold: f64) -> Self {
        self.trust_threshold = trust_threshold;
        self
    }

    pub fn with_min_member_count(mut self, min_member_count: usize) -> Self {
        self.min_member_count = min_member_count;
        self
    }

    /// Set the inactivity window, floored to one month.
    pub fn with_inactive_after_months(mut self, months: u32) -> Self {
        self.inactive_after_months = months.max(1);
        self
    }

    /// Set the blocklist. Entries are trimmed and blanks dropped.
    pub fn with_blocklist<I, S>(mut self, blocklist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.blocklist = blocklist
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        self
    }

    /// Reject configs that would make every decision silently wrong.
    pub fn validate(&self) -> Result<(), MycelError> {
        if self.pioneer.trim().is_empty() {
            return Err(MycelError::Config("pioneer must not be empty".to_string()));
        }
        if !self.trust_threshold.is_finite() || self.trust_threshold < 0.0 {
            return Err(MycelError::Config(format!(
                "trust threshold must be a finite, non-negative number, got {}",
                self.trust_threshold
            )));
        }
        Ok(())
    }

    pub fn is_blocked(&self, username: &str) -> bool {
        self.blocklist.contains(username)
    }

    /// Activity must be strictly after this instant to count as recent.
    pub fn activity_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_months(Months::new(self.inactive_after_months.max(1)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn inactivity_window_is_floored_to_one_month() {
        let config = PolicyConfig::new("alice").with_inactive_after_months(0);
        assert_eq!(config.inactive_after_months, 1);
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 0, 0, 0).unwrap();
        assert_eq!(
            config.activity_cutoff(now),
            Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn blocklist_entries_are_trimmed() {
        let config = PolicyConfig::new("alice").with_blocklist(vec![" spam ", "", "  ", "bot"]);
        assert!(config.is_blocked("spam"));
        assert!(config.is_blocked("bot"));
        assert_eq!(config.blocklist.len(), 2);
    }

    #[test]
    fn non_finite_or_negative_threshold_is_rejected() {
        assert!(PolicyConfig::new("alice")
            .with_trust_threshold(f64::NAN)
            .validate()
            .is_err());
        assert!(PolicyConfig::new("alice")
            .with_trust_threshold(-1.0)
            .validate()
            .is_err());
        assert!(PolicyConfig::new("alice")
            .with_trust_threshold(5.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn empty_pioneer_is_rejected() {
        assert!(PolicyConfig::new("  ").validate().is_err());
    }
}
