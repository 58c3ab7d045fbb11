// crates/mycel-policy/src/persons.rs
//
// Building the decision-time view of everyone the engine should consider.

use std::collections::{BTreeMap, BTreeSet};

use mycel_core::{Person, ScoreMap, Username};
use mycel_reputation::ActivityRegistry;

use crate::config::PolicyConfig;

/// Assemble the persons list, sorted by username.
///
/// - every identity the oracle scored, with that score
/// - the pioneer, with infinite trust
/// - every current member not covered above, with trust 0.0
///
/// Blocklisted identities are dropped entirely. Scores that are negative or
/// not a number are treated as 0.0.
pub fn build_persons(
    scores: &ScoreMap,
    members: &BTreeSet<Username>,
    activity: &ActivityRegistry,
    config: &PolicyConfig,
) -> Vec<Person> {
    let mut trust: BTreeMap<&str, f64> = BTreeMap::new();
    for (username, &score) in scores {
        let score = if score.is_nan() { 0.0 } else { score.max(0.0) };
        trust.insert(username.as_str(), score);
    }
    trust.insert(config.pioneer.as_str(), f64::INFINITY);
    for member in members {
        trust.entry(member.as_str()).or_insert(0.0);
    }

    trust
        .into_iter()
        .filter(|(username, _)| !config.is_blocked(username))
        .map(|(username, trust)| Person {
            username: username.to_string(),
            trust,
            is_member: members.contains(username),
            last_active: activity.get(username),
        })
        .collect()
}
