// crates/mycel-policy/src/pipeline.rs
//
// End-to-end evaluation: collaboration source -> signals -> ranking ->
// persons -> decisions.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use mycel_core::{CollaborationSource, MycelError, Person, TrustRankingOracle, Username};
use mycel_reputation::{collect_signals, IngestOptions};

use crate::config::PolicyConfig;
use crate::engine::{DecisionSet, MembershipPolicyEngine};
use crate::persons::build_persons;

/// Overall result of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum RunOutcome {
    /// The roster matches the policy.
    Clean,
    /// The operator has `count` membership changes to make.
    ChangesRequired { count: usize },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Clean => write!(f, "clean"),
            RunOutcome::ChangesRequired { count } => {
                write!(f, "{} membership change(s) required", count)
            }
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub evaluated_at: DateTime<Utc>,
    pub members: BTreeSet<Username>,
    pub persons: Vec<Person>,
    pub decisions: DecisionSet,
}

impl Evaluation {
    pub fn outcome(&self) -> RunOutcome {
        match self.decisions.count() {
            0 => RunOutcome::Clean,
            count => RunOutcome::ChangesRequired { count },
        }
    }
}

/// Run one full evaluation against `source`.
///
/// The config is validated before the source is touched. Any source or
/// oracle failure fails the whole run; there is no partial result.
pub async fn evaluate<S, O>(
    source: &S,
    oracle: &O,
    config: &PolicyConfig,
    options: &IngestOptions,
    now: DateTime<Utc>,
) -> Result<Evaluation, MycelError>
where
    S: CollaborationSource + ?Sized,
    O: TrustRankingOracle + ?Sized,
{
    config.validate()?;

    let members: BTreeSet<Username> = source
        .members()
        .map_ok(|member| member.username)
        .try_collect()
        .await?;
    tracing::info!("Organization has {} members", members.len());
    for member in &members {
        tracing::debug!("Member @{}", member);
    }

    let member_list: Vec<Username> = members.iter().cloned().collect();
    let signals = collect_signals(source, &member_list, now, options).await?;

    let edges = signals.assignments();
    let scores = oracle.rank(&config.pioneer, &edges)?;
    tracing::info!(
        "Ranked {} identities from {} trust edges (seed {})",
        scores.len(),
        edges.len(),
        config.pioneer
    );

    let persons = build_persons(&scores, &members, &signals.activity, config);
    let engine = MembershipPolicyEngine::new(config.clone());
    let decisions = engine.decide(&persons, members.len(), now);

    Ok(Evaluation {
        evaluated_at: now,
        members,
        persons,
        decisions,
    })
}
