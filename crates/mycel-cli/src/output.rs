// crates/mycel-cli/src/output.rs
//
// Output formatting for evaluation reports.
// Supports table and JSON output modes.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled};

use mycel_core::decision::{format_last_active, format_trust};
use mycel_core::Decision;
use mycel_policy::Evaluation;

/// Output format for the evaluation report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    #[default]
    Table,
    /// JSON output for machine consumption.
    Json,
}

/// A row in the decision table.
#[derive(Tabled)]
struct DecisionRow {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "User")]
    username: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Trust")]
    trust: String,
    #[tabled(rename = "Last active")]
    last_active: String,
}

impl DecisionRow {
    fn new(decision: &Decision, now: DateTime<Utc>) -> Self {
        Self {
            action: decision.action.to_string(),
            username: format!("@{}", decision.username),
            reason: decision.reason.clone(),
            trust: format_trust(decision.trust),
            last_active: format_last_active(decision.last_active, now),
        }
    }
}

/// JSON document emitted with `--format json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    evaluated_at: DateTime<Utc>,
    member_count: usize,
    provisional_member_count: usize,
    outcome: mycel_policy::RunOutcome,
    decisions: &'a [Decision],
}

/// Render the report for `evaluation` in the chosen format.
pub fn render(evaluation: &Evaluation, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => format_table(evaluation),
        OutputFormat::Json => format_json(evaluation),
    }
}

fn format_table(evaluation: &Evaluation) -> String {
    let now = evaluation.evaluated_at;
    let decisions = &evaluation.decisions.decisions;
    if decisions.is_empty() {
        return format!(
            "No membership changes needed ({} members).",
            evaluation.members.len()
        );
    }

    let rows: Vec<DecisionRow> = decisions.iter().map(|d| DecisionRow::new(d, now)).collect();
    let mut out = Table::new(&rows).to_string();
    out.push_str("\n\n");
    for decision in decisions {
        out.push_str(&decision.notice(now));
        out.push('\n');
    }
    out.push_str(&format!(
        "\nMembers: {} now, {} after these changes.",
        evaluation.members.len(),
        evaluation.decisions.provisional_member_count
    ));
    out
}

fn format_json(evaluation: &Evaluation) -> String {
    let report = JsonReport {
        evaluated_at: evaluation.evaluated_at,
        member_count: evaluation.members.len(),
        provisional_member_count: evaluation.decisions.provisional_member_count,
        outcome: evaluation.outcome(),
        decisions: &evaluation.decisions.decisions,
    };
    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}
