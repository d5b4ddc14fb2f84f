//! End-of-run output: the summary table and the `--json` report.

use anyhow::{Context, Result};
use tabled::{settings::Style, Table, Tabled};

use fleetsync_core::{Action, ErrorKind, SyncOutcome};
use fleetsync_sync::RunReport;

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "repository")]
    repo: String,
    #[tabled(rename = "state")]
    state: String,
    #[tabled(rename = "action")]
    action: String,
    #[tabled(rename = "detail")]
    detail: String,
}

impl From<&SyncOutcome> for OutcomeRow {
    fn from(outcome: &SyncOutcome) -> Self {
        let action = match outcome.action {
            Action::None => "-",
            Action::Reported => "reported",
            Action::Pulled => "pulled",
        };
        let detail = match (outcome.error, outcome.detail.as_deref()) {
            (Some(kind), detail) => failure_text(kind, detail.map(first_line)),
            (None, _) if outcome.behind > 0 || outcome.ahead > 0 => {
                format!("+{} / -{}", outcome.ahead, outcome.behind)
            }
            (None, _) => String::new(),
        };
        Self {
            repo: outcome.repo.name.to_string(),
            state: outcome.state.to_string(),
            action: action.to_string(),
            detail,
        }
    }
}

/// One row per repository: name, state, action, and a short detail.
pub fn summary_table(outcomes: &[SyncOutcome]) -> String {
    let rows: Vec<OutcomeRow> = outcomes.iter().map(OutcomeRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Print the whole report to stdout as pretty JSON.
pub fn print_json(report: &RunReport) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(report).context("failed to serialize run report")?
    );
    Ok(())
}

/// `kind: detail`, without repeating the kind when the detail already leads
/// with it.
pub fn failure_text(kind: ErrorKind, detail: Option<&str>) -> String {
    let label = kind.to_string();
    match detail {
        Some(detail) if detail.starts_with(&label) => detail.to_string(),
        Some(detail) => format!("{label}: {detail}"),
        None => label,
    }
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}
