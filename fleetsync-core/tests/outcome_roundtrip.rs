//! Serialisation shape of run outcomes, as consumed by `fleetsync --json`.

use chrono::Utc;
use fleetsync_core::{
    Action, ErrorKind, Mode, PendingCommit, RepoEntry, RepoState, RunSummary, SyncOutcome,
};
use rstest::rstest;

#[rstest]
#[case(RepoState::UpToDate, "up_to_date")]
#[case(RepoState::LocalAhead, "local_ahead")]
#[case(RepoState::RemoteAhead, "remote_ahead")]
#[case(RepoState::Diverged, "diverged")]
#[case(RepoState::Unknown, "unknown")]
fn state_json_key(#[case] state: RepoState, #[case] key: &str) {
    let json = serde_json::to_value(state).expect("serialize");
    assert_eq!(json, serde_json::Value::String(key.to_string()));
}

#[test]
fn outcome_omits_absent_fields() {
    let outcome = SyncOutcome::new(RepoEntry::new("notes", "/srv/notes"), RepoState::UpToDate);
    let json = serde_json::to_value(&outcome).expect("serialize");
    let object = json.as_object().expect("object");
    assert!(!object.contains_key("error"));
    assert!(!object.contains_key("detail"));
    assert!(!object.contains_key("pending"));
    assert_eq!(json["repo"]["name"], "notes");
    assert_eq!(json["action"], "none");
}

#[test]
fn outcome_with_pending_commits_roundtrips() {
    let mut outcome =
        SyncOutcome::new(RepoEntry::new("infra", "/srv/infra"), RepoState::RemoteAhead);
    outcome.action = Action::Reported;
    outcome.behind = 2;
    outcome.pending = vec![
        PendingCommit {
            short_id: "b2".to_string(),
            subject: "second".to_string(),
        },
        PendingCommit {
            short_id: "a1".to_string(),
            subject: "first".to_string(),
        },
    ];
    let yaml = serde_yaml::to_string(&outcome).expect("serialize");
    let back: SyncOutcome = serde_yaml::from_str(&yaml).expect("deserialize");
    assert_eq!(back, outcome);
}

#[test]
fn summary_roundtrips_with_failures() {
    let now = Utc::now();
    let outcomes = vec![SyncOutcome::failed(
        RepoEntry::new("x", "/x"),
        ErrorKind::NotARepo,
        "no .git",
    )];
    let summary = RunSummary::from_outcomes(Mode::DryRun, &outcomes, now, now);
    let json = serde_json::to_string(&summary).expect("serialize");
    let back: RunSummary = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, summary);
    assert_eq!(back.failed, 1);
    assert!(json.contains("\"dry_run\""));
}
