//! Tests for report assembly.
//!
//! Tests verify:
//! - Missing collections fail fast with the collection named
//! - Output is deterministic (same input = same output)
//! - Raw query results flow through normalization into the report

use chrono::{TimeZone, Utc};
use learnboard_shared::audit::AuditInput;
use learnboard_shared::error::{Collection, DashError, MalformedRecord};
use learnboard_shared::records::{ProgressRecord, Transaction, TransactionKind, UserProfile};
use learnboard_shared::report::{
    build_report, build_report_from_raw, RawInputs, ReportInputs, ReportOptions,
};
use serde_json::json;

fn user() -> UserProfile {
    UserProfile {
        id: "42".to_string(),
        login: "jdoe".to_string(),
        email: "jdoe@example.org".to_string(),
        created_at: Some(Utc.with_ymd_and_hms(2023, 9, 1, 8, 0, 0).unwrap()),
    }
}

fn complete_inputs() -> ReportInputs {
    let jan = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
    let feb = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    ReportInputs::new()
        .with_user(user())
        .with_xp_transactions(vec![
            Transaction::xp(100, jan, "/bh/module/ascii-art"),
            Transaction::xp(200, feb, "/bh/module/go-reloaded"),
        ])
        .with_progress_records(vec![ProgressRecord {
            id: "1".to_string(),
            outcome_grade: 1.0,
            subject_path: "/bh/module/go-reloaded".to_string(),
            subject_name: "go-reloaded".to_string(),
            updated_at: feb,
            done: true,
        }])
        .with_audit(AuditInput::from_sums(3000, 2000))
        .with_skill_transactions(vec![Transaction::skill(300, Some("skill_go"), "")])
}

#[test]
fn test_complete_report() {
    let report = build_report(&complete_inputs(), &ReportOptions::default()).unwrap();

    assert_eq!(report.user.login, "jdoe");
    assert_eq!(report.total_xp, 300);
    assert_eq!(report.xp_timeline.len(), 2);
    assert_eq!(report.pass_fail_counts.passed, 1);
    assert_eq!(report.success_rate, 100);
    assert_eq!(report.recent_outcomes[0].xp, 200);
    assert_eq!(report.skills[0].display_name, "Go");
    assert_eq!(report.audit_ratio, 1.5);
    assert_eq!(report.diagnostics.skipped_records, 0);
}

#[test]
fn test_each_missing_collection_named() {
    let cases: [(fn(&mut ReportInputs), Collection); 5] = [
        (|i| i.user = None, Collection::User),
        (|i| i.xp_transactions = None, Collection::XpTransactions),
        (|i| i.progress_records = None, Collection::ProgressRecords),
        (|i| i.audit = None, Collection::AuditInput),
        (|i| i.skill_transactions = None, Collection::SkillTransactions),
    ];
    for (remove, expected) in cases {
        let mut inputs = complete_inputs();
        remove(&mut inputs);
        let err = build_report(&inputs, &ReportOptions::default()).unwrap_err();
        assert_eq!(err, DashError::IncompleteInput(expected));
    }
}

#[test]
fn test_empty_collections_are_not_missing() {
    let inputs = ReportInputs::new()
        .with_user(user())
        .with_xp_transactions(vec![])
        .with_progress_records(vec![])
        .with_audit(AuditInput::from_sums(0, 0))
        .with_skill_transactions(vec![]);
    let report = build_report(&inputs, &ReportOptions::default()).unwrap();

    assert_eq!(report.total_xp, 0);
    assert!(report.xp_timeline.is_empty());
    assert_eq!(report.success_rate, 0);
    assert!(report.skills.is_empty());
    assert_eq!(report.audit_ratio, 0.0);
}

#[test]
fn test_report_is_deterministic() {
    let inputs = complete_inputs();
    let a = build_report(&inputs, &ReportOptions::default()).unwrap();
    let b = build_report(&inputs, &ReportOptions::default()).unwrap();

    assert_eq!(a, b);
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

#[test]
fn test_report_json_shape() {
    let report = build_report(&complete_inputs(), &ReportOptions::default()).unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["totalXP"], 300);
    assert_eq!(value["xpTimeline"][0]["period"], "2024-01");
    assert_eq!(value["xpTimeline"][1]["cumulativeXp"], 300);
    assert_eq!(value["passFailCounts"]["passed"], 1);
    assert_eq!(value["recentOutcomes"][0]["status"], "passed");
    assert_eq!(value["skills"][0]["normalizedLevel"], 100);
    assert_eq!(value["auditStanding"], "above");
}

fn raw_inputs() -> RawInputs {
    RawInputs {
        user: Some(json!({ "data": { "user": [ { "id": 7, "login": "learner", "attrs": {} } ] } })),
        xp_transactions: Some(json!({ "transaction": [
            { "amount": 100, "createdAt": "2024-01-05", "path": "/bh/module/a" },
            { "amount": 50, "createdAt": "2024-01-20", "path": "/bh/module/a" },
            { "amount": "oops", "createdAt": "2024-01-21" },
            { "amount": 200, "createdAt": "2024-02-01", "path": "/bh/module/b" }
        ] })),
        progress_records: Some(json!({ "progress": [
            { "id": 1, "grade": 1, "updatedAt": "2024-01-25", "path": "/bh/module/a", "object": { "name": "a" } },
            { "id": 2, "grade": 0, "updatedAt": "2024-02-02", "path": "/bh/module/b" },
            { "id": 3, "grade": 1, "updatedAt": "2024-02-03", "path": "/bh/module/c" }
        ] })),
        audit: Some(json!({ "user": [ { "auditRatio": 0.5, "totalUp": 5000, "totalDown": 10000 } ] })),
        skill_transactions: Some(json!({ "transaction": [
            { "type": "skill_go", "amount": 300 },
            { "type": "skill_go", "amount": 200 },
            { "type": "skill_js", "amount": 100 }
        ] })),
    }
}

#[test]
fn test_raw_end_to_end() {
    let report = build_report_from_raw(&raw_inputs(), &ReportOptions::default()).unwrap();

    assert_eq!(report.user.email, "N/A");
    assert_eq!(report.total_xp, 350);
    assert_eq!(report.xp_timeline[0].cumulative_xp, 150);
    assert_eq!(report.pass_fail_counts.passed, 2);
    assert_eq!(report.pass_fail_counts.failed, 1);
    assert_eq!(report.success_rate, 67);
    assert_eq!(report.recent_outcomes[0].id, "3");
    assert_eq!(report.recent_outcomes[1].name, "b");
    assert_eq!(report.recent_outcomes[1].xp, 200);
    assert_eq!(report.skills[1].normalized_level, 20);
    assert_eq!(report.audit_ratio, 0.5);
    assert!(report.audit_counts.approximate);
    assert_eq!(report.audit_counts.given, 5);
    assert_eq!(report.diagnostics.skipped_records, 1);
}

#[test]
fn test_raw_missing_collection_checked_first() {
    let mut raw = raw_inputs();
    raw.progress_records = None;
    raw.user = Some(json!("not a user"));

    let err = build_report_from_raw(&raw, &ReportOptions::default()).unwrap_err();
    assert_eq!(err, DashError::IncompleteInput(Collection::ProgressRecords));
}

#[test]
fn test_raw_malformed_user_aborts() {
    let mut raw = raw_inputs();
    raw.user = Some(json!({ "user": [ { "login": "no-id" } ] }));

    let err = build_report_from_raw(&raw, &ReportOptions::default()).unwrap_err();
    assert_eq!(err.code(), "malformed_record");
}

#[test]
fn test_undated_xp_transaction_rejected() {
    let jan = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
    let undated = Transaction {
        kind: TransactionKind::Xp,
        magnitude: 500,
        occurred_at: None,
        subject_path: "/bh/module/a".to_string(),
        skill_tag: None,
    };
    let inputs = complete_inputs()
        .with_xp_transactions(vec![Transaction::xp(100, jan, "/bh/module/a"), undated]);

    let err = build_report(&inputs, &ReportOptions::default()).unwrap_err();
    assert_eq!(
        err,
        DashError::MalformedRecord(
            MalformedRecord::new(Collection::XpTransactions, "createdAt", "missing").at(1)
        )
    );
}

#[test]
fn test_undated_skill_transactions_accepted() {
    let inputs = complete_inputs().with_skill_transactions(vec![Transaction::skill(
        300,
        Some("skill_go"),
        "",
    )]);
    assert!(build_report(&inputs, &ReportOptions::default()).is_ok());
}
