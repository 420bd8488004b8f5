//! Aggregation orchestrator: five input collections → one `Report`.
//!
//! A report is all-or-nothing. A missing collection fails fast with
//! `IncompleteInput`; aggregator errors propagate unchanged.

use crate::audit::{calculate_audit, AuditCounts, AuditInput, AuditOptions, AuditStanding};
use crate::error::{Collection, DashError, MalformedRecord};
use crate::normalize::{
    normalize_audit, normalize_progress_records, normalize_skill_transactions, normalize_user,
    normalize_xp_transactions,
};
use crate::projects::{classify_projects, PassFailCounts, ProjectOutcome};
use crate::records::{ProgressRecord, Transaction, TransactionKind, UserProfile};
use crate::skills::{rank_skills, SkillAggregate, SKILL_TABLE_VERSION};
use crate::xp::{aggregate_xp, XpPoint};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Normalized input collections. Every field must be set before building.
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
    pub user: Option<UserProfile>,
    pub xp_transactions: Option<Vec<Transaction>>,
    pub progress_records: Option<Vec<ProgressRecord>>,
    pub audit: Option<AuditInput>,
    pub skill_transactions: Option<Vec<Transaction>>,
    /// Records dropped during normalization
    pub skipped: Vec<MalformedRecord>,
}

impl ReportInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_xp_transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.xp_transactions = Some(transactions);
        self
    }

    pub fn with_progress_records(mut self, records: Vec<ProgressRecord>) -> Self {
        self.progress_records = Some(records);
        self
    }

    pub fn with_audit(mut self, audit: AuditInput) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn with_skill_transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.skill_transactions = Some(transactions);
        self
    }
}

/// Raw query results, one JSON value per collection
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub user: Option<Value>,
    pub xp_transactions: Option<Value>,
    pub progress_records: Option<Value>,
    pub audit: Option<Value>,
    pub skill_transactions: Option<Value>,
}

impl RawInputs {
    fn missing(&self) -> Option<Collection> {
        let present = [
            self.user.is_some(),
            self.xp_transactions.is_some(),
            self.progress_records.is_some(),
            self.audit.is_some(),
            self.skill_transactions.is_some(),
        ];
        Collection::ALL
            .iter()
            .zip(present)
            .find(|(_, present)| !present)
            .map(|(c, _)| *c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportOptions {
    pub audit: AuditOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDiagnostics {
    pub skipped_records: usize,
    pub skill_table_version: u32,
}

/// Display-ready aggregates for one learner
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub user: UserProfile,
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    pub xp_timeline: Vec<XpPoint>,
    pub xp_growth_percent: f64,
    pub projects_done: u64,
    pub pass_fail_counts: PassFailCounts,
    pub success_rate: u8,
    pub recent_outcomes: Vec<ProjectOutcome>,
    pub skills: Vec<SkillAggregate>,
    pub audit_ratio: f64,
    pub audit_counts: AuditCounts,
    pub audit_standing: AuditStanding,
    pub diagnostics: ReportDiagnostics,
}

fn require<T>(value: Option<T>, collection: Collection) -> Result<T, DashError> {
    value.ok_or(DashError::IncompleteInput(collection))
}

/// Every xp-kind transaction must carry a timestamp to be placed on the timeline
fn check_xp_dated(transactions: &[Transaction]) -> Result<(), MalformedRecord> {
    match transactions
        .iter()
        .position(|t| t.kind == TransactionKind::Xp && t.occurred_at.is_none())
    {
        Some(index) => {
            Err(MalformedRecord::new(Collection::XpTransactions, "createdAt", "missing").at(index))
        }
        None => Ok(()),
    }
}

/// Build a report from normalized collections.
///
/// An undated xp-kind transaction is rejected rather than left out of the total.
pub fn build_report(inputs: &ReportInputs, options: &ReportOptions) -> Result<Report, DashError> {
    let user = require(inputs.user.as_ref(), Collection::User)?;
    let xp_transactions = require(inputs.xp_transactions.as_deref(), Collection::XpTransactions)?;
    let progress_records =
        require(inputs.progress_records.as_deref(), Collection::ProgressRecords)?;
    let audit_input = require(inputs.audit.as_ref(), Collection::AuditInput)?;
    let skill_transactions =
        require(inputs.skill_transactions.as_deref(), Collection::SkillTransactions)?;

    check_xp_dated(xp_transactions)?;

    let xp = aggregate_xp(xp_transactions);
    let projects = classify_projects(progress_records, xp_transactions);
    let skills = rank_skills(skill_transactions);
    let audit = calculate_audit(audit_input, &options.audit);

    debug!(
        target: "learnboard",
        "report for {}: {} xp over {} periods, {} projects, {} skills, audit {:.2}",
        user.login,
        xp.total_xp,
        xp.timeline.len(),
        projects.projects_done,
        skills.len(),
        audit.ratio
    );

    Ok(Report {
        user: user.clone(),
        total_xp: xp.total_xp,
        xp_timeline: xp.timeline,
        xp_growth_percent: xp.growth_percent,
        projects_done: projects.projects_done,
        pass_fail_counts: projects.counts,
        success_rate: projects.success_rate,
        recent_outcomes: projects.recent,
        skills,
        audit_ratio: audit.ratio,
        audit_counts: audit.counts,
        audit_standing: audit.standing,
        diagnostics: ReportDiagnostics {
            skipped_records: inputs.skipped.len(),
            skill_table_version: SKILL_TABLE_VERSION,
        },
    })
}

/// Normalize raw query results and build a report from them.
///
/// Presence of all five collections is checked before any normalization.
pub fn build_report_from_raw(
    raw: &RawInputs,
    options: &ReportOptions,
) -> Result<Report, DashError> {
    if let Some(collection) = raw.missing() {
        return Err(DashError::IncompleteInput(collection));
    }
    let inputs = normalize_inputs(raw)?;
    build_report(&inputs, options)
}

/// Normalize every present raw collection into `ReportInputs`
pub fn normalize_inputs(raw: &RawInputs) -> Result<ReportInputs, DashError> {
    let mut inputs = ReportInputs::new();

    if let Some(user) = &raw.user {
        inputs.user = Some(normalize_user(user)?);
    }
    if let Some(xp) = &raw.xp_transactions {
        let normalized = normalize_xp_transactions(xp)?;
        inputs.skipped.extend(normalized.skipped);
        inputs.xp_transactions = Some(normalized.records);
    }
    if let Some(progress) = &raw.progress_records {
        let normalized = normalize_progress_records(progress)?;
        inputs.skipped.extend(normalized.skipped);
        inputs.progress_records = Some(normalized.records);
    }
    if let Some(audit) = &raw.audit {
        inputs.audit = Some(normalize_audit(audit)?);
    }
    if let Some(skills) = &raw.skill_transactions {
        let normalized = normalize_skill_transactions(skills)?;
        inputs.skipped.extend(normalized.skipped);
        inputs.skill_transactions = Some(normalized.records);
    }

    Ok(inputs)
}
