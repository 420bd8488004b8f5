//! Project outcome classification: pass/fail counts, success rate and the
//! recent-projects view.

use crate::records::{ProgressRecord, Transaction};
use crate::xp::xp_by_path;
use crate::RECENT_OUTCOMES_LIMIT;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
}

impl Outcome {
    pub fn of(record: &ProgressRecord) -> Self {
        if record.passed() {
            Outcome::Passed
        } else {
            Outcome::Failed
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "passed"),
            Outcome::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PassFailCounts {
    pub passed: u64,
    pub failed: u64,
}

impl PassFailCounts {
    pub fn total(&self) -> u64 {
        self.passed + self.failed
    }

    /// Passed share as a rounded integer percent, 0 when nothing is graded
    pub fn success_rate(&self) -> u8 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        ((self.passed as f64 * 100.0) / total as f64).round() as u8
    }
}

/// A classified project attempt with the XP it earned
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOutcome {
    pub id: String,
    pub name: String,
    pub path: String,
    pub grade: f64,
    pub status: Outcome,
    pub updated_at: DateTime<Utc>,
    pub xp: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    /// Number of eligible (done) records
    pub projects_done: u64,
    pub counts: PassFailCounts,
    pub success_rate: u8,
    /// Most recently updated first, at most [`RECENT_OUTCOMES_LIMIT`]
    pub recent: Vec<ProjectOutcome>,
}

/// Classify done progress records and join recent ones against XP.
///
/// Records with `done == false` are ignored.
pub fn classify_projects(
    records: &[ProgressRecord],
    xp_transactions: &[Transaction],
) -> ProjectSummary {
    let eligible: Vec<&ProgressRecord> = records.iter().filter(|r| r.done).collect();

    let mut counts = PassFailCounts::default();
    for record in &eligible {
        match Outcome::of(record) {
            Outcome::Passed => counts.passed += 1,
            Outcome::Failed => counts.failed += 1,
        }
    }

    let mut by_recency = eligible.clone();
    // stable: equal timestamps keep input order
    by_recency.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    by_recency.truncate(RECENT_OUTCOMES_LIMIT);

    let xp_lookup = xp_by_path(
        xp_transactions,
        by_recency.iter().map(|r| r.subject_path.as_str()),
    );

    let recent = by_recency
        .into_iter()
        .map(|r| ProjectOutcome {
            id: r.id.clone(),
            name: r.subject_name.clone(),
            path: r.subject_path.clone(),
            grade: r.outcome_grade,
            status: Outcome::of(r),
            updated_at: r.updated_at,
            xp: xp_lookup.get(&r.subject_path).copied().unwrap_or(0),
        })
        .collect();

    ProjectSummary {
        projects_done: eligible.len() as u64,
        counts,
        success_rate: counts.success_rate(),
        recent,
    }
}
