//! Normalized record shapes consumed by the aggregators.
//!
//! Built once by the normalizer, never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder for a progress record whose subject has no resolvable name
pub const UNKNOWN_PROJECT: &str = "Unknown Project";

/// Placeholder for a user without an email attribute
pub const MISSING_EMAIL: &str = "N/A";

/// Transaction category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    Xp,
    AuditUp,
    AuditDown,
    Skill,
}

impl TransactionKind {
    /// Map a raw GraphQL `type` value. Unknown types yield `None`.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "xp" => Some(TransactionKind::Xp),
            "up" => Some(TransactionKind::AuditUp),
            "down" => Some(TransactionKind::AuditDown),
            s if s.starts_with("skill_") => Some(TransactionKind::Skill),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionKind::Xp => "xp",
            TransactionKind::AuditUp => "audit-up",
            TransactionKind::AuditDown => "audit-down",
            TransactionKind::Skill => "skill",
        };
        f.write_str(s)
    }
}

/// A single graded transaction.
///
/// `occurred_at` is always present for [`TransactionKind::Xp`]; skill
/// queries do not fetch timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub kind: TransactionKind,
    pub magnitude: u64,
    pub occurred_at: Option<DateTime<Utc>>,
    pub subject_path: String,
    pub skill_tag: Option<String>,
}

impl Transaction {
    pub fn xp(magnitude: u64, occurred_at: DateTime<Utc>, subject_path: &str) -> Self {
        Self {
            kind: TransactionKind::Xp,
            magnitude,
            occurred_at: Some(occurred_at),
            subject_path: subject_path.to_string(),
            skill_tag: None,
        }
    }

    pub fn skill(magnitude: u64, skill_tag: Option<&str>, subject_path: &str) -> Self {
        Self {
            kind: TransactionKind::Skill,
            magnitude,
            occurred_at: None,
            subject_path: subject_path.to_string(),
            skill_tag: skill_tag.map(str::to_string),
        }
    }
}

/// A graded attempt at a project or exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub id: String,
    pub outcome_grade: f64,
    pub subject_path: String,
    pub subject_name: String,
    pub updated_at: DateTime<Utc>,
    pub done: bool,
}

impl ProgressRecord {
    pub fn passed(&self) -> bool {
        self.outcome_grade >= 1.0
    }
}

/// The learner the report is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub login: String,
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
}
