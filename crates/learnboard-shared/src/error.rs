//! Error types for Learnboard.
//!
//! Ratio and percentage guards (audit ratio, success rate, skill levels,
//! XP growth) resolve to 0 and never surface here.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The five input collections a report is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    User,
    XpTransactions,
    ProgressRecords,
    AuditInput,
    SkillTransactions,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::User,
        Collection::XpTransactions,
        Collection::ProgressRecords,
        Collection::AuditInput,
        Collection::SkillTransactions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::User => "user",
            Collection::XpTransactions => "xpTransactions",
            Collection::ProgressRecords => "progressRecords",
            Collection::AuditInput => "auditInput",
            Collection::SkillTransactions => "skillTransactions",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single record that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedRecord {
    /// Collection the record came from
    pub collection: Collection,
    /// Position within the collection, if it was part of a sequence
    pub index: Option<usize>,
    /// Offending field
    pub field: String,
    /// What was wrong with it
    pub reason: String,
}

impl MalformedRecord {
    pub fn new(collection: Collection, field: &str, reason: impl Into<String>) -> Self {
        Self {
            collection,
            index: None,
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(
                f,
                "{}[{}].{}: {}",
                self.collection, i, self.field, self.reason
            ),
            None => write!(f, "{}.{}: {}", self.collection, self.field, self.reason),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashError {
    #[error("Malformed record: {0}")]
    MalformedRecord(MalformedRecord),

    #[error("Incomplete input: missing {0} collection")]
    IncompleteInput(Collection),
}

impl From<MalformedRecord> for DashError {
    fn from(record: MalformedRecord) -> Self {
        DashError::MalformedRecord(record)
    }
}

impl DashError {
    /// Stable short code for structured failure output
    pub fn code(&self) -> &'static str {
        match self {
            DashError::MalformedRecord(_) => "malformed_record",
            DashError::IncompleteInput(_) => "incomplete_input",
        }
    }
}
