//! Shared types and aggregation logic for Learnboard components.
//!
//! Everything here is pure: raw query results go in, a `Report` comes out.
//! Loading the results and drawing them belongs to `learnctl`.

pub mod audit;
pub mod error;
pub mod format;
pub mod normalize;
pub mod period;
pub mod projects;
pub mod records;
pub mod report;
pub mod skills;
pub mod xp;

pub use error::{Collection, DashError, MalformedRecord};
pub use records::{ProgressRecord, Transaction, TransactionKind, UserProfile};
pub use report::{build_report, build_report_from_raw, RawInputs, Report, ReportInputs};

/// Crate version, embedded at build time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum number of recent project outcomes in a report
pub const RECENT_OUTCOMES_LIMIT: usize = 10;

/// Maximum number of skills in a report
pub const SKILLS_LIMIT: usize = 8;
