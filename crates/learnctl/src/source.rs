//! Record sources: where the five query result collections come from.
//!
//! `gather` loads all collections concurrently and is all-or-nothing,
//! except audit data, which falls back to the user record's audit fields.

use anyhow::{Context, Result};
use learnboard_shared::report::RawInputs;
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use tracing::{info, warn};

pub const USER_FILE: &str = "user.json";
pub const XP_FILE: &str = "xp.json";
pub const PROGRESS_FILE: &str = "progress.json";
pub const AUDIT_FILE: &str = "audit.json";
pub const SKILLS_FILE: &str = "skills.json";

/// Provider of raw query results
pub trait RecordSource: Sync {
    fn load_user(&self) -> impl Future<Output = Result<Value>> + Send;
    fn load_xp_transactions(&self) -> impl Future<Output = Result<Value>> + Send;
    fn load_progress_records(&self) -> impl Future<Output = Result<Value>> + Send;
    fn load_audit(&self) -> impl Future<Output = Result<Value>> + Send;
    fn load_skill_transactions(&self) -> impl Future<Output = Result<Value>> + Send;
}

/// Reads JSON dumps of the query results from a directory
#[derive(Debug, Clone)]
pub struct FileSource {
    data_dir: PathBuf,
}

impl FileSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    async fn load(&self, file: &str) -> Result<Value> {
        let path = self.data_dir.join(file);
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;
        let value: Value = serde_json::from_str(&text)
            .with_context(|| format!("invalid JSON in {}", path.display()))?;
        info!(target: "learnctl", "loaded {}", path.display());
        Ok(value)
    }
}

impl RecordSource for FileSource {
    fn load_user(&self) -> impl Future<Output = Result<Value>> + Send {
        self.load(USER_FILE)
    }

    fn load_xp_transactions(&self) -> impl Future<Output = Result<Value>> + Send {
        self.load(XP_FILE)
    }

    fn load_progress_records(&self) -> impl Future<Output = Result<Value>> + Send {
        self.load(PROGRESS_FILE)
    }

    fn load_audit(&self) -> impl Future<Output = Result<Value>> + Send {
        self.load(AUDIT_FILE)
    }

    fn load_skill_transactions(&self) -> impl Future<Output = Result<Value>> + Send {
        self.load(SKILLS_FILE)
    }
}

/// Audit data, or the user record (which carries auditRatio/totalUp/totalDown)
async fn load_audit_with_fallback<S: RecordSource>(source: &S) -> Result<Value> {
    match source.load_audit().await {
        Ok(audit) => Ok(audit),
        Err(e) => {
            warn!(target: "learnctl", "audit data unavailable ({:#}), using user record", e);
            source
                .load_user()
                .await
                .context("audit fallback to user record failed")
        }
    }
}

/// Load all five collections concurrently
pub async fn gather<S: RecordSource>(source: &S) -> Result<RawInputs> {
    let (user, xp, progress, audit, skills) = tokio::try_join!(
        source.load_user(),
        source.load_xp_transactions(),
        source.load_progress_records(),
        load_audit_with_fallback(source),
        source.load_skill_transactions(),
    )?;

    Ok(RawInputs {
        user: Some(user),
        xp_transactions: Some(xp),
        progress_records: Some(progress),
        audit: Some(audit),
        skill_transactions: Some(skills),
    })
}
