//! Record normalizer: raw GraphQL query results → typed records.
//!
//! Optional fields are resolved to their defaults here, once. Structurally
//! required fields that are absent or of the wrong primitive type produce a
//! [`MalformedRecord`]. Sequence collections skip such records and report
//! them; single-record collections (user, audit) abort.
//!
//! Accepted envelopes: a bare array/object, `{ "<root>": ... }`, or the full
//! GraphQL response `{ "data": { "<root>": ... } }`.

use crate::audit::{AuditInput, AuditSide};
use crate::error::{Collection, MalformedRecord};
use crate::records::{
    ProgressRecord, Transaction, TransactionKind, UserProfile, MISSING_EMAIL, UNKNOWN_PROJECT,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Records that survived normalization plus the ones that were skipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub skipped: Vec<MalformedRecord>,
}

impl<T> Normalized<T> {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339, naive date-times (taken as UTC) and plain dates
/// (UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Root key of each collection inside a GraphQL response
fn root_key(collection: Collection) -> &'static str {
    match collection {
        Collection::User | Collection::AuditInput => "user",
        Collection::XpTransactions | Collection::SkillTransactions => "transaction",
        Collection::ProgressRecords => "progress",
    }
}

/// Strip `{ "data": ... }` and `{ "<root>": ... }` wrappers.
fn unwrap_envelope<'a>(raw: &'a Value, collection: Collection) -> &'a Value {
    let mut value = raw;
    if let Some(data) = value.get("data").filter(|d| d.is_object()) {
        value = data;
    }
    if let Some(inner) = value.get(root_key(collection)) {
        value = inner;
    }
    value
}

/// Extract the item array of a sequence collection.
pub fn collection_items(raw: &Value, collection: Collection) -> Result<&[Value], MalformedRecord> {
    unwrap_envelope(raw, collection)
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| MalformedRecord::new(collection, root_key(collection), "expected an array"))
}

/// Normalize every item of a sequence collection, skipping malformed ones.
pub fn normalize_batch<T, F>(
    raw: &Value,
    collection: Collection,
    mut normalize_one: F,
) -> Result<Normalized<T>, MalformedRecord>
where
    F: FnMut(&Value) -> Result<T, MalformedRecord>,
{
    let items = collection_items(raw, collection)?;
    let mut records = Vec::with_capacity(items.len());
    let mut skipped = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match normalize_one(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                let e = e.at(index);
                warn!(target: "learnboard", "skipping record {}", e);
                skipped.push(e);
            }
        }
    }

    Ok(Normalized { records, skipped })
}

/// Normalize the XP transaction collection
pub fn normalize_xp_transactions(raw: &Value) -> Result<Normalized<Transaction>, MalformedRecord> {
    normalize_batch(raw, Collection::XpTransactions, |item| {
        normalize_transaction(item, Collection::XpTransactions)
    })
}

/// Normalize the skill transaction collection
pub fn normalize_skill_transactions(
    raw: &Value,
) -> Result<Normalized<Transaction>, MalformedRecord> {
    normalize_batch(raw, Collection::SkillTransactions, |item| {
        normalize_transaction(item, Collection::SkillTransactions)
    })
}

/// Normalize the progress record collection
pub fn normalize_progress_records(
    raw: &Value,
) -> Result<Normalized<ProgressRecord>, MalformedRecord> {
    normalize_batch(raw, Collection::ProgressRecords, normalize_progress)
}

fn expected_kind(collection: Collection) -> Option<TransactionKind> {
    match collection {
        Collection::XpTransactions => Some(TransactionKind::Xp),
        Collection::SkillTransactions => Some(TransactionKind::Skill),
        _ => None,
    }
}

/// Normalize one transaction.
///
/// The XP query does not select `type`, so an absent type falls back to the
/// kind the collection implies. A present type that disagrees with the
/// collection is malformed.
pub fn normalize_transaction(
    raw: &Value,
    collection: Collection,
) -> Result<Transaction, MalformedRecord> {
    let raw_type = optional_str(raw, "type", collection)?;
    let kind = match raw_type {
        Some(t) => TransactionKind::from_raw(t).ok_or_else(|| {
            MalformedRecord::new(collection, "type", format!("unknown type '{}'", t))
        })?,
        None => expected_kind(collection)
            .ok_or_else(|| MalformedRecord::new(collection, "type", "missing"))?,
    };
    if let Some(expected) = expected_kind(collection) {
        if kind != expected {
            return Err(MalformedRecord::new(
                collection,
                "type",
                format!("{} transaction in {} collection", kind, collection),
            ));
        }
    }

    let magnitude = required_magnitude(raw, "amount", collection)?;

    let occurred_at = match optional_str(raw, "createdAt", collection)? {
        Some(s) => Some(parse_timestamp(s).ok_or_else(|| {
            MalformedRecord::new(collection, "createdAt", format!("unparseable timestamp '{}'", s))
        })?),
        None => None,
    };
    if kind == TransactionKind::Xp && occurred_at.is_none() {
        return Err(MalformedRecord::new(collection, "createdAt", "missing"));
    }

    let subject_path = optional_str(raw, "path", collection)?.unwrap_or("").to_string();

    // skill_up/skill_down name the direction, not the skill
    let skill_tag = match (kind, raw_type) {
        (TransactionKind::Skill, Some(t)) if t != "skill_up" && t != "skill_down" => {
            Some(t.to_string())
        }
        _ => None,
    };

    Ok(Transaction {
        kind,
        magnitude,
        occurred_at,
        subject_path,
        skill_tag,
    })
}

/// Normalize one progress record
pub fn normalize_progress(raw: &Value) -> Result<ProgressRecord, MalformedRecord> {
    let c = Collection::ProgressRecords;

    let id = required_id(raw, c)?;

    let outcome_grade = match raw.get("grade") {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| MalformedRecord::new(c, "grade", "not representable"))?,
        Some(Value::Null) | None => return Err(MalformedRecord::new(c, "grade", "missing")),
        Some(other) => return Err(wrong_type(c, "grade", "number", other)),
    };

    let updated_raw = optional_str(raw, "updatedAt", c)?
        .ok_or_else(|| MalformedRecord::new(c, "updatedAt", "missing"))?;
    let updated_at = parse_timestamp(updated_raw).ok_or_else(|| {
        MalformedRecord::new(c, "updatedAt", format!("unparseable timestamp '{}'", updated_raw))
    })?;

    let done = match raw.get("isDone") {
        Some(Value::Bool(b)) => *b,
        Some(Value::Null) | None => true,
        Some(other) => return Err(wrong_type(c, "isDone", "bool", other)),
    };

    let subject_path = optional_str(raw, "path", c)?.unwrap_or("").to_string();
    let object_name = raw
        .get("object")
        .and_then(|o| o.get("name"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let subject_name = object_name
        .map(str::to_string)
        .or_else(|| last_path_segment(&subject_path).map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_PROJECT.to_string());

    Ok(ProgressRecord {
        id,
        outcome_grade,
        subject_path,
        subject_name,
        updated_at,
        done,
    })
}

/// Normalize the user record.
///
/// `attrs` may be an object or a JSON-encoded string; a missing email
/// becomes [`MISSING_EMAIL`].
pub fn normalize_user(raw: &Value) -> Result<UserProfile, MalformedRecord> {
    let c = Collection::User;
    let user = single_record(raw, c)?;

    let id = required_id(user, c)?;
    let login = optional_str(user, "login", c)?
        .ok_or_else(|| MalformedRecord::new(c, "login", "missing"))?
        .to_string();

    let attrs = match user.get("attrs") {
        Some(Value::String(s)) => serde_json::from_str::<Value>(s).ok(),
        Some(v) => Some(v.clone()),
        None => None,
    };
    let email = attrs
        .as_ref()
        .and_then(|a| a.get("email"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(MISSING_EMAIL)
        .to_string();

    let created_at = optional_str(user, "createdAt", c)?.and_then(parse_timestamp);

    Ok(UserProfile {
        id,
        login,
        email,
        created_at,
    })
}

/// Normalize audit data.
///
/// Understands the user record shape (`auditRatio`, `totalUp`, `totalDown`)
/// and the aggregate shape (`upTransactions` / `downTransactions`, with
/// `transaction_aggregate` as an alias for the up side). Both may appear in
/// the same object.
pub fn normalize_audit(raw: &Value) -> Result<AuditInput, MalformedRecord> {
    let c = Collection::AuditInput;
    let mut value = raw;
    if let Some(data) = value.get("data").filter(|d| d.is_object()) {
        value = data;
    }
    let user = match value.get("user") {
        Some(inner) => single_record(inner, c)?,
        None => value,
    };

    let up_block = value
        .get("upTransactions")
        .or_else(|| value.get("transaction_aggregate"))
        .and_then(|b| b.get("aggregate"));
    let down_block = value
        .get("downTransactions")
        .and_then(|b| b.get("aggregate"));

    let precomputed_ratio = match user.get("auditRatio") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::Null) | None => None,
        Some(other) => return Err(wrong_type(c, "auditRatio", "number", other)),
    };

    let has_user_fields = precomputed_ratio.is_some()
        || user.get("totalUp").is_some()
        || user.get("totalDown").is_some();
    if !has_user_fields && up_block.is_none() && down_block.is_none() {
        return Err(MalformedRecord::new(c, "auditRatio", "no audit fields present"));
    }

    let has_ratio = precomputed_ratio.is_some();
    let up = audit_side(up_block, user, "totalUp", has_ratio, c)?;
    let down = audit_side(down_block, user, "totalDown", has_ratio, c)?;

    Ok(AuditInput {
        precomputed_ratio,
        up,
        down,
    })
}

/// One side of the audit exchange.
///
/// An aggregate block must carry `sum.amount`; a null amount means no rows.
/// Without a precomputed ratio the user total must be present, since the
/// ratio is derived from it.
fn audit_side(
    block: Option<&Value>,
    user: &Value,
    total_field: &str,
    has_ratio: bool,
    c: Collection,
) -> Result<AuditSide, MalformedRecord> {
    if let Some(block) = block {
        let sum = match block.get("sum").and_then(|s| s.get("amount")) {
            Some(v) => non_negative_total(v, "sum.amount", c)?,
            None => return Err(MalformedRecord::new(c, "sum.amount", "missing")),
        };
        let count = match block.get("count") {
            Some(Value::Null) | None => None,
            Some(v) => Some(v.as_u64().ok_or_else(|| {
                MalformedRecord::new(c, "count", "expected non-negative integer")
            })?),
        };
        return Ok(AuditSide { sum, count });
    }
    let sum = match user.get(total_field) {
        Some(v) => non_negative_total(v, total_field, c)?,
        None if has_ratio => 0,
        None => return Err(MalformedRecord::new(c, total_field, "missing")),
    };
    Ok(AuditSide { sum, count: None })
}

/// Aggregate sums may come back as floats; round them. Null means no rows.
fn non_negative_total(v: &Value, field: &str, c: Collection) -> Result<u64, MalformedRecord> {
    match v {
        Value::Null => Ok(0),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() && f >= 0.0 => Ok(f.round() as u64),
            _ => Err(MalformedRecord::new(c, field, "expected non-negative number")),
        },
        other => Err(wrong_type(c, field, "number", other)),
    }
}

fn single_record(raw: &Value, c: Collection) -> Result<&Value, MalformedRecord> {
    let value = unwrap_envelope(raw, c);
    match value {
        Value::Array(items) => items
            .first()
            .ok_or_else(|| MalformedRecord::new(c, root_key(c), "empty result")),
        Value::Object(_) => Ok(value),
        other => Err(wrong_type(c, root_key(c), "object", other)),
    }
}

fn required_id(raw: &Value, c: Collection) -> Result<String, MalformedRecord> {
    match raw.get("id") {
        Some(Value::Number(n)) if n.is_u64() || n.is_i64() => Ok(n.to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::Null) | None => Err(MalformedRecord::new(c, "id", "missing")),
        Some(other) => Err(wrong_type(c, "id", "integer or string", other)),
    }
}

fn required_magnitude(raw: &Value, field: &str, c: Collection) -> Result<u64, MalformedRecord> {
    match raw.get(field) {
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                return Ok(v);
            }
            if n.as_i64().is_some_and(|v| v < 0) {
                return Err(MalformedRecord::new(c, field, "negative"));
            }
            match n.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
                Some(f) if f < 0.0 => Err(MalformedRecord::new(c, field, "negative")),
                _ => Err(MalformedRecord::new(c, field, format!("not an integer: {}", n))),
            }
        }
        Some(Value::Null) | None => Err(MalformedRecord::new(c, field, "missing")),
        Some(other) => Err(wrong_type(c, field, "integer", other)),
    }
}

fn optional_str<'a>(
    raw: &'a Value,
    field: &str,
    c: Collection,
) -> Result<Option<&'a str>, MalformedRecord> {
    match raw.get(field) {
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(wrong_type(c, field, "string", other)),
    }
}

/// Last non-empty `/`-separated segment of a path
pub fn last_path_segment(path: &str) -> Option<&str> {
    path.rsplit('/').find(|s| !s.trim().is_empty())
}

fn wrong_type(c: Collection, field: &str, expected: &str, got: &Value) -> MalformedRecord {
    MalformedRecord::new(c, field, format!("expected {}, got {}", expected, type_name(got)))
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
