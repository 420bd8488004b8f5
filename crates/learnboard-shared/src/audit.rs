//! Audit ratio calculation.
//!
//! "Up" is audit XP given by the user, "down" is audit XP received.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Divisor used to approximate audit counts from XP sums
pub const DEFAULT_COUNT_DIVISOR: u64 = 1000;

/// Aggregate of one audit direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditSide {
    /// Summed magnitude
    pub sum: u64,
    /// Number of transactions, when the source reports it
    pub count: Option<u64>,
}

/// Audit data as fetched: an optional precomputed ratio plus per-direction
/// aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditInput {
    pub precomputed_ratio: Option<f64>,
    pub up: AuditSide,
    pub down: AuditSide,
}

impl AuditInput {
    pub fn from_sums(up: u64, down: u64) -> Self {
        Self {
            precomputed_ratio: None,
            up: AuditSide { sum: up, count: None },
            down: AuditSide { sum: down, count: None },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditOptions {
    pub count_divisor: u64,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            count_divisor: DEFAULT_COUNT_DIVISOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AuditCounts {
    pub given: u64,
    pub received: u64,
    /// Counts were derived from sums with the fixed divisor, not counted
    pub approximate: bool,
}

impl AuditCounts {
    /// (given %, received %) of all audits, (0, 0) when there are none
    pub fn shares(&self) -> (f64, f64) {
        let total = self.given + self.received;
        if total == 0 {
            return (0.0, 0.0);
        }
        let total = total as f64;
        (
            self.given as f64 * 100.0 / total,
            self.received as f64 * 100.0 / total,
        )
    }
}

/// How the ratio compares to a balanced 1.0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStanding {
    Balanced,
    Above,
    Below,
}

impl AuditStanding {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > 1.1 {
            AuditStanding::Above
        } else if ratio >= 0.9 {
            AuditStanding::Balanced
        } else {
            AuditStanding::Below
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuditStanding::Balanced => "Balanced performance",
            AuditStanding::Above => "Above average performance",
            AuditStanding::Below => "Below average performance",
        }
    }
}

impl fmt::Display for AuditStanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    /// Rounded to 2 decimals, never NaN or infinite
    pub ratio: f64,
    pub counts: AuditCounts,
    pub standing: AuditStanding,
}

/// `up / down`, 0 when `down` is 0
pub fn guarded_ratio(up: u64, down: u64) -> f64 {
    if down == 0 {
        0.0
    } else {
        up as f64 / down as f64
    }
}

/// Values too large to scale are already whole at two decimals
fn round2(value: f64) -> f64 {
    if value.abs() >= f64::MAX / 100.0 {
        return value;
    }
    (value * 100.0).round() / 100.0
}

fn approximate_count(sum: u64, divisor: u64) -> u64 {
    let divisor = divisor.max(1);
    sum.saturating_add(divisor / 2) / divisor
}

/// Derive ratio and counts.
///
/// A precomputed ratio wins when it is finite and non-negative. Counts are
/// exact only when both sides report one; otherwise both are approximated
/// from the sums.
pub fn calculate_audit(input: &AuditInput, options: &AuditOptions) -> AuditSummary {
    let raw_ratio = match input.precomputed_ratio {
        Some(r) if r.is_finite() && r >= 0.0 => r,
        _ => guarded_ratio(input.up.sum, input.down.sum),
    };
    let ratio = round2(raw_ratio);

    let counts = match (input.up.count, input.down.count) {
        (Some(given), Some(received)) => AuditCounts {
            given,
            received,
            approximate: false,
        },
        _ => AuditCounts {
            given: approximate_count(input.up.sum, options.count_divisor),
            received: approximate_count(input.down.sum, options.count_divisor),
            approximate: true,
        },
    };

    AuditSummary {
        ratio,
        counts,
        standing: AuditStanding::from_ratio(ratio),
    }
}
