//! XP aggregation: running total and cumulative-by-month timeline.

use crate::period::Period;
use crate::records::{Transaction, TransactionKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// One month on the XP timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XpPoint {
    pub period: Period,
    /// Running total as of the last transaction in this period
    pub cumulative_xp: u64,
    /// XP earned within this period
    pub gained_xp: u64,
}

/// XP totals derived from a transaction sequence
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XpSummary {
    pub total_xp: u64,
    pub timeline: Vec<XpPoint>,
    /// Percent change between the last two periods, one decimal
    pub growth_percent: f64,
}

/// Aggregate xp-kind transactions, given in any order.
///
/// Non-xp transactions are ignored.
pub fn aggregate_xp(transactions: &[Transaction]) -> XpSummary {
    let mut dated: Vec<_> = transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Xp)
        .filter_map(|t| t.occurred_at.map(|ts| (ts, t.magnitude)))
        .collect();
    // sort_by_key is stable: equal timestamps keep input order
    dated.sort_by_key(|(ts, _)| *ts);

    let mut total_xp = 0u64;
    let mut by_period: BTreeMap<Period, u64> = BTreeMap::new();
    for (ts, magnitude) in &dated {
        total_xp = total_xp.saturating_add(*magnitude);
        by_period.insert(Period::of(ts), total_xp);
    }

    let mut timeline = Vec::with_capacity(by_period.len());
    let mut previous = 0u64;
    for (period, cumulative_xp) in by_period {
        timeline.push(XpPoint {
            period,
            cumulative_xp,
            gained_xp: cumulative_xp - previous,
        });
        previous = cumulative_xp;
    }

    let growth_percent = growth_percent(&timeline);

    XpSummary {
        total_xp,
        timeline,
        growth_percent,
    }
}

/// Percent change of the cumulative value between the last two periods.
///
/// 0.0 with fewer than two periods or when the earlier value is 0.
pub fn growth_percent(timeline: &[XpPoint]) -> f64 {
    let [.., prev, last] = timeline else {
        return 0.0;
    };
    if prev.cumulative_xp == 0 {
        return 0.0;
    }
    let prev_xp = prev.cumulative_xp as f64;
    let change = (last.cumulative_xp as f64 - prev_xp) / prev_xp;
    (change * 1000.0).round() / 10.0
}

/// Sum xp magnitudes per subject path, restricted to `paths`
pub fn xp_by_path<'a, I>(transactions: &[Transaction], paths: I) -> BTreeMap<String, u64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sums: BTreeMap<String, u64> = paths.into_iter().map(|p| (p.to_string(), 0)).collect();
    for t in transactions.iter().filter(|t| t.kind == TransactionKind::Xp) {
        if let Some(sum) = sums.get_mut(&t.subject_path) {
            *sum = sum.saturating_add(t.magnitude);
        }
    }
    sums
}
