//! Deterministic text helpers for rendering report values.

use chrono::{DateTime, Utc};

/// XP in decimal size units, e.g. 1500 → "1.5 KB"
pub fn format_xp(xp: u64) -> String {
    if xp == 0 {
        return "0 KB".to_string();
    }
    let kb = xp as f64 / 1000.0;
    if kb < 1000.0 {
        format!("{:.1} KB", kb)
    } else if kb < 1_000_000.0 {
        format!("{:.1} MB", kb / 1000.0)
    } else {
        format!("{:.1} GB", kb / 1_000_000.0)
    }
}

/// Integer with thousands separators, e.g. 1234567 → "1,234,567"
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// "Jan 5, 2024"
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y").to_string()
}

/// Signed growth label for the month-over-month change
pub fn format_growth(percent: f64) -> String {
    if percent > 0.0 {
        format!("+{:.1}% from last month", percent)
    } else if percent < 0.0 {
        format!("{:.1}% from last month", percent)
    } else {
        "No change from last month".to_string()
    }
}
