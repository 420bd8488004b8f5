//! Skill ranking: canonical names, summed magnitude, top-N, 0-100 levels.
//!
//! Levels are relative to the strongest displayed skill (top skill = 100).

use crate::normalize::last_path_segment;
use crate::records::{Transaction, TransactionKind};
use crate::SKILLS_LIMIT;
use serde::Serialize;
use std::collections::BTreeMap;

/// Bump when [`SKILL_DISPLAY_NAMES`] changes
pub const SKILL_TABLE_VERSION: u32 = 1;

/// Known skill identifiers (lowercase, separators as spaces) → display name
pub const SKILL_DISPLAY_NAMES: &[(&str, &str)] = &[
    ("go", "Go"),
    ("js", "JavaScript"),
    ("javascript", "JavaScript"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("sql", "SQL"),
    ("unix", "Unix"),
    ("docker", "Docker"),
    ("frontend", "Frontend"),
    ("backend", "Backend"),
    ("algo", "Algorithms"),
    ("algorithms", "Algorithms"),
    ("prog", "Programming"),
    ("programming", "Programming"),
];

const SKILL_PREFIX: &str = "skill_";
const UNKNOWN_SKILL: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAggregate {
    pub display_name: String,
    pub accumulated_magnitude: u64,
    pub normalized_level: u8,
}

/// Raw skill identifier of a transaction: the tag without its prefix, or
/// the last path segment when there is no tag.
pub fn skill_identifier(transaction: &Transaction) -> Option<&str> {
    match transaction.skill_tag.as_deref() {
        Some(tag) => {
            let id = tag.strip_prefix(SKILL_PREFIX).unwrap_or(tag);
            Some(id).filter(|s| !s.trim().is_empty())
        }
        None => last_path_segment(&transaction.subject_path),
    }
}

/// Map a raw identifier to its display name.
///
/// Separators (`_`, `-`) become spaces; known identifiers go through the
/// table, anything else is title-cased word by word.
pub fn canonical_skill_name(identifier: &str) -> String {
    let spaced = identifier.replace(['_', '-'], " ");
    let words: Vec<&str> = spaced.split_whitespace().collect();
    if words.is_empty() {
        return UNKNOWN_SKILL.to_string();
    }

    let key = words.join(" ").to_lowercase();
    if let Some((_, display)) = SKILL_DISPLAY_NAMES.iter().find(|(k, _)| *k == key) {
        return display.to_string();
    }

    words
        .iter()
        .map(|w| title_case(w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Level of `magnitude` relative to `max`, rounded, 0 when `max` is 0
pub fn relative_level(magnitude: u64, max: u64) -> u8 {
    if max == 0 {
        return 0;
    }
    let scaled = (magnitude as u128 * 100 + max as u128 / 2) / max as u128;
    scaled.min(100) as u8
}

/// Rank skill-kind transactions into at most [`SKILLS_LIMIT`] aggregates,
/// magnitude descending, ties by display name.
pub fn rank_skills(transactions: &[Transaction]) -> Vec<SkillAggregate> {
    let mut sums: BTreeMap<String, u64> = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.kind == TransactionKind::Skill) {
        let name = skill_identifier(t)
            .map(canonical_skill_name)
            .unwrap_or_else(|| UNKNOWN_SKILL.to_string());
        let sum = sums.entry(name).or_insert(0);
        *sum = sum.saturating_add(t.magnitude);
    }

    let mut ranked: Vec<(String, u64)> = sums.into_iter().collect();
    // BTreeMap order already sorts names; the stable sort keeps it for ties
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(SKILLS_LIMIT);

    let max = ranked.first().map(|(_, m)| *m).unwrap_or(0);
    ranked
        .into_iter()
        .map(|(display_name, accumulated_magnitude)| SkillAggregate {
            normalized_level: relative_level(accumulated_magnitude, max),
            display_name,
            accumulated_magnitude,
        })
        .collect()
}
