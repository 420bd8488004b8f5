//! Tests for skill ranking and canonical names.

use learnboard_shared::records::Transaction;
use learnboard_shared::skills::{canonical_skill_name, rank_skills, skill_identifier};
use learnboard_shared::SKILLS_LIMIT;

fn tagged(tag: &str, amount: u64) -> Transaction {
    Transaction::skill(amount, Some(tag), "")
}

#[test]
fn test_scenario_relative_to_maximum() {
    let txs = vec![tagged("skill_go", 300), tagged("skill_go", 200), tagged("skill_js", 100)];
    let skills = rank_skills(&txs);

    assert_eq!(skills.len(), 2);
    assert_eq!(skills[0].display_name, "Go");
    assert_eq!(skills[0].accumulated_magnitude, 500);
    assert_eq!(skills[0].normalized_level, 100);
    assert_eq!(skills[1].display_name, "JavaScript");
    assert_eq!(skills[1].accumulated_magnitude, 100);
    assert_eq!(skills[1].normalized_level, 20);
}

#[test]
fn test_canonical_table() {
    assert_eq!(canonical_skill_name("go"), "Go");
    assert_eq!(canonical_skill_name("html"), "HTML");
    assert_eq!(canonical_skill_name("SQL"), "SQL");
    assert_eq!(canonical_skill_name("docker"), "Docker");
    assert_eq!(canonical_skill_name("algo"), "Algorithms");
    assert_eq!(canonical_skill_name("algorithms"), "Algorithms");
    assert_eq!(canonical_skill_name("prog"), "Programming");
    assert_eq!(canonical_skill_name("programming"), "Programming");
}

#[test]
fn test_unknown_identifiers_title_cased() {
    assert_eq!(canonical_skill_name("game_dev"), "Game Dev");
    assert_eq!(canonical_skill_name("sys-admin"), "Sys Admin");
    assert_eq!(canonical_skill_name("tcp"), "Tcp");
    assert_eq!(canonical_skill_name("___"), "Unknown");
}

#[test]
fn test_identifier_from_tag_or_path() {
    assert_eq!(skill_identifier(&tagged("skill_front-end", 1)), Some("front-end"));
    let from_path = Transaction::skill(1, None, "/bahrain/bh-module/skills/docker");
    assert_eq!(skill_identifier(&from_path), Some("docker"));
    assert_eq!(canonical_skill_name(skill_identifier(&from_path).unwrap()), "Docker");
}

#[test]
fn test_aliases_merge_into_one_skill() {
    let txs = vec![tagged("skill_algo", 10), tagged("skill_algorithms", 15)];
    let skills = rank_skills(&txs);

    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0].display_name, "Algorithms");
    assert_eq!(skills[0].accumulated_magnitude, 25);
}

#[test]
fn test_truncated_to_limit_and_sorted() {
    let names = ["go", "js", "html", "css", "sql", "unix", "docker", "frontend", "backend", "algo"];
    let txs: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, n)| tagged(&format!("skill_{}", n), (i as u64 + 1) * 10))
        .collect();
    let skills = rank_skills(&txs);

    assert_eq!(skills.len(), SKILLS_LIMIT);
    assert!(skills
        .windows(2)
        .all(|w| w[0].accumulated_magnitude >= w[1].accumulated_magnitude));
    assert_eq!(skills[0].display_name, "Algorithms");
    assert!(skills.iter().all(|s| s.normalized_level <= 100));
}

#[test]
fn test_all_zero_levels() {
    let txs = vec![tagged("skill_go", 0), tagged("skill_js", 0)];
    let skills = rank_skills(&txs);

    assert_eq!(skills.len(), 2);
    assert!(skills.iter().all(|s| s.normalized_level == 0));
}

#[test]
fn test_ties_broken_by_name() {
    let txs = vec![tagged("skill_sql", 50), tagged("skill_docker", 50), tagged("skill_go", 50)];
    let names: Vec<String> = rank_skills(&txs).into_iter().map(|s| s.display_name).collect();
    assert_eq!(names, vec!["Docker", "Go", "SQL"]);
}

#[test]
fn test_empty_input() {
    assert!(rank_skills(&[]).is_empty());
}
