//! Tests for audit ratio calculation.

use learnboard_shared::audit::{
    calculate_audit, guarded_ratio, AuditInput, AuditOptions, AuditSide, AuditStanding,
};

#[test]
fn test_zero_down_yields_zero() {
    let summary = calculate_audit(&AuditInput::from_sums(0, 0), &AuditOptions::default());
    assert_eq!(summary.ratio, 0.0);
    assert!(summary.ratio.is_finite());

    let summary = calculate_audit(&AuditInput::from_sums(5000, 0), &AuditOptions::default());
    assert_eq!(summary.ratio, 0.0);
}

#[test]
fn test_equal_sums_yield_one() {
    let summary = calculate_audit(&AuditInput::from_sums(1234, 1234), &AuditOptions::default());
    assert_eq!(summary.ratio, 1.0);
    assert_eq!(summary.standing, AuditStanding::Balanced);
}

#[test]
fn test_ratio_rounded_to_two_decimals() {
    let summary = calculate_audit(&AuditInput::from_sums(2000, 3000), &AuditOptions::default());
    assert_eq!(summary.ratio, 0.67);
    assert_eq!(summary.standing, AuditStanding::Below);
}

#[test]
fn test_precomputed_ratio_preferred() {
    let input = AuditInput {
        precomputed_ratio: Some(1.23456),
        up: AuditSide { sum: 100, count: None },
        down: AuditSide { sum: 100, count: None },
    };
    let summary = calculate_audit(&input, &AuditOptions::default());
    assert_eq!(summary.ratio, 1.23);
    assert_eq!(summary.standing, AuditStanding::Above);
}

#[test]
fn test_invalid_precomputed_ratio_falls_back_to_sums() {
    let input = AuditInput {
        precomputed_ratio: Some(f64::NAN),
        ..AuditInput::from_sums(300, 200)
    };
    assert_eq!(calculate_audit(&input, &AuditOptions::default()).ratio, 1.5);

    let input = AuditInput {
        precomputed_ratio: Some(-1.0),
        ..AuditInput::from_sums(300, 200)
    };
    assert_eq!(calculate_audit(&input, &AuditOptions::default()).ratio, 1.5);
}

#[test]
fn test_huge_precomputed_ratio_stays_finite() {
    let input = AuditInput {
        precomputed_ratio: Some(f64::MAX),
        ..AuditInput::from_sums(300, 200)
    };
    let summary = calculate_audit(&input, &AuditOptions::default());
    assert!(summary.ratio.is_finite());
    assert_eq!(summary.ratio, f64::MAX);
    assert_eq!(summary.standing, AuditStanding::Above);
}

#[test]
fn test_exact_counts_when_reported() {
    let input = AuditInput {
        precomputed_ratio: None,
        up: AuditSide { sum: 50_000, count: Some(12) },
        down: AuditSide { sum: 40_000, count: Some(9) },
    };
    let summary = calculate_audit(&input, &AuditOptions::default());
    assert_eq!(summary.counts.given, 12);
    assert_eq!(summary.counts.received, 9);
    assert!(!summary.counts.approximate);
}

#[test]
fn test_counts_approximated_from_sums() {
    let input = AuditInput {
        precomputed_ratio: Some(1.1),
        up: AuditSide { sum: 12_600, count: None },
        down: AuditSide { sum: 11_400, count: Some(3) },
    };
    let summary = calculate_audit(&input, &AuditOptions::default());
    assert_eq!(summary.counts.given, 13);
    assert_eq!(summary.counts.received, 11);
    assert!(summary.counts.approximate);

    let custom = calculate_audit(&input, &AuditOptions { count_divisor: 100 });
    assert_eq!(custom.counts.given, 126);
}

#[test]
fn test_zero_divisor_does_not_panic() {
    let summary = calculate_audit(&AuditInput::from_sums(7, 3), &AuditOptions { count_divisor: 0 });
    assert_eq!(summary.counts.given, 7);
}

#[test]
fn test_shares_guard_zero_total() {
    let summary = calculate_audit(&AuditInput::from_sums(0, 0), &AuditOptions::default());
    assert_eq!(summary.counts.shares(), (0.0, 0.0));
}

#[test]
fn test_standing_boundaries() {
    assert_eq!(AuditStanding::from_ratio(0.9), AuditStanding::Balanced);
    assert_eq!(AuditStanding::from_ratio(1.1), AuditStanding::Balanced);
    assert_eq!(AuditStanding::from_ratio(1.11), AuditStanding::Above);
    assert_eq!(AuditStanding::from_ratio(0.89), AuditStanding::Below);
    assert_eq!(guarded_ratio(1, 0), 0.0);
}
