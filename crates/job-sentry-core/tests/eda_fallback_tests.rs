//! Tests the fixed statistics fallback record and headline formatting.

use job_sentry_core::{EdaStats, FALLBACK_STATS};

#[test]
fn eda_fallback_tests_match_fixed_sextuple() {
    let stats = EdaStats::default();
    assert_eq!(stats, FALLBACK_STATS);
    assert_eq!(
        (
            stats.total,
            stats.real,
            stats.fraud,
            stats.buckets.short,
            stats.buckets.medium,
            stats.buckets.long
        ),
        (27_880, 17_014, 10_866, 5_234, 12_456, 10_190)
    );
}

#[test]
fn eda_fallback_tests_group_headline_counters() {
    assert_eq!(
        FALLBACK_STATS.headline_texts(),
        ["27,880".to_string(), "17,014".to_string(), "10,866".to_string()]
    );
}
