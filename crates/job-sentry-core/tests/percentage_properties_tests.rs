//! Property tests for clamping, classification, and percentage formatting.

use job_sentry_core::{Classification, PredictionOutcome, Probability};
use proptest::prelude::*;

fn parse_percent(text: &str) -> f64 {
    text.parse().expect("percent should be numeric")
}

proptest! {
    #[test]
    fn percentages_sum_to_one_hundred(raw in -10.0f64..10.0) {
        let probability = Probability::clamped(raw).expect("finite input");
        prop_assert!((0.0..=1.0).contains(&probability.value()));

        let outcome = PredictionOutcome::from_probability(probability);
        let sum = parse_percent(&outcome.fraud_percent) + parse_percent(&outcome.legitimate_percent);
        prop_assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn classification_follows_threshold(raw in 0.0f64..=1.0) {
        let outcome = PredictionOutcome::from_probability(Probability::clamped(raw).expect("finite"));
        let expected = if raw < 0.5 { Classification::Legitimate } else { Classification::Fraudulent };
        prop_assert_eq!(outcome.classification, expected);
        prop_assert_eq!(outcome.display_text.as_str(), expected.message());
    }
}

#[test]
fn percentage_properties_tests_format_one_decimal() {
    let outcome = PredictionOutcome::from_probability(Probability::clamped(0.1234).expect("finite"));
    assert_eq!(outcome.fraud_percent, "12.3");
    assert_eq!(outcome.legitimate_percent, "87.7");

    let saturated = PredictionOutcome::from_probability(Probability::clamped(4.0).expect("finite"));
    assert_eq!(
        saturated.probability_text,
        "Fraud probability: 100.0% · Legitimate probability: 0.0%"
    );
}
