//! Statistical bound checks for demo-mode probabilities.

mod common;

use std::sync::Arc;

use job_sentry_app::{
    DEMO_PROBABILITY_MAX, DEMO_PROBABILITY_MIN, OutcomeSource, RngDemoSampler, demo_probability,
};
use job_sentry_core::JobPostingFields;
use job_sentry_transport::TransportError;
use proptest::prelude::*;

proptest! {
    #[test]
    fn demo_probability_stays_in_range(unit in 0.0f64..1.0) {
        let probability = demo_probability(unit);
        prop_assert!(probability >= DEMO_PROBABILITY_MIN);
        prop_assert!(probability <= DEMO_PROBABILITY_MAX);
    }
}

#[test]
fn demo_probability_bounds_tests_os_seeded_sampler() {
    let pipeline = common::submission_pipeline(
        common::StubTransport::failing(TransportError::Timeout),
        Arc::new(RngDemoSampler::from_os_rng()),
    );

    for _ in 0..2_000 {
        let report = pipeline.score(&JobPostingFields::new());
        assert_eq!(report.source, OutcomeSource::Demo);
        assert!(report.outcome.probability >= DEMO_PROBABILITY_MIN);
        assert!(report.outcome.probability <= DEMO_PROBABILITY_MAX);
    }
}

#[test]
fn demo_probability_bounds_tests_misbehaving_sampler_is_contained() {
    let pipeline = common::submission_pipeline(
        common::StubTransport::failing(TransportError::Timeout),
        Arc::new(common::FixedSampler(f64::NAN)),
    );
    let report = pipeline.score(&JobPostingFields::new());
    assert_eq!(report.outcome.probability, DEMO_PROBABILITY_MIN);
}
