//! Submission pipeline: score one posting, or fall back to a demo prediction.

use std::sync::{Arc, Mutex};

use job_sentry_core::{JobPostingFields, PredictionOutcome, Probability, ScoringRequest};
use job_sentry_scoring_contract::parse_scoring_response;
use job_sentry_transport::{ScoringClient, classify_transport_error};
use job_sentry_ui::PanelState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::{AppError, Clock, lock_panel};

/// Status note while the request is in flight.
pub const PENDING_NOTE: &str = "Sending request...";
/// Status note after a real service response.
pub const RECEIVED_NOTE: &str = "Prediction received.";
/// Status note after falling back to a demo prediction.
pub const DEMO_NOTE: &str = "Backend unavailable, showing demo prediction.";

/// Lower bound of demo probabilities.
pub const DEMO_PROBABILITY_MIN: f64 = 0.02;
/// Upper bound of demo probabilities.
pub const DEMO_PROBABILITY_MAX: f64 = 0.85;

/// Source of uniform samples for demo predictions.
pub trait DemoSampler: Send + Sync {
    /// Returns a sample in `[0, 1)`.
    fn sample_unit(&self) -> f64;
}

/// [`DemoSampler`] backed by a locked [`StdRng`].
#[derive(Debug)]
pub struct RngDemoSampler {
    rng: Mutex<StdRng>,
}

impl RngDemoSampler {
    /// Seeds from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic sampler for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl DemoSampler for RngDemoSampler {
    fn sample_unit(&self) -> f64 {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random::<f64>()
    }
}

/// Maps a unit sample onto `[DEMO_PROBABILITY_MIN, DEMO_PROBABILITY_MAX]`.
pub fn demo_probability(unit: f64) -> f64 {
    (DEMO_PROBABILITY_MIN + unit * (DEMO_PROBABILITY_MAX - DEMO_PROBABILITY_MIN))
        .min(DEMO_PROBABILITY_MAX)
}

/// Which path produced an outcome. Never rendered; logs and tests only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeSource {
    /// Parsed from the scoring service.
    Service,
    /// Synthesized because the service was unavailable.
    Demo,
}

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
    /// Rendered outcome.
    pub outcome: PredictionOutcome,
    /// Out-of-band origin marker.
    pub source: OutcomeSource,
}

/// Log-safe description of a request; never includes the posting text.
pub fn log_safe_request_summary(request: &ScoringRequest) -> String {
    format!(
        "full_text_chars={} non_blank={}",
        request.full_text.chars().count(),
        !request.full_text.trim().is_empty()
    )
}

/// Scores postings through the service with a demo fallback.
#[derive(Clone)]
pub struct SubmissionPipeline {
    client: ScoringClient,
    sampler: Arc<dyn DemoSampler>,
}

impl SubmissionPipeline {
    /// Creates a pipeline.
    pub fn new(client: ScoringClient, sampler: Arc<dyn DemoSampler>) -> Self {
        Self { client, sampler }
    }

    /// Scores one posting without touching panel state.
    ///
    /// Transport failures, non-success statuses, and responses without a
    /// numeric probability all yield a demo outcome. There is no retry.
    pub fn score(&self, fields: &JobPostingFields) -> SubmissionReport {
        let request = ScoringRequest::from_fields(fields);
        debug!(request = %log_safe_request_summary(&request), "built scoring request");

        match self.request_outcome(&request) {
            Ok(outcome) => {
                info!(
                    probability = outcome.probability,
                    classification = ?outcome.classification,
                    "prediction received"
                );
                SubmissionReport {
                    outcome,
                    source: OutcomeSource::Service,
                }
            }
            Err(error) => {
                let failure_class = match &error {
                    AppError::Transport(transport) => {
                        Some(classify_transport_error(transport))
                    }
                    _ => None,
                };
                warn!(
                    %error,
                    ?failure_class,
                    "real backend not available, using demo prediction"
                );
                SubmissionReport {
                    outcome: self.demo_outcome(),
                    source: OutcomeSource::Demo,
                }
            }
        }
    }

    /// Runs one full attempt against the shared panel.
    ///
    /// Disables submit and shows the pending note, scores, renders the
    /// outcome, re-enables submit, and schedules the note clear. Concurrent
    /// calls are not serialized; the last one to finish wins.
    pub fn submit(
        &self,
        fields: &JobPostingFields,
        panel: &Mutex<PanelState>,
        clock: &dyn Clock,
    ) -> SubmissionReport {
        lock_panel(panel).begin_submission(PENDING_NOTE);

        let report = self.score(fields);
        let note = match report.source {
            OutcomeSource::Service => RECEIVED_NOTE,
            OutcomeSource::Demo => DEMO_NOTE,
        };

        lock_panel(panel).finish_submission(report.outcome.clone(), note, clock.now_ms());
        report
    }

    fn request_outcome(&self, request: &ScoringRequest) -> Result<PredictionOutcome, AppError> {
        let body = self.client.score(request)?;
        Ok(parse_scoring_response(&body)?)
    }

    fn demo_outcome(&self) -> PredictionOutcome {
        let unit = self.sampler.sample_unit();
        let unit = if (0.0..=1.0).contains(&unit) { unit } else { 0.0 };
        let probability = Probability::clamped(demo_probability(unit)).unwrap_or_default();
        PredictionOutcome::from_probability(probability)
    }
}
