//! Overlapping submissions are not serialized: the last attempt to finish
//! decides what the panel shows.

mod common;

use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};

use job_sentry_app::OutcomeSource;
use job_sentry_core::{JobPostingFields, PostingField};
use job_sentry_transport::{ScoringTransport, TransportError};
use job_sentry_ui::PanelState;
use url::Url;

/// Holds requests titled "slow" until released; answers others at once.
struct GatedTransport {
    gate: Mutex<Receiver<()>>,
}

impl ScoringTransport for GatedTransport {
    fn post_json(&self, _endpoint: &Url, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        let request: serde_json::Value = serde_json::from_slice(body).expect("json body");
        let text = request["full_text"].as_str().expect("full_text string");
        if text.starts_with("slow") {
            self.gate
                .lock()
                .expect("gate lock")
                .recv()
                .expect("gate released");
            Ok(br#"{"fraud_proba": 0.9}"#.to_vec())
        } else {
            Ok(br#"{"fraud_proba": 0.1}"#.to_vec())
        }
    }
}

#[test]
fn overlapping_submission_tests_last_finisher_wins() {
    let (release, gate) = mpsc::channel();
    let pipeline = common::submission_pipeline(
        Arc::new(GatedTransport {
            gate: Mutex::new(gate),
        }),
        Arc::new(common::FixedSampler(0.0)),
    );
    let panel = Mutex::new(PanelState::new("test"));
    let clock = common::FixedClock(0);

    let slow_fields = JobPostingFields::new().with(PostingField::Title, "slow");
    let fast_fields = JobPostingFields::new().with(PostingField::Title, "fast");

    std::thread::scope(|scope| {
        let slow = scope.spawn(|| pipeline.submit(&slow_fields, &panel, &clock));

        // Wait until the slow attempt has disabled the control.
        while panel.lock().expect("panel lock").submit_enabled {
            std::thread::yield_now();
        }

        let fast = pipeline.submit(&fast_fields, &panel, &clock);
        assert_eq!(fast.source, OutcomeSource::Service);
        {
            let state = panel.lock().expect("panel lock");
            assert!(state.submit_enabled, "fast attempt re-enables while slow is pending");
            assert_eq!(state.prediction.as_ref().map(|p| p.probability), Some(0.1));
        }

        release.send(()).expect("slow attempt waiting");
        let slow = slow.join().expect("slow attempt finishes");
        assert_eq!(slow.source, OutcomeSource::Service);
    });

    let state = panel.lock().expect("panel lock");
    assert_eq!(state.prediction_renders, 2);
    assert_eq!(state.prediction.as_ref().map(|p| p.probability), Some(0.9));
    assert!(state.submit_enabled);
}
