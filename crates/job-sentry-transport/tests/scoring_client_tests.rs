//! Integration tests for the scoring client request path.

use std::sync::{Arc, Mutex};

use job_sentry_core::{JobPostingFields, PostingField, ScoringRequest};
use job_sentry_transport::{ScoringClient, ScoringTransport, TransportError};
use url::Url;

#[derive(Debug, Default)]
struct RecordingTransport {
    calls: Mutex<Vec<(String, Vec<u8>)>>,
}

impl ScoringTransport for RecordingTransport {
    fn post_json(&self, endpoint: &Url, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.calls
            .lock()
            .expect("call log lock should work")
            .push((endpoint.to_string(), body.to_vec()));
        Ok(br#"{"probability":0.1}"#.to_vec())
    }
}

#[test]
fn scoring_client_tests_send_full_text_only() {
    let transport = Arc::new(RecordingTransport::default());
    let client = ScoringClient::new("https://scoring.example.test/predict", transport.clone())
        .expect("client should build");

    let fields = JobPostingFields::new()
        .with(PostingField::Title, "Nurse")
        .with(PostingField::Industry, "Health");
    let body = client
        .score(&ScoringRequest::from_fields(&fields))
        .expect("stub transport succeeds");
    assert_eq!(body, br#"{"probability":0.1}"#.to_vec());

    let calls = transport.calls.lock().expect("call log lock should work");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "https://scoring.example.test/predict");
    let sent: serde_json::Value = serde_json::from_slice(&calls[0].1).expect("body is json");
    assert_eq!(sent, serde_json::json!({ "full_text": "Nurse        Health" }));
}

#[test]
fn scoring_client_tests_reject_invalid_endpoint() {
    let transport = Arc::new(RecordingTransport::default());
    assert!(matches!(
        ScoringClient::new("predict", transport),
        Err(TransportError::InvalidEndpoint(_))
    ));
}
