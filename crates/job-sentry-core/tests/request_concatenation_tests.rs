//! Tests fixed-order concatenation of posting fields.

use job_sentry_core::{JobPostingFields, PostingField, ScoringRequest};
use serde_json::json;

#[test]
fn request_concatenation_tests_keep_separator_for_empty_fields() {
    let fields = JobPostingFields::new().with(PostingField::Title, "Remote Engineer");
    let request = ScoringRequest::from_fields(&fields);
    assert_eq!(request.full_text, format!("Remote Engineer{}", " ".repeat(8)));
}

#[test]
fn request_concatenation_tests_trim_and_order_fields() {
    let fields = JobPostingFields::from_pairs([
        ("industry", " IT "),
        ("title", "  Data Analyst\n"),
        ("location", "US, NY"),
        ("unknown_field", "ignored"),
    ]);
    let request = ScoringRequest::from_fields(&fields);
    assert_eq!(
        request.full_text,
        "Data Analyst".to_string() + "     " + "US, NY" + "   " + "IT"
    );
}

#[test]
fn request_concatenation_tests_serialize_only_full_text() {
    let fields = JobPostingFields::from_json(&json!({
        "title": "Clerk",
        "benefits": 42,
        "description": "Typing"
    }));
    assert_eq!(fields.get(PostingField::Benefits), "");

    let bytes = ScoringRequest::from_fields(&fields)
        .to_json_bytes()
        .expect("request should encode");
    let decoded: serde_json::Value = serde_json::from_slice(&bytes).expect("valid json");
    assert_eq!(decoded, json!({ "full_text": "Clerk  Typing      " }));
}
