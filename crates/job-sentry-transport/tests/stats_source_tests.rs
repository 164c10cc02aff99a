//! Integration tests for statistics document sources.

use std::io::Write;
use std::time::Duration;

use job_sentry_transport::{FileStatsSource, StatsSource, TransportError, stats_source_for};

#[test]
fn stats_source_tests_read_local_document() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file should be created");
    file.write_all(br#"{"summary":{"total_count":5}}"#)
        .expect("temp file should be writable");

    let source = FileStatsSource::new(file.path());
    let body = source.fetch().expect("document should be readable");
    assert_eq!(body, br#"{"summary":{"total_count":5}}"#.to_vec());
}

#[test]
fn stats_source_tests_missing_document_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let source = FileStatsSource::new(dir.path().join("eda_data.json"));
    assert!(matches!(source.fetch(), Err(TransportError::Io(_))));
}

#[test]
fn stats_source_tests_pick_source_by_location() {
    let file_source = stats_source_for("data/eda_data.json", None).expect("file source");
    assert_eq!(file_source.location(), "data/eda_data.json");

    let http_source = stats_source_for(
        "https://static.example.test/data/eda_data.json",
        Some(Duration::from_secs(1)),
    )
    .expect("http source");
    assert_eq!(
        http_source.location(),
        "https://static.example.test/data/eda_data.json"
    );
}
