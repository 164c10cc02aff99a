//! Integration tests for transport failure classification.

use job_sentry_transport::{FailureClass, TransportError, classify_transport_error};

#[test]
fn transport_error_classification_tests_distinguish_transient_and_permanent() {
    assert_eq!(
        classify_transport_error(&TransportError::Server(503)),
        FailureClass::Retriable
    );
    assert_eq!(
        classify_transport_error(&TransportError::Client(429)),
        FailureClass::Retriable
    );
    assert_eq!(
        classify_transport_error(&TransportError::Client(400)),
        FailureClass::Permanent
    );
    assert_eq!(
        classify_transport_error(&TransportError::Io("missing".to_string())),
        FailureClass::Permanent
    );
}
