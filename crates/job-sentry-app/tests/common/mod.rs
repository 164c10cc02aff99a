//! Shared fixtures for app integration tests.

use std::sync::{Arc, Mutex};

use job_sentry_app::{Clock, DemoSampler, StatisticsPipeline, SubmissionPipeline};
use job_sentry_transport::{ScoringClient, ScoringTransport, StatsSource, TransportError};
use url::Url;

/// Endpoint used by every stub scoring client.
pub const TEST_ENDPOINT: &str = "https://scoring.example.test/predict";

/// Scoring transport that returns a canned result and records request bodies.
#[allow(dead_code)]
#[derive(Debug)]
pub struct StubTransport {
    reply: Result<Vec<u8>, TransportError>,
    pub bodies: Mutex<Vec<serde_json::Value>>,
}

impl StubTransport {
    /// Replies with the given JSON body.
    #[allow(dead_code)]
    pub fn replying(body: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(body.to_string().into_bytes()),
            bodies: Mutex::new(Vec::new()),
        })
    }

    /// Replies with raw bytes.
    #[allow(dead_code)]
    pub fn replying_raw(body: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(body.to_vec()),
            bodies: Mutex::new(Vec::new()),
        })
    }

    /// Fails every request.
    #[allow(dead_code)]
    pub fn failing(error: TransportError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(error),
            bodies: Mutex::new(Vec::new()),
        })
    }
}

impl ScoringTransport for StubTransport {
    fn post_json(&self, _endpoint: &Url, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        let decoded = serde_json::from_slice(body).expect("request body should be json");
        self.bodies
            .lock()
            .expect("body log lock should work")
            .push(decoded);
        self.reply.clone()
    }
}

/// Sampler returning a fixed unit value.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub struct FixedSampler(pub f64);

impl DemoSampler for FixedSampler {
    fn sample_unit(&self) -> f64 {
        self.0
    }
}

/// Clock frozen at one instant.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

/// Stats source returning a canned result.
#[allow(dead_code)]
#[derive(Debug)]
pub struct StaticStatsSource(pub Result<Vec<u8>, TransportError>);

impl StatsSource for StaticStatsSource {
    fn fetch(&self) -> Result<Vec<u8>, TransportError> {
        self.0.clone()
    }

    fn location(&self) -> String {
        "memory://eda_data.json".to_string()
    }
}

/// Builds a submission pipeline over any scoring transport.
#[allow(dead_code)]
pub fn submission_pipeline(
    transport: Arc<dyn ScoringTransport>,
    sampler: Arc<dyn DemoSampler>,
) -> SubmissionPipeline {
    let client = ScoringClient::new(TEST_ENDPOINT, transport).expect("test endpoint is valid");
    SubmissionPipeline::new(client, sampler)
}

/// Builds a statistics pipeline over a canned document.
#[allow(dead_code)]
pub fn statistics_pipeline(reply: Result<&[u8], TransportError>) -> StatisticsPipeline {
    StatisticsPipeline::new(Arc::new(StaticStatsSource(reply.map(<[u8]>::to_vec))))
}
