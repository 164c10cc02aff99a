#![warn(missing_docs)]
//! # job-sentry-transport
//!
//! ## Purpose
//! Moves bytes between the panel and its two external data sources: the
//! scoring endpoint and the statistics document.
//!
//! ## Responsibilities
//! - Validate endpoint policy (`http`/`https` URLs only).
//! - Execute scoring requests through an injectable [`ScoringTransport`].
//! - Fetch the statistics document through an injectable [`StatsSource`].
//! - Provide `reqwest`-backed and file-system implementations.
//! - Classify transport failures for logging.
//!
//! ## Data flow
//! [`ScoringRequest`] -> [`ScoringClient::score`] -> [`ScoringTransport`] ->
//! raw response bytes. [`StatsSource::fetch`] -> raw document bytes.
//!
//! ## Ownership and lifetimes
//! Response bodies are returned as owned `Vec<u8>` so decoding never borrows
//! from a live connection.
//!
//! ## Error model
//! Every failure is a [`TransportError`]. A non-success HTTP status is an error
//! just like an unreachable host; callers never see a partial body. No call is
//! retried here.
//!
//! ## Security and privacy notes
//! Request bodies carry posting text; this crate logs only sizes and status
//! codes, never the body itself.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use job_sentry_core::ScoringRequest;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Abstract transport used by [`ScoringClient`].
pub trait ScoringTransport: Send + Sync {
    /// POSTs a JSON body and returns the response body of a 2xx reply.
    ///
    /// # Errors
    /// Returns [`TransportError::Client`] / [`TransportError::Server`] for
    /// non-success statuses and [`TransportError::Network`] when the endpoint
    /// is unreachable.
    fn post_json(&self, endpoint: &Url, body: &[u8]) -> Result<Vec<u8>, TransportError>;
}

/// Abstract source of the statistics document.
pub trait StatsSource: Send + Sync {
    /// Fetches the full document body.
    ///
    /// # Errors
    /// Returns a [`TransportError`] when the document cannot be retrieved.
    fn fetch(&self) -> Result<Vec<u8>, TransportError>;

    /// Human-readable location for logs.
    fn location(&self) -> String;
}

/// Scoring client that validates endpoint policy and sends requests.
#[derive(Clone)]
pub struct ScoringClient {
    endpoint: Url,
    transport: Arc<dyn ScoringTransport>,
}

impl ScoringClient {
    /// Creates a validated scoring client.
    ///
    /// # Errors
    /// Returns [`TransportError::InvalidEndpoint`] when the URL is malformed
    /// or not `http`/`https`.
    pub fn new(
        endpoint: impl AsRef<str>,
        transport: Arc<dyn ScoringTransport>,
    ) -> Result<Self, TransportError> {
        let endpoint = validate_endpoint(endpoint.as_ref())?;
        Ok(Self {
            endpoint,
            transport,
        })
    }

    /// Sends one scoring request and returns the raw response body.
    ///
    /// # Errors
    /// Returns [`TransportError::Encode`] when the request cannot be
    /// serialized; transport errors propagate as-is.
    pub fn score(&self, request: &ScoringRequest) -> Result<Vec<u8>, TransportError> {
        let body = request
            .to_json_bytes()
            .map_err(|error| TransportError::Encode(error.to_string()))?;
        debug!(
            endpoint = %self.endpoint,
            body_bytes = body.len(),
            "sending scoring request"
        );
        self.transport.post_json(&self.endpoint, &body)
    }

    /// Returns the configured endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Validates that an endpoint is an absolute `http`/`https` URL.
///
/// # Errors
/// Returns [`TransportError::InvalidEndpoint`] otherwise.
pub fn validate_endpoint(endpoint: &str) -> Result<Url, TransportError> {
    let parsed = Url::parse(endpoint)
        .map_err(|error| TransportError::InvalidEndpoint(format!("invalid url: {error}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(TransportError::InvalidEndpoint(format!(
            "unsupported scheme `{other}`"
        ))),
    }
}

/// `reqwest` blocking transport used for the scoring endpoint and HTTP stats.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a client. `None` waits on every request until it settles.
    ///
    /// # Errors
    /// Returns [`TransportError::Network`] when the TLS backend or client
    /// cannot be initialized.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| TransportError::Network(error.to_string()))?;
        Ok(Self { client })
    }

    fn get(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(map_reqwest_error)?;
        read_success_body(response)
    }
}

impl ScoringTransport for HttpTransport {
    fn post_json(&self, endpoint: &Url, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .post(endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_vec())
            .send()
            .map_err(map_reqwest_error)?;
        read_success_body(response)
    }
}

fn read_success_body(response: reqwest::blocking::Response) -> Result<Vec<u8>, TransportError> {
    let status = response.status();
    if !status.is_success() {
        return Err(status_error(status));
    }
    let bytes = response.bytes().map_err(map_reqwest_error)?;
    debug!(status = status.as_u16(), body_bytes = bytes.len(), "received response");
    Ok(bytes.to_vec())
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(error.to_string())
    }
}

/// Maps a non-success status to the matching error variant.
pub fn status_error(status: StatusCode) -> TransportError {
    if status.is_client_error() {
        TransportError::Client(status.as_u16())
    } else {
        TransportError::Server(status.as_u16())
    }
}

/// Statistics document served over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStatsSource {
    url: Url,
    transport: HttpTransport,
}

impl HttpStatsSource {
    /// Creates a source for an already validated URL.
    pub fn new(url: Url, transport: HttpTransport) -> Self {
        Self { url, transport }
    }
}

impl StatsSource for HttpStatsSource {
    fn fetch(&self) -> Result<Vec<u8>, TransportError> {
        self.transport.get(&self.url)
    }

    fn location(&self) -> String {
        self.url.to_string()
    }
}

/// Statistics document read from the local file system.
#[derive(Debug, Clone)]
pub struct FileStatsSource {
    path: PathBuf,
}

impl FileStatsSource {
    /// Creates a source for a path, relative to the working directory or
    /// absolute.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StatsSource for FileStatsSource {
    fn fetch(&self) -> Result<Vec<u8>, TransportError> {
        std::fs::read(&self.path).map_err(|error| {
            TransportError::Io(format!("{}: {error}", self.path.display()))
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Picks an HTTP source for `http(s)` URLs and a file source otherwise.
///
/// # Errors
/// Returns [`TransportError::Network`] when the HTTP client cannot be built.
pub fn stats_source_for(
    location: &str,
    timeout: Option<Duration>,
) -> Result<Arc<dyn StatsSource>, TransportError> {
    match validate_endpoint(location) {
        Ok(url) => Ok(Arc::new(HttpStatsSource::new(url, HttpTransport::new(timeout)?))),
        Err(_) => Ok(Arc::new(FileStatsSource::new(location))),
    }
}

/// Failure category, used for log severity only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Another attempt could plausibly succeed.
    Retriable,
    /// Another attempt would fail the same way.
    Permanent,
}

/// Classifies a transport error.
pub fn classify_transport_error(error: &TransportError) -> FailureClass {
    match error {
        TransportError::Timeout | TransportError::Network(_) | TransportError::Server(_) => {
            FailureClass::Retriable
        }
        TransportError::Client(429) => FailureClass::Retriable,
        TransportError::Client(_)
        | TransportError::Io(_)
        | TransportError::Encode(_)
        | TransportError::InvalidEndpoint(_) => FailureClass::Permanent,
    }
}

/// Transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Endpoint violates policy or is malformed.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Request body could not be encoded.
    #[error("request encode failure: {0}")]
    Encode(String),
    /// Endpoint unreachable or connection dropped.
    #[error("network failure: {0}")]
    Network(String),
    /// Request timed out.
    #[error("request timed out")]
    Timeout,
    /// 4xx status.
    #[error("client error status {0}")]
    Client(u16),
    /// 5xx (or other non-success) status.
    #[error("server error status {0}")]
    Server(u16),
    /// Local document could not be read.
    #[error("document read failure: {0}")]
    Io(String),
}
