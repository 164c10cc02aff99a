#![warn(missing_docs)]
//! # job-sentry-app
//!
//! ## Purpose
//! Orchestrates the two panel pipelines for `job-sentry`: scoring a job
//! posting and loading the exploratory statistics.
//!
//! ## Responsibilities
//! - Submission pipeline: concatenate fields, call the scoring service, and
//!   fall back to a demo probability on any failure.
//! - Statistics pipeline: fetch and normalize the statistics document, or
//!   fall back to the fixed record with a diagnostic banner.
//! - Load configuration, install tracing, and run both pipelines at startup.
//!
//! ## Data flow
//! [`PanelConfig`] -> [`run_startup`] -> ([`SubmissionPipeline::submit`] ||
//! [`StatisticsPipeline::load_and_render`]) -> [`PanelState`] + charts ->
//! [`project_panel_status`].
//!
//! ## Ownership and lifetimes
//! Pipelines hold `Arc`ed transports and share the panel state through a
//! `Mutex`; each pipeline touches only its own parts of the panel.
//!
//! ## Error model
//! Pipelines never return errors: transport and schema failures are logged
//! and replaced by their fallback. [`AppError`] covers startup only
//! (invalid endpoints and worker failures) plus the internal failure taxonomy
//! reported in logs.

mod config;
mod statistics;
mod submission;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use job_sentry_core::JobPostingFields;
use job_sentry_scoring_contract::ScoringContractError;
use job_sentry_stats::StatsError;
use job_sentry_transport::{HttpTransport, ScoringClient, TransportError, stats_source_for};
use job_sentry_ui::{ChartSurface, PanelState, ResultTone, Renderer};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::{
    DEFAULT_SCORING_ENDPOINT, DEFAULT_STATS_LOCATION, ENV_HTTP_TIMEOUT_SECS,
    ENV_SCORING_ENDPOINT, ENV_STATS_LOCATION, PanelConfig,
};
pub use statistics::{StatisticsPipeline, StatsOrigin, StatsReport};
pub use submission::{
    DEMO_NOTE, DEMO_PROBABILITY_MAX, DEMO_PROBABILITY_MIN, DemoSampler, OutcomeSource,
    PENDING_NOTE, RECEIVED_NOTE, RngDemoSampler, SubmissionPipeline, SubmissionReport,
    demo_probability, log_safe_request_summary,
};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("JOB_SENTRY_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Wall-clock source, injectable for deterministic tests.
pub trait Clock: Send + Sync {
    /// Current Unix time in milliseconds.
    fn now_ms(&self) -> u64;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// Installs the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG`, then `JOB_SENTRY_LOG`, then
/// `default_level`. Calling this twice keeps the first subscriber.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_from_env("JOB_SENTRY_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// Locks the shared panel state, recovering from a poisoned lock.
pub fn lock_panel(panel: &Mutex<PanelState>) -> MutexGuard<'_, PanelState> {
    panel
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Flat status snapshot for simple front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSnapshot {
    /// Whether the submit control is enabled.
    pub submit_enabled: bool,
    /// Status note visible at the snapshot time.
    pub status_note: Option<String>,
    /// Prediction box tone.
    pub tone: ResultTone,
    /// Verdict message.
    pub verdict: Option<String>,
    /// Percentage line.
    pub probability_line: Option<String>,
    /// Formatted `total`, `real`, `fraud` counters.
    pub headline: Option<[String; 3]>,
    /// Statistics diagnostic banner.
    pub diagnostic: Option<String>,
}

/// Projects panel state into a flat snapshot at `now_ms`.
pub fn project_panel_status(state: &PanelState, now_ms: u64) -> PanelSnapshot {
    PanelSnapshot {
        submit_enabled: state.submit_enabled,
        status_note: state.status.visible(now_ms).map(str::to_string),
        tone: state.result_tone(),
        verdict: state
            .prediction
            .as_ref()
            .map(|outcome| outcome.display_text.clone()),
        probability_line: state
            .prediction
            .as_ref()
            .map(|outcome| outcome.probability_text.clone()),
        headline: state.eda.as_ref().map(|eda| eda.headline.clone()),
        diagnostic: state.eda.as_ref().and_then(|eda| eda.diagnostic.clone()),
    }
}

/// Everything produced by one startup run.
#[derive(Debug)]
pub struct StartupReport<S> {
    /// Final panel state.
    pub panel: PanelState,
    /// Submission result, when a posting was supplied.
    pub submission: Option<SubmissionReport>,
    /// Statistics result.
    pub stats: StatsReport,
    /// Renderer holding the two live charts.
    pub renderer: Renderer<S>,
}

/// Builds both pipelines from configuration.
///
/// # Errors
/// Returns [`AppError::Transport`] when the scoring endpoint is invalid or the
/// HTTP client cannot be built.
pub fn build_pipelines(
    config: &PanelConfig,
) -> Result<(SubmissionPipeline, StatisticsPipeline), AppError> {
    let http = Arc::new(HttpTransport::new(config.http_timeout)?);
    let client = ScoringClient::new(&config.scoring_endpoint, http)?;
    let source = stats_source_for(&config.stats_location, config.http_timeout)?;

    Ok((
        SubmissionPipeline::new(client, Arc::new(RngDemoSampler::from_os_rng())),
        StatisticsPipeline::new(source),
    ))
}

/// Runs the startup sequence: statistics load and, when `fields` is given,
/// one submission. The two pipelines run concurrently on scoped threads.
///
/// # Errors
/// Returns [`AppError::Worker`] when a pipeline thread panics.
pub fn run_startup<S>(
    submission: &SubmissionPipeline,
    statistics: &StatisticsPipeline,
    fields: Option<JobPostingFields>,
    surface: S,
    clock: &dyn Clock,
) -> Result<StartupReport<S>, AppError>
where
    S: ChartSurface + Send,
{
    let panel = Mutex::new(PanelState::new(app_version()));
    let mut renderer = Renderer::new(surface);

    info!(
        version = app_version(),
        submit = fields.is_some(),
        "starting panel pipelines"
    );

    let (submission_report, stats_report) = std::thread::scope(|scope| {
        let stats_worker =
            scope.spawn(|| statistics.load_and_render(&panel, &mut renderer));
        let submit_worker = scope.spawn(|| {
            fields.map(|fields| submission.submit(&fields, &panel, clock))
        });

        let stats = stats_worker
            .join()
            .map_err(|_| AppError::Worker("statistics pipeline panicked".to_string()))?;
        let submitted = submit_worker
            .join()
            .map_err(|_| AppError::Worker("submission pipeline panicked".to_string()))?;
        Ok::<_, AppError>((submitted, stats))
    })?;

    let panel = panel.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());

    Ok(StartupReport {
        panel,
        submission: submission_report,
        stats: stats_report,
        renderer,
    })
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Transport failure or invalid endpoint.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// Scoring response violated its contract.
    #[error("scoring contract error: {0}")]
    Scoring(#[from] ScoringContractError),
    /// Statistics document could not be decoded.
    #[error("statistics error: {0}")]
    Stats(#[from] StatsError),
    /// A pipeline worker thread panicked.
    #[error("worker failure: {0}")]
    Worker(String),
}
