#![warn(missing_docs)]
//! # job-sentry-app binary
//!
//! Console entry point: loads statistics, optionally scores a posting read as
//! a JSON object from stdin, and prints the resulting panel.

use std::io::{IsTerminal, Read};

use job_sentry_app::{
    Clock, PanelConfig, SystemClock, app_version, build_pipelines, init_tracing,
    project_panel_status, run_startup,
};
use job_sentry_core::JobPostingFields;
use job_sentry_ui::TextChartSurface;
use tracing::{error, warn};

/// CLI entry point.
fn main() {
    init_tracing("info");

    if let Err(message) = run() {
        error!(%message, "job-sentry failed to start");
        eprintln!("job-sentry: {message}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config = PanelConfig::from_env();
    let (submission, statistics) = build_pipelines(&config).map_err(|error| error.to_string())?;
    let fields = read_posting_from_stdin();

    let clock = SystemClock;
    let report = run_startup(
        &submission,
        &statistics,
        fields,
        TextChartSurface::new(),
        &clock,
    )
    .map_err(|error| error.to_string())?;

    let snapshot = project_panel_status(&report.panel, clock.now_ms());

    println!("job-sentry {}", app_version());
    if let Some(verdict) = &snapshot.verdict {
        println!("{verdict}");
    }
    if let Some(line) = &snapshot.probability_line {
        println!("{line}");
    }
    if let Some(note) = &snapshot.status_note {
        println!("({note})");
    }
    if let Some(diagnostic) = &snapshot.diagnostic {
        println!("! {diagnostic}");
    }
    if let Some([total, real, fraud]) = &snapshot.headline {
        println!("Total: {total}  Real: {real}  Fraud: {fraud}");
    }
    for (_, drawing) in report.renderer.surface().live_charts() {
        print!("{drawing}");
    }

    Ok(())
}

fn read_posting_from_stdin() -> Option<JobPostingFields> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return None;
    }

    let mut raw = String::new();
    if let Err(error) = stdin.lock().read_to_string(&mut raw) {
        warn!(%error, "could not read posting from stdin");
        return None;
    }
    if raw.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(document) => Some(JobPostingFields::from_json(&document)),
        Err(error) => {
            warn!(%error, "stdin is not a JSON posting, skipping submission");
            None
        }
    }
}
