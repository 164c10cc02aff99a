#![warn(missing_docs)]
//! # job-sentry-scoring-contract
//!
//! ## Purpose
//! Defines the scoring service response contract and client-side extraction.
//!
//! ## Responsibilities
//! - Parse untrusted scoring responses.
//! - Pick the fraud probability from one of three accepted field names.
//! - Turn the extracted value into a [`PredictionOutcome`].
//!
//! ## Data flow
//! Raw JSON response -> [`parse_scoring_response`] -> [`extract_probability`]
//! -> [`Probability::clamped`] -> [`PredictionOutcome`].
//!
//! ## Error model
//! Invalid JSON, missing fields, and non-numeric values return
//! [`ScoringContractError`]. Callers collapse every variant into the demo
//! fallback, so the variants exist for logging only.

use job_sentry_core::{CoreError, PredictionOutcome, Probability};
use serde_json::Value;
use thiserror::Error;

/// Accepted probability field names, in priority order.
pub const PROBABILITY_FIELDS: [&str; 3] = ["fraud_proba", "probability", "fraud_probability"];

/// Parses a raw response body and maps it to a rendered outcome.
///
/// # Errors
/// Returns [`ScoringContractError::Decode`] for invalid JSON; extraction
/// failures are described on [`extract_probability`].
pub fn parse_scoring_response(raw: &[u8]) -> Result<PredictionOutcome, ScoringContractError> {
    let document: Value = serde_json::from_slice(raw).map_err(ScoringContractError::Decode)?;
    let probability = extract_probability(&document)?;
    Ok(PredictionOutcome::from_probability(probability))
}

/// Reads the first field from [`PROBABILITY_FIELDS`] whose value is a JSON
/// number and clamps it into `[0, 1]`.
///
/// A field holding a non-number (string, null, ...) is skipped, not fatal;
/// lower-priority names are still consulted.
///
/// # Errors
/// Returns [`ScoringContractError::MissingProbability`] when no accepted field
/// holds a number.
/// Returns [`ScoringContractError::InvalidProbability`] when the number cannot
/// be read as an `f64`.
pub fn extract_probability(document: &Value) -> Result<Probability, ScoringContractError> {
    let (field, raw) = PROBABILITY_FIELDS
        .iter()
        .find_map(|field| {
            document
                .get(field)
                .filter(|value| value.is_number())
                .map(|value| (*field, value))
        })
        .ok_or(ScoringContractError::MissingProbability)?;

    let number = raw
        .as_f64()
        .ok_or_else(|| ScoringContractError::InvalidProbability(field.to_string()))?;

    Probability::clamped(number).map_err(ScoringContractError::Core)
}

/// Scoring contract errors.
#[derive(Debug, Error)]
pub enum ScoringContractError {
    /// JSON decode failure.
    #[error("scoring response decode failure: {0}")]
    Decode(#[source] serde_json::Error),
    /// None of the accepted fields held a number.
    #[error("scoring response has no numeric probability field")]
    MissingProbability,
    /// The selected field could not be read as a float.
    #[error("scoring response field `{0}` is not a usable number")]
    InvalidProbability(String),
    /// Probability rejected by the core model.
    #[error("scoring response probability rejected: {0}")]
    Core(#[from] CoreError),
}
