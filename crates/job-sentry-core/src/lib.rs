#![warn(missing_docs)]
//! # job-sentry-core
//!
//! ## Purpose
//! Defines the pure data model used across the `job-sentry` workspace.
//!
//! ## Responsibilities
//! - Represent the nine free-text job-posting fields and their fixed order.
//! - Build the unstructured [`ScoringRequest`] sent to the scoring service.
//! - Clamp, classify, and format fraud probabilities into [`PredictionOutcome`].
//! - Represent exploratory statistics ([`EdaStats`], [`LengthBuckets`]) and the
//!   fixed fallback record used when the statistics document is unavailable.
//!
//! ## Data flow
//! Form input -> [`JobPostingFields`] -> [`ScoringRequest`] -> scoring service.
//! Service (or demo) probability -> [`Probability::clamped`] ->
//! [`PredictionOutcome::from_probability`] -> UI projection.
//!
//! ## Ownership and lifetimes
//! All values own their strings so they can move freely between the pipeline
//! threads and the UI state without borrowing from transient buffers.
//!
//! ## Error model
//! Non-numeric probabilities and JSON codec failures return [`CoreError`].
//!
//! ## Example
//! ```rust
//! use job_sentry_core::{Classification, PredictionOutcome, Probability};
//!
//! let outcome = PredictionOutcome::from_probability(Probability::clamped(0.73).unwrap());
//! assert_eq!(outcome.classification, Classification::Fraudulent);
//! assert_eq!(
//!     outcome.probability_text,
//!     "Fraud probability: 73.0% · Legitimate probability: 27.0%"
//! );
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Probabilities at or above this value classify as fraudulent.
pub const FRAUD_THRESHOLD: f64 = 0.5;

/// Texts shorter than this many characters fall in the short bucket.
pub const SHORT_TEXT_MAX_CHARS: usize = 300;

/// Texts longer than this many characters fall in the long bucket.
pub const LONG_TEXT_MIN_CHARS: usize = 800;

/// One named free-text field of a job posting form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostingField {
    /// Job title.
    Title,
    /// Company profile blurb.
    CompanyProfile,
    /// Job description.
    Description,
    /// Candidate requirements.
    Requirements,
    /// Offered benefits.
    Benefits,
    /// Job location.
    Location,
    /// Advertised salary range.
    SalaryRange,
    /// Employment type (full-time, contract, ...).
    EmploymentType,
    /// Industry.
    Industry,
}

impl PostingField {
    /// All fields in concatenation order.
    pub const ORDER: [PostingField; 9] = [
        PostingField::Title,
        PostingField::CompanyProfile,
        PostingField::Description,
        PostingField::Requirements,
        PostingField::Benefits,
        PostingField::Location,
        PostingField::SalaryRange,
        PostingField::EmploymentType,
        PostingField::Industry,
    ];

    /// Form key used by the posting form and JSON inputs.
    pub fn key(self) -> &'static str {
        match self {
            PostingField::Title => "title",
            PostingField::CompanyProfile => "company_profile",
            PostingField::Description => "description",
            PostingField::Requirements => "requirements",
            PostingField::Benefits => "benefits",
            PostingField::Location => "location",
            PostingField::SalaryRange => "salary_range",
            PostingField::EmploymentType => "employment_type",
            PostingField::Industry => "industry",
        }
    }

    /// Resolves a form key into a field.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|field| field.key() == key)
    }
}

/// Raw form values for one submission attempt.
///
/// Missing fields are empty strings. Values are stored untrimmed; trimming
/// happens when the request is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPostingFields {
    values: [String; 9],
}

impl JobPostingFields {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: PostingField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Sets one field value.
    pub fn set(&mut self, field: PostingField, value: impl Into<String>) {
        self.values[field_index(field)] = value.into();
    }

    /// Returns one raw field value.
    pub fn get(&self, field: PostingField) -> &str {
        &self.values[field_index(field)]
    }

    /// Builds a form from `(key, value)` pairs; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut fields = Self::new();
        for (key, value) in pairs {
            if let Some(field) = PostingField::from_key(key.as_ref()) {
                fields.set(field, value);
            }
        }
        fields
    }

    /// Builds a form from a JSON object.
    ///
    /// Non-object documents yield an empty form; non-string values are
    /// treated as missing.
    pub fn from_json(document: &Value) -> Self {
        let Some(object) = document.as_object() else {
            return Self::new();
        };

        Self::from_pairs(
            object
                .iter()
                .filter_map(|(key, value)| value.as_str().map(|text| (key.as_str(), text))),
        )
    }
}

fn field_index(field: PostingField) -> usize {
    // Declaration order matches `PostingField::ORDER`.
    field as usize
}

/// Request body sent to the scoring service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRequest {
    /// All posting fields, trimmed and space-joined in [`PostingField::ORDER`].
    pub full_text: String,
}

impl ScoringRequest {
    /// Concatenates the form into one unstructured text blob.
    ///
    /// Every field contributes a separating space even when empty, so a form
    /// with only `title = "Remote Engineer"` yields `"Remote Engineer"`
    /// followed by eight spaces.
    pub fn from_fields(fields: &JobPostingFields) -> Self {
        let full_text = PostingField::ORDER
            .iter()
            .map(|field| fields.get(*field).trim())
            .collect::<Vec<_>>()
            .join(" ");

        Self { full_text }
    }

    /// Serializes the request to compact JSON bytes.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(self).map_err(CoreError::Codec)
    }
}

/// Fraud probability saturated into `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
pub struct Probability(f64);

impl Probability {
    /// Clamps a raw value into `[0, 1]`.
    ///
    /// # Errors
    /// Returns [`CoreError::NotANumber`] for NaN input. Infinities saturate.
    pub fn clamped(raw: f64) -> Result<Self, CoreError> {
        if raw.is_nan() {
            return Err(CoreError::NotANumber);
        }
        Ok(Self(raw.clamp(0.0, 1.0)))
    }

    /// Returns the clamped value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Fraud share in tenths of a percent, rounded half away from zero.
    pub fn fraud_tenths(self) -> u16 {
        // Bounded to 0..=1000 by the clamp.
        (self.0 * 1000.0).round() as u16
    }
}

/// Binary verdict derived from a clamped probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Probability below [`FRAUD_THRESHOLD`].
    Legitimate,
    /// Probability at or above [`FRAUD_THRESHOLD`].
    Fraudulent,
}

impl Classification {
    /// Classifies a clamped probability; the threshold itself is fraudulent.
    pub fn from_probability(probability: Probability) -> Self {
        if probability.value() < FRAUD_THRESHOLD {
            Classification::Legitimate
        } else {
            Classification::Fraudulent
        }
    }

    /// User-facing verdict message.
    pub fn message(self) -> &'static str {
        match self {
            Classification::Legitimate => "This job posting appears legitimate.",
            Classification::Fraudulent => "Warning: high fraud probability.",
        }
    }
}

/// Rendered result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    /// Clamped probability in `[0, 1]`.
    pub probability: f64,
    /// Verdict.
    pub classification: Classification,
    /// Verdict message.
    pub display_text: String,
    /// Fraud percentage with one decimal place.
    pub fraud_percent: String,
    /// Legitimate percentage with one decimal place.
    pub legitimate_percent: String,
    /// Combined percentage line shown under the verdict.
    pub probability_text: String,
}

impl PredictionOutcome {
    /// Classifies and formats a clamped probability.
    ///
    /// The two percentages are complementary in tenths, so they always sum to
    /// exactly `100.0`.
    pub fn from_probability(probability: Probability) -> Self {
        let classification = Classification::from_probability(probability);
        let fraud_tenths = probability.fraud_tenths();
        let fraud_percent = format_tenths(fraud_tenths);
        let legitimate_percent = format_tenths(1000 - fraud_tenths);
        let probability_text = format!(
            "Fraud probability: {fraud_percent}% · Legitimate probability: {legitimate_percent}%"
        );

        Self {
            probability: probability.value(),
            classification,
            display_text: classification.message().to_string(),
            fraud_percent,
            legitimate_percent,
            probability_text,
        }
    }
}

fn format_tenths(tenths: u16) -> String {
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// Text-length partition of the training corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBuckets {
    /// Postings shorter than [`SHORT_TEXT_MAX_CHARS`].
    pub short: u64,
    /// Postings between the two thresholds, inclusive.
    pub medium: u64,
    /// Postings longer than [`LONG_TEXT_MIN_CHARS`].
    pub long: u64,
}

/// Aggregate corpus counters shown on the statistics tab.
///
/// Counters are independent; `total` is not checked against `real + fraud`
/// nor against the bucket sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdaStats {
    /// Total postings.
    pub total: u64,
    /// Legitimate postings (label `0`).
    pub real: u64,
    /// Fraudulent postings (label `1`).
    pub fraud: u64,
    /// Length partition.
    pub buckets: LengthBuckets,
}

/// Record used for every counter when the statistics document is unavailable,
/// and as the per-field default during normalization.
pub const FALLBACK_STATS: EdaStats = EdaStats {
    total: 27_880,
    real: 17_014,
    fraud: 10_866,
    buckets: LengthBuckets {
        short: 5_234,
        medium: 12_456,
        long: 10_190,
    },
};

impl Default for EdaStats {
    fn default() -> Self {
        FALLBACK_STATS
    }
}

impl EdaStats {
    /// Headline counters formatted for display (`total`, `real`, `fraud`).
    pub fn headline_texts(&self) -> [String; 3] {
        [
            group_thousands(self.total),
            group_thousands(self.real),
            group_thousands(self.fraud),
        ]
    }
}

/// Formats an integer with en-US thousands separators (`27880` -> `27,880`).
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Error type for core domain validation and codec failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Probability was NaN.
    #[error("probability is not a number")]
    NotANumber,
    /// JSON encoding/decoding error.
    #[error("payload codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}
