#![warn(missing_docs)]
//! # job-sentry-stats
//!
//! ## Purpose
//! Normalizes a loosely-shaped exploratory statistics document into
//! [`EdaStats`].
//!
//! ## Responsibilities
//! - Decode the raw document bytes.
//! - Apply [`STATS_RULES`] in order, each rule independently overriding the
//!   counters it owns.
//! - Keep every counter no rule touches at its [`FALLBACK_STATS`] default.
//!
//! ## Data flow
//! Raw bytes -> [`decode_stats_document`] -> [`normalize_stats`] ->
//! [`NormalizedStats`] -> statistics pipeline.
//!
//! ## Error model
//! Only undecodable JSON is an error ([`StatsError`]). Any decodable document,
//! including `null`, arrays, and scalars, normalizes silently; unmatched
//! counters keep their defaults.
//!
//! ## Count conversion
//! Counters are unsigned integers. Any finite JSON number overrides its
//! default: it is rounded half away from zero and saturated into `u64`, so
//! `-5` becomes `0` and `12.5` becomes `13`.

use job_sentry_core::{EdaStats, FALLBACK_STATS};
use serde_json::Value;
use thiserror::Error;

/// One of the six counters carried by [`EdaStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    /// Total postings.
    Total,
    /// Legitimate postings.
    Real,
    /// Fraudulent postings.
    Fraud,
    /// Short-text bucket.
    Short,
    /// Medium-text bucket.
    Medium,
    /// Long-text bucket.
    Long,
}

impl Counter {
    fn slot(self, stats: &mut EdaStats) -> &mut u64 {
        match self {
            Counter::Total => &mut stats.total,
            Counter::Real => &mut stats.real,
            Counter::Fraud => &mut stats.fraud,
            Counter::Short => &mut stats.buckets.short,
            Counter::Medium => &mut stats.buckets.medium,
            Counter::Long => &mut stats.buckets.long,
        }
    }
}

/// One extraction rule over the untyped document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsRule {
    /// Copies `document[section][key]` into `target` when it is a JSON number.
    Field {
        /// Top-level section name.
        section: &'static str,
        /// Key inside the section.
        key: &'static str,
        /// Counter overridden on match.
        target: Counter,
    },
    /// Reads `fraudulent["0"]` and `fraudulent["1"]` as real/fraud and sets
    /// `total = real + fraud`. Engages only while `summary` is absent or
    /// falsy, and only when both labels coerce to numbers: numeric strings,
    /// blank strings and `null` (zero), and booleans (zero or one).
    LabelledTrio,
}

/// Ordered rule list applied by [`normalize_stats`].
pub const STATS_RULES: [StatsRule; 7] = [
    StatsRule::Field {
        section: "summary",
        key: "total_count",
        target: Counter::Total,
    },
    StatsRule::Field {
        section: "summary",
        key: "real_count",
        target: Counter::Real,
    },
    StatsRule::Field {
        section: "summary",
        key: "fraud_count",
        target: Counter::Fraud,
    },
    StatsRule::Field {
        section: "length_stats",
        key: "short",
        target: Counter::Short,
    },
    StatsRule::Field {
        section: "length_stats",
        key: "medium",
        target: Counter::Medium,
    },
    StatsRule::Field {
        section: "length_stats",
        key: "long",
        target: Counter::Long,
    },
    StatsRule::LabelledTrio,
];

impl StatsRule {
    /// Short rule name used in normalization traces.
    pub fn name(&self) -> &'static str {
        match self {
            StatsRule::Field { target, .. } => match target {
                Counter::Total => "summary.total_count",
                Counter::Real => "summary.real_count",
                Counter::Fraud => "summary.fraud_count",
                Counter::Short => "length_stats.short",
                Counter::Medium => "length_stats.medium",
                Counter::Long => "length_stats.long",
            },
            StatsRule::LabelledTrio => "fraudulent.labels",
        }
    }

    /// Applies this rule, returning `true` when it overrode anything.
    pub fn apply(&self, document: &Value, stats: &mut EdaStats) -> bool {
        match self {
            StatsRule::Field {
                section,
                key,
                target,
            } => {
                let Some(count) = document
                    .get(section)
                    .and_then(|section| section.get(key))
                    .and_then(number_count)
                else {
                    return false;
                };
                *target.slot(stats) = count;
                true
            }
            StatsRule::LabelledTrio => {
                if document.get("summary").is_some_and(is_truthy) {
                    return false;
                }
                let Some(labels) = document.get("fraudulent") else {
                    return false;
                };
                let (Some(real), Some(fraud)) =
                    (label_count(labels, 0), label_count(labels, 1))
                else {
                    return false;
                };
                stats.real = real;
                stats.fraud = fraud;
                stats.total = real.saturating_add(fraud);
                true
            }
        }
    }
}

/// Normalization result plus the names of the rules that fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedStats {
    /// Counters after all rules ran.
    pub stats: EdaStats,
    /// Rules that overrode at least one counter, in application order.
    pub applied_rules: Vec<&'static str>,
}

/// Applies [`STATS_RULES`] to a parsed document starting from
/// [`FALLBACK_STATS`].
pub fn normalize_stats(document: &Value) -> NormalizedStats {
    let mut stats = FALLBACK_STATS;
    let applied_rules = STATS_RULES
        .iter()
        .filter(|rule| rule.apply(document, &mut stats))
        .map(StatsRule::name)
        .collect();

    NormalizedStats {
        stats,
        applied_rules,
    }
}

/// Decodes and normalizes a raw statistics document.
///
/// # Errors
/// Returns [`StatsError::Decode`] when the bytes are not valid JSON.
pub fn decode_stats_document(raw: &[u8]) -> Result<NormalizedStats, StatsError> {
    let document: Value = serde_json::from_slice(raw).map_err(StatsError::Decode)?;
    Ok(normalize_stats(&document))
}

/// Accepts any finite JSON number.
fn number_count(value: &Value) -> Option<u64> {
    if let Some(count) = value.as_u64() {
        return Some(count);
    }
    value.as_f64().and_then(saturating_count)
}

/// Numeric coercion for label values.
///
/// Missing labels, non-numeric strings, arrays, and objects are rejected.
fn coerced_count(value: &Value) -> Option<u64> {
    match value {
        Value::Null => Some(0),
        Value::Bool(flag) => Some(u64::from(*flag)),
        Value::Number(_) => number_count(value),
        Value::String(text) => parse_numeric_text(text.trim()).and_then(saturating_count),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    if text.is_empty() {
        return Some(0.0);
    }
    let radix = match text.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return text.parse::<f64>().ok(),
    };
    u64::from_str_radix(&text[2..], radix)
        .ok()
        .map(|value| value as f64)
}

fn saturating_count(value: f64) -> Option<u64> {
    // `as` saturates at both ends once the value is finite.
    value.is_finite().then(|| value.round().max(0.0) as u64)
}

fn label_count(labels: &Value, label: usize) -> Option<u64> {
    match labels {
        Value::Object(map) => map.get(&label.to_string()).and_then(coerced_count),
        Value::Array(items) => items.get(label).and_then(coerced_count),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Statistics document errors.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Document is not valid JSON.
    #[error("statistics document decode failure: {0}")]
    Decode(#[source] serde_json::Error),
}
