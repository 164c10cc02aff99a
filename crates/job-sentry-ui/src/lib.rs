#![warn(missing_docs)]
//! # job-sentry-ui
//!
//! ## Purpose
//! Defines the UI-facing state model and chart rendering seam for the
//! `job-sentry` panel.
//!
//! ## Responsibilities
//! - Track the submit control, the transient status note, the latest
//!   prediction, and the statistics headline/diagnostic banner.
//! - Own the two chart slots and replace their instances idempotently.
//! - Provide a plain-text chart surface for console front ends.
//!
//! ## Data flow
//! Pipelines mutate [`PanelState`] and call [`Renderer::replace`]; the
//! [`ChartSurface`] implementation does the actual drawing.
//!
//! ## Ownership and lifetimes
//! `PanelState` owns all strings so it can be shared behind a lock by
//! concurrently running pipelines.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors. Drawing failures
//! are the surface's concern and never reach the pipelines.

use std::collections::BTreeMap;

use job_sentry_core::{
    Classification, EdaStats, LONG_TEXT_MIN_CHARS, LengthBuckets, PredictionOutcome,
    SHORT_TEXT_MAX_CHARS,
};

/// Delay after which a settled status note disappears.
pub const STATUS_NOTE_CLEAR_MS: u64 = 2_000;

/// Banner text shown when the statistics document is unavailable.
pub const STATS_DIAGNOSTIC: &str = "Failed to load eda_data.json. Using fallback stats.";

/// Transient status line under the submit button.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusNote {
    text: String,
    clear_at_ms: Option<u64>,
}

impl StatusNote {
    /// Shows a note that stays until replaced.
    pub fn show(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.clear_at_ms = None;
    }

    /// Shows a note that clears [`STATUS_NOTE_CLEAR_MS`] after `now_ms`.
    ///
    /// A later call replaces both the text and the pending deadline.
    pub fn show_transient(&mut self, text: impl Into<String>, now_ms: u64) {
        self.text = text.into();
        self.clear_at_ms = Some(now_ms.saturating_add(STATUS_NOTE_CLEAR_MS));
    }

    /// Clears the note once its deadline has passed.
    pub fn on_tick(&mut self, now_ms: u64) {
        if self.clear_at_ms.is_some_and(|deadline| now_ms >= deadline) {
            self.text.clear();
            self.clear_at_ms = None;
        }
    }

    /// Text visible at `now_ms`, if any.
    pub fn visible(&self, now_ms: u64) -> Option<&str> {
        let expired = self.clear_at_ms.is_some_and(|deadline| now_ms >= deadline);
        (!expired && !self.text.is_empty()).then_some(self.text.as_str())
    }
}

/// Visual tone of the prediction box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTone {
    /// Nothing rendered yet.
    Hidden,
    /// Legitimate verdict.
    Success,
    /// Fraudulent verdict.
    Danger,
}

/// Statistics tab state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdaView {
    /// Formatted `total`, `real`, `fraud` counters.
    pub headline: [String; 3],
    /// Diagnostic banner, set only on the fallback path.
    pub diagnostic: Option<String>,
}

/// Aggregate panel state.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    /// App version string.
    pub version: String,
    /// Whether the submit button is enabled.
    pub submit_enabled: bool,
    /// Transient status line.
    pub status: StatusNote,
    /// Latest rendered prediction.
    pub prediction: Option<PredictionOutcome>,
    /// Number of predictions rendered so far.
    pub prediction_renders: u64,
    /// Statistics tab, once loaded.
    pub eda: Option<EdaView>,
}

impl PanelState {
    /// Creates the initial panel state.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            submit_enabled: true,
            status: StatusNote::default(),
            prediction: None,
            prediction_renders: 0,
            eda: None,
        }
    }

    /// Disables submit and shows a pending note.
    ///
    /// Overlapping attempts are not tracked; whichever attempt settles last
    /// decides the final button state.
    pub fn begin_submission(&mut self, pending_note: &str) {
        self.submit_enabled = false;
        self.status.show(pending_note);
    }

    /// Renders an outcome, re-enables submit, and schedules the note clear.
    pub fn finish_submission(&mut self, outcome: PredictionOutcome, note: &str, now_ms: u64) {
        self.prediction = Some(outcome);
        self.prediction_renders += 1;
        self.submit_enabled = true;
        self.status.show_transient(note, now_ms);
    }

    /// Tone of the prediction box.
    pub fn result_tone(&self) -> ResultTone {
        match &self.prediction {
            None => ResultTone::Hidden,
            Some(outcome) => match outcome.classification {
                Classification::Legitimate => ResultTone::Success,
                Classification::Fraudulent => ResultTone::Danger,
            },
        }
    }

    /// Stores headline counters and the optional diagnostic banner.
    pub fn apply_stats(&mut self, stats: &EdaStats, diagnostic: Option<&str>) {
        self.eda = Some(EdaView {
            headline: stats.headline_texts(),
            diagnostic: diagnostic.map(str::to_string),
        });
    }
}

/// One of the two chart targets on the statistics tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChartSlot {
    /// Real vs. fraud bar chart.
    FraudSplit,
    /// Short/medium/long bar chart.
    LengthBuckets,
}

impl ChartSlot {
    /// Target element identifier.
    pub fn target_id(self) -> &'static str {
        match self {
            ChartSlot::FraudSplit => "fraud-chart",
            ChartSlot::LengthBuckets => "length-chart",
        }
    }
}

/// Bar chart description handed to a [`ChartSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    /// Category labels.
    pub labels: Vec<String>,
    /// One integer count per label.
    pub values: Vec<u64>,
    /// One CSS color per label.
    pub colors: Vec<&'static str>,
}

impl ChartSpec {
    /// Two-category real vs. fraud chart.
    pub fn fraud_split(real: u64, fraud: u64) -> Self {
        Self {
            labels: vec!["Legitimate (0)".to_string(), "Fraudulent (1)".to_string()],
            values: vec![real, fraud],
            colors: vec!["#22c55e", "#f97373"],
        }
    }

    /// Three-category text-length chart.
    pub fn length_buckets(buckets: &LengthBuckets) -> Self {
        Self {
            labels: vec![
                format!("Short (<{SHORT_TEXT_MAX_CHARS})"),
                format!("Medium ({SHORT_TEXT_MAX_CHARS}–{LONG_TEXT_MIN_CHARS})"),
                format!("Long (>{LONG_TEXT_MIN_CHARS})"),
            ],
            values: vec![buckets.short, buckets.medium, buckets.long],
            colors: vec!["#38bdf8", "#0ea5e9", "#0369a1"],
        }
    }
}

/// Opaque handle to one drawn chart instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChartInstanceId(pub u64);

/// Drawing backend, e.g. a canvas charting library or a terminal.
pub trait ChartSurface {
    /// Draws a new chart instance into the slot's target.
    fn create(&mut self, slot: ChartSlot, spec: &ChartSpec) -> ChartInstanceId;

    /// Destroys a previously created instance.
    fn dispose(&mut self, instance: ChartInstanceId);
}

/// Owns the two chart slots and keeps at most one live instance per slot.
#[derive(Debug)]
pub struct Renderer<S> {
    surface: S,
    fraud_split: Option<ChartInstanceId>,
    length_buckets: Option<ChartInstanceId>,
}

impl<S: ChartSurface> Renderer<S> {
    /// Creates a renderer with empty slots.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            fraud_split: None,
            length_buckets: None,
        }
    }

    /// Disposes the slot's current instance, then draws `spec` in its place.
    pub fn replace(&mut self, slot: ChartSlot, spec: &ChartSpec) -> ChartInstanceId {
        if let Some(previous) = self.slot_mut(slot).take() {
            self.surface.dispose(previous);
        }
        let instance = self.surface.create(slot, spec);
        *self.slot_mut(slot) = Some(instance);
        instance
    }

    /// Draws both statistics charts.
    pub fn render_stats(&mut self, stats: &EdaStats) {
        self.replace(
            ChartSlot::FraudSplit,
            &ChartSpec::fraud_split(stats.real, stats.fraud),
        );
        self.replace(
            ChartSlot::LengthBuckets,
            &ChartSpec::length_buckets(&stats.buckets),
        );
    }

    /// Live instance for a slot.
    pub fn active(&self, slot: ChartSlot) -> Option<ChartInstanceId> {
        match slot {
            ChartSlot::FraudSplit => self.fraud_split,
            ChartSlot::LengthBuckets => self.length_buckets,
        }
    }

    /// Borrows the drawing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn slot_mut(&mut self, slot: ChartSlot) -> &mut Option<ChartInstanceId> {
        match slot {
            ChartSlot::FraudSplit => &mut self.fraud_split,
            ChartSlot::LengthBuckets => &mut self.length_buckets,
        }
    }
}

/// Width of the longest bar drawn by [`TextChartSurface`].
const TEXT_BAR_WIDTH: u128 = 40;

/// Terminal chart surface drawing horizontal bars with `#`.
#[derive(Debug, Default)]
pub struct TextChartSurface {
    next_id: u64,
    live: BTreeMap<ChartInstanceId, (ChartSlot, String)>,
}

impl TextChartSurface {
    /// Creates an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Live charts in creation order.
    pub fn live_charts(&self) -> impl Iterator<Item = (ChartSlot, &str)> {
        self.live
            .values()
            .map(|(slot, drawing)| (*slot, drawing.as_str()))
    }
}

impl ChartSurface for TextChartSurface {
    fn create(&mut self, slot: ChartSlot, spec: &ChartSpec) -> ChartInstanceId {
        self.next_id += 1;
        let id = ChartInstanceId(self.next_id);
        self.live.insert(id, (slot, draw_bars(slot, spec)));
        id
    }

    fn dispose(&mut self, instance: ChartInstanceId) {
        self.live.remove(&instance);
    }
}

fn draw_bars(slot: ChartSlot, spec: &ChartSpec) -> String {
    let max = spec.values.iter().copied().max().unwrap_or(0).max(1);
    let label_width = spec.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut out = format!("[{}]\n", slot.target_id());
    for (label, value) in spec.labels.iter().zip(&spec.values) {
        let bar = "#".repeat((u128::from(*value) * TEXT_BAR_WIDTH / u128::from(max)) as usize);
        let padding = " ".repeat(label_width - label.chars().count());
        out.push_str(&format!("{label}{padding} | {bar} {value}\n"));
    }
    out
}
