//! Statistics pipeline: load the EDA document once, or fall back.

use std::sync::{Arc, Mutex};

use job_sentry_core::{EdaStats, FALLBACK_STATS};
use job_sentry_stats::decode_stats_document;
use job_sentry_transport::StatsSource;
use job_sentry_ui::{ChartSurface, PanelState, Renderer, STATS_DIAGNOSTIC};
use tracing::{info, warn};

use crate::{AppError, lock_panel};

/// Where the final counters came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsOrigin {
    /// Fetched and normalized; absent fields silently defaulted.
    Document,
    /// Fetch or decode failed; every counter is the fixed fallback.
    Fallback,
}

/// Result of the statistics pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsReport {
    /// Final counters.
    pub stats: EdaStats,
    /// Origin of the counters.
    pub origin: StatsOrigin,
    /// Normalization rules that fired (empty on fallback).
    pub applied_rules: Vec<&'static str>,
}

impl StatsReport {
    /// Banner text to show, set only on the fallback path.
    pub fn diagnostic(&self) -> Option<&'static str> {
        match self.origin {
            StatsOrigin::Document => None,
            StatsOrigin::Fallback => Some(STATS_DIAGNOSTIC),
        }
    }
}

/// Loads and normalizes the statistics document.
#[derive(Clone)]
pub struct StatisticsPipeline {
    source: Arc<dyn StatsSource>,
}

impl StatisticsPipeline {
    /// Creates a pipeline reading from `source`.
    pub fn new(source: Arc<dyn StatsSource>) -> Self {
        Self { source }
    }

    /// Fetches and normalizes the document; never fails.
    pub fn load(&self) -> StatsReport {
        match self.fetch_normalized() {
            Ok((stats, applied_rules)) => {
                info!(
                    location = %self.source.location(),
                    applied = applied_rules.len(),
                    "statistics document loaded"
                );
                StatsReport {
                    stats,
                    origin: StatsOrigin::Document,
                    applied_rules,
                }
            }
            Err(error) => {
                warn!(
                    location = %self.source.location(),
                    %error,
                    "statistics load failed, using fallback"
                );
                StatsReport {
                    stats: FALLBACK_STATS,
                    origin: StatsOrigin::Fallback,
                    applied_rules: Vec::new(),
                }
            }
        }
    }

    /// Loads statistics, updates the panel headline/banner, and draws both
    /// charts.
    pub fn load_and_render<S: ChartSurface>(
        &self,
        panel: &Mutex<PanelState>,
        renderer: &mut Renderer<S>,
    ) -> StatsReport {
        let report = self.load();
        lock_panel(panel).apply_stats(&report.stats, report.diagnostic());
        renderer.render_stats(&report.stats);
        report
    }

    fn fetch_normalized(&self) -> Result<(EdaStats, Vec<&'static str>), AppError> {
        let raw = self.source.fetch()?;
        let normalized = decode_stats_document(&raw)?;
        Ok((normalized.stats, normalized.applied_rules))
    }
}
