//! Summary reporter: ranked tables and daily series over a filtered table

pub mod ranking;
pub mod timeseries;

pub use ranking::{endpoint_count, top_n, top_sources, RankedRow, RankedTable, COUNT_COLUMN};
pub use timeseries::{
    central_date, daily_series, daily_totals, display_label, DailySeries, DailySeriesSet,
    DateWindow, SeriesPoint, LABEL_WIDTH, UNKNOWN_LABEL,
};

use crate::config::DashboardConfig;
use crate::dataset::SourceTable;
use crate::error::{DashboardError, DashboardResult};
use crate::table::{Attribute, Column, Dimension, EnrichedTable, Endpoint};
use serde::Serialize;
use tracing::debug;

/// Dimensions given a daily series chart, in display order
pub const SERIES_DIMENSIONS: [Dimension; 3] =
    [Dimension::Region, Dimension::Language, Dimension::Country];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    /// Event counts per (category, region, country, lang) combination
    pub ranked: RankedTable,
    pub from_sources: RankedTable,
    pub to_sources: RankedTable,
    /// One set per entry of [`SERIES_DIMENSIONS`]
    pub series: Vec<DailySeriesSet>,
    pub endpoint_count: usize,
    /// Whether the per-source network fits under the endpoint limit
    pub source_network_allowed: bool,
}

impl SummaryReport {
    pub fn series_for(&self, dimension: Dimension) -> Option<&DailySeriesSet> {
        self.series.iter().find(|s| s.dimension == dimension)
    }
}

/// Build the summary of a filtered table
pub fn summarize(
    filtered: &EnrichedTable,
    sources: &SourceTable,
    config: &DashboardConfig,
) -> DashboardResult<SummaryReport> {
    if filtered.is_empty() {
        return Err(DashboardError::EmptyResult);
    }

    let dual = filtered.dual_endpoint();
    let group_cols: Vec<Column> = Attribute::ALL
        .iter()
        .map(|&a| Dimension::from(a).columns(dual)[0])
        .collect();
    let sort_key = Dimension::Country.columns(dual)[0];

    let ranked = top_n(filtered, config.top_n, &group_cols, sort_key)?;
    let endpoints = endpoint_count(filtered);
    debug!(
        "Summarising {} events over {} endpoints",
        filtered.total_count(),
        endpoints
    );

    Ok(SummaryReport {
        ranked,
        from_sources: top_sources(filtered, sources, Endpoint::From, config.top_n),
        to_sources: top_sources(filtered, sources, Endpoint::To, config.top_n),
        series: SERIES_DIMENSIONS
            .iter()
            .map(|&d| daily_series(filtered, d, config.window_days))
            .collect(),
        endpoint_count: endpoints,
        source_network_allowed: endpoints <= config.max_network_endpoints,
    })
}
