//! Newsnet
//!
//! Analysis core of a news-sharing dashboard: load edge events between
//! media sources together with source metadata, filter them by categorical
//! dimensions, and derive ranked tables, daily series and weighted sharing
//! networks.
//!
//! # Pipeline
//!
//! - `dataset`: delimited-text loading of the edge and source tables
//! - `table`: metadata join and the column model
//! - `filter`: include/exclude selection over categorical dimensions
//! - `algo`: aggregation into weighted edges and network assembly
//! - `summary`: ranked tables and daily series
//! - `session`: a loaded dataset answering view requests
//!
//! ## Example Usage
//!
//! ```rust
//! use newsnet::{
//!     Attribute, DashboardConfig, Dataset, EdgeEvent, EdgeTable, FilterSelection, Grouping,
//!     Session, SourceRecord, SourceTable,
//! };
//!
//! let sources: SourceTable = vec![
//!     SourceRecord::new(0).with(Attribute::Region, "EU"),
//!     SourceRecord::new(1).with(Attribute::Region, "US"),
//! ]
//! .into_iter()
//! .collect();
//! let edges = EdgeTable::new(vec![EdgeEvent::new(0, 1), EdgeEvent::new(0, 1)]);
//!
//! let session = Session::new(Dataset::new(edges, sources), DashboardConfig::default());
//! let network = session.network(&FilterSelection::new(), Grouping::Region).unwrap();
//! assert_eq!(network.edges[0].weight, 2);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod session;
pub mod summary;
pub mod table;

// Re-export main types for convenience
pub use algo::{
    aggregate, build, Grouping, NetworkEdge, NetworkNode, NetworkView, NodeKey, ScaleBounds,
    WeightedEdge, WeightedEdges,
};
pub use config::DashboardConfig;
pub use dataset::{
    detect_role, Dataset, DatasetHandle, EdgeEvent, EdgeTable, SourceIndex, SourceRecord,
    SourceTable, TableRole,
};
pub use error::{DashboardError, DashboardResult};
pub use filter::{filter_options, FilterOptions, FilterSelection};
pub use session::Session;
pub use summary::{
    daily_series, summarize, top_n, top_sources, DailySeriesSet, RankedTable, SummaryReport,
};
pub use table::{enrich, Attribute, Column, Dimension, EnrichedRow, EnrichedTable, Endpoint};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
