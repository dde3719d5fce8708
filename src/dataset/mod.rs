//! Dataset model and loading
//!
//! A dataset is two immutable tables: edge events (one row per observed
//! sharing interaction) and source metadata (one row per media source).

pub mod loader;
pub mod types;

pub use loader::{
    detect_role, load_edges, load_sources, parse_date, parse_edges, parse_sources, read_headers,
    DatasetHandle, TableRole, EDGE_COLUMNS, SOURCE_COLUMNS,
};
pub use types::{Dataset, EdgeEvent, EdgeTable, SourceIndex, SourceRecord, SourceTable};
