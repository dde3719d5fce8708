//! Error types shared by every pipeline stage

use crate::dataset::TableRole;
use thiserror::Error;

/// Errors that can occur while loading data or computing views
///
/// None of these are fatal to the caller: load and schema errors describe
/// bad input, the rest are sentinels for data-shape conditions that the
/// caller renders as guidance.
#[derive(Error, Debug, PartialEq)]
pub enum DashboardError {
    #[error("Failed to load {role} table from '{location}': {reason}")]
    DataLoad {
        role: TableRole,
        location: String,
        reason: String,
    },

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Filter selection matched no events")]
    EmptyResult,

    #[error("Aggregated network has no edges")]
    DegenerateGraph,

    #[error("Network would have {endpoints} endpoints, above the limit of {limit}")]
    NetworkTooLarge { endpoints: usize, limit: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

impl DashboardError {
    pub(crate) fn data_load(role: TableRole, location: impl Into<String>, reason: impl ToString) -> Self {
        DashboardError::DataLoad {
            role,
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// True for data-shape conditions that are not input faults
    pub fn is_sentinel(&self) -> bool {
        matches!(
            self,
            DashboardError::EmptyResult
                | DashboardError::DegenerateGraph
                | DashboardError::NetworkTooLarge { .. }
        )
    }

    /// Guidance text shown to the user in place of a result
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::DataLoad { role, .. } => format!(
                "The {} file could not be read. Please check that both files match the expected format.",
                role
            ),
            DashboardError::Schema(detail) => format!(
                "The data is missing required columns ({}). Please upload files with the expected columns.",
                detail
            ),
            DashboardError::EmptyResult => "Filter selection returned an empty query! \
                Please review your selection, or reset the filters to revert to defaults."
                .to_string(),
            DashboardError::DegenerateGraph => "The network would be empty for this selection. \
                Please adjust the filters or choose a different grouping."
                .to_string(),
            DashboardError::NetworkTooLarge { .. } => "The source network has been disabled because \
                the graph would be too large to plot stably. Please consider filtering the dataset."
                .to_string(),
            DashboardError::Config(detail) => format!("The configuration is invalid: {}", detail),
        }
    }
}
