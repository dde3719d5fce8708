//! Dashboard configuration
//!
//! Loaded from YAML; every field has a default so an empty document is a
//! valid configuration.

use crate::dataset::DatasetHandle;
use crate::error::{DashboardError, DashboardResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Named dataset presets, in display order
    pub datasets: IndexMap<String, DatasetHandle>,
    /// Rows kept in ranked tables
    pub top_n: usize,
    /// Largest endpoint count for which the per-source network is drawn
    pub max_network_endpoints: usize,
    /// Half-width in days of the window around the central date
    pub window_days: i64,
    /// Nodes listed in the top-in/top-out tables of a network
    pub top_links: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let mut datasets = IndexMap::new();
        datasets.insert(
            "sep".to_string(),
            DatasetHandle::new("data/edgelist_20200901.tsv", "data/processed_sources_emm.tsv"),
        );
        datasets.insert(
            "nov".to_string(),
            DatasetHandle::new("data/edgelist_202010.tsv", "data/processed_sources_emm.tsv"),
        );

        Self {
            datasets,
            top_n: 20,
            max_network_endpoints: 1000,
            window_days: 7,
            top_links: 5,
        }
    }
}

impl DashboardConfig {
    pub fn from_yaml_str(yaml: &str) -> DashboardResult<Self> {
        let config: DashboardConfig =
            serde_yaml::from_str(yaml).map_err(|e| DashboardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> DashboardResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&text)
    }

    /// Dataset preset by label
    pub fn dataset(&self, label: &str) -> DashboardResult<&DatasetHandle> {
        self.datasets
            .get(label)
            .ok_or_else(|| DashboardError::Config(format!("no dataset named '{}'", label)))
    }

    fn validate(&self) -> DashboardResult<()> {
        if self.top_n == 0 {
            return Err(DashboardError::Config("top_n must be positive".to_string()));
        }
        if self.window_days < 0 {
            return Err(DashboardError::Config(
                "window_days must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.top_n, 20);
        assert_eq!(config.max_network_endpoints, 1000);
        assert_eq!(config.datasets.keys().collect::<Vec<_>>(), vec!["sep", "nov"]);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = DashboardConfig::from_yaml_str("top_n: 5\nwindow_days: 3\n").unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.window_days, 3);
        assert_eq!(config.top_links, 5);
    }

    #[test]
    fn test_yaml_datasets() {
        let yaml = "datasets:\n  oct:\n    edgelist: e.tsv\n    sources: s.tsv\n";
        let config = DashboardConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.datasets.len(), 1);
        assert_eq!(config.dataset("oct").unwrap().edgelist.to_str(), Some("e.tsv"));
        assert!(matches!(config.dataset("sep"), Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            DashboardConfig::from_yaml_str("top_n: many"),
            Err(DashboardError::Config(_))
        ));
        assert!(DashboardConfig::from_yaml_str("top_n: 0").is_err());
    }
}
