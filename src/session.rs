//! Session: a loaded dataset plus configuration, answering view requests
//!
//! Every request recomputes from the immutable dataset, so a session can be
//! shared freely between callers.

use crate::algo::{aggregate, build, Grouping, NetworkView};
use crate::config::DashboardConfig;
use crate::dataset::{Dataset, DatasetHandle, SourceTable};
use crate::error::{DashboardError, DashboardResult};
use crate::filter::{self, filter_options, FilterOptions, FilterSelection};
use crate::summary::{endpoint_count, summarize, SummaryReport};
use crate::table::{enrich, EnrichedTable};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
    config: DashboardConfig,
}

impl Session {
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        Session { dataset, config }
    }

    /// Load both tables named by `handle`
    pub fn open(handle: &DatasetHandle, config: DashboardConfig) -> DashboardResult<Self> {
        info!(
            "Opening dataset {:?} with sources {:?}",
            handle.edgelist, handle.sources
        );
        Ok(Session::new(handle.load()?, config))
    }

    /// Load one of the configured dataset presets
    pub fn open_preset(label: &str, config: DashboardConfig) -> DashboardResult<Self> {
        let handle = config.dataset(label)?.clone();
        Session::open(&handle, config)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn sources(&self) -> &SourceTable {
        &self.dataset.sources
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn enriched(&self, dual_endpoint: bool) -> EnrichedTable {
        enrich(&self.dataset.edges, &self.dataset.sources, dual_endpoint)
    }

    pub fn filtered(&self, selection: &FilterSelection, dual_endpoint: bool) -> EnrichedTable {
        filter::apply(&self.enriched(dual_endpoint), selection)
    }

    /// Selectable values per dimension, over both endpoints
    pub fn filter_options(&self) -> FilterOptions {
        filter_options(&self.enriched(true), &self.dataset.edges)
    }

    /// Ranked tables and daily series for the events a selection keeps
    pub fn summary(&self, selection: &FilterSelection) -> DashboardResult<SummaryReport> {
        let filtered = self.filtered(selection, false);
        summarize(&filtered, &self.dataset.sources, &self.config)
    }

    /// Network of the events a selection keeps, at the given granularity.
    ///
    /// The per-source network is refused once the selection touches more
    /// sources than `max_network_endpoints`.
    pub fn network(
        &self,
        selection: &FilterSelection,
        grouping: Grouping,
    ) -> DashboardResult<NetworkView> {
        let filtered = self.filtered(selection, true);
        if filtered.is_empty() {
            return Err(DashboardError::EmptyResult);
        }

        if grouping == Grouping::Source {
            let endpoints = endpoint_count(&filtered);
            let limit = self.config.max_network_endpoints;
            if endpoints > limit {
                info!(
                    "Refusing source network: {} endpoints above limit {}",
                    endpoints, limit
                );
                return Err(DashboardError::NetworkTooLarge { endpoints, limit });
            }
        }

        let weighted = aggregate(&filtered, grouping)?;
        let network = build(&weighted, &self.dataset.sources);
        if network.is_empty() {
            return Err(DashboardError::DegenerateGraph);
        }

        debug!(
            "Built {} network: {} nodes, {} edges",
            grouping,
            network.nodes.len(),
            network.edges.len()
        );
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{EdgeEvent, EdgeTable, SourceRecord};
    use crate::table::{Attribute, Dimension};

    fn session(config: DashboardConfig) -> Session {
        let sources: SourceTable = vec![
            SourceRecord::new(0).with(Attribute::Region, "EU"),
            SourceRecord::new(1).with(Attribute::Region, "EU"),
            SourceRecord::new(2).with(Attribute::Region, "US"),
        ]
        .into_iter()
        .collect();
        let edges = EdgeTable::new(vec![
            EdgeEvent::new(0, 1),
            EdgeEvent::new(1, 0),
            EdgeEvent::new(0, 2),
            EdgeEvent::new(1, 2),
        ]);
        Session::new(Dataset::new(edges, sources), config)
    }

    #[test]
    fn test_network_by_region() {
        let network = session(DashboardConfig::default())
            .network(&FilterSelection::new(), Grouping::Region)
            .unwrap();

        assert_eq!(network.nodes.len(), 2);
        assert_eq!(network.node("value:EU").unwrap().out_weight, 4.0);
        assert_eq!(network.node("value:US").unwrap().in_weight, 2.0);
    }

    #[test]
    fn test_network_sentinels() {
        let s = session(DashboardConfig::default());
        let nothing = FilterSelection::new().include(Dimension::Region, ["ASIA"]);
        assert_eq!(
            s.network(&nothing, Grouping::Region).unwrap_err(),
            DashboardError::EmptyResult
        );

        let tight = session(DashboardConfig {
            max_network_endpoints: 2,
            ..DashboardConfig::default()
        });
        assert_eq!(
            tight.network(&FilterSelection::new(), Grouping::Source).unwrap_err(),
            DashboardError::NetworkTooLarge {
                endpoints: 3,
                limit: 2
            }
        );
        // attribute groupings are not limited
        assert!(tight.network(&FilterSelection::new(), Grouping::Region).is_ok());
    }

    #[test]
    fn test_summary_and_options() {
        let s = session(DashboardConfig::default());
        let report = s.summary(&FilterSelection::new()).unwrap();
        assert_eq!(report.ranked.total_count(), 4);

        let options = s.filter_options();
        assert_eq!(options.get(Dimension::Region), ["EU".to_string(), "US".to_string()]);
    }
}
