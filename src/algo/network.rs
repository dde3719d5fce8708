//! Network assembly: weighted edges to a renderable node/edge list

use super::aggregate::{Grouping, NodeKey, WeightedEdges};
use crate::dataset::SourceTable;
use indexmap::IndexSet;
use newsnet_graph_algorithms::{
    top_k_by_weight, weighted_degrees, Direction, GraphView, NodeId as AlgoNodeId, ValueRange,
    WeightedDegree,
};
use serde::Serialize;

/// Label used for the null-attribute group
pub const MISSING_LABEL: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkNode {
    pub id: String,
    pub label: String,
    /// Size encoding input: total weighted degree
    pub size: f64,
    /// Color encoding input: net degree statistic
    pub color: f64,
    pub in_weight: f64,
    pub out_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkEdge {
    pub source: String,
    pub target: String,
    pub weight: u64,
}

/// Bounds of the size and color statistics; all `None` for a graph without edges
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScaleBounds {
    pub min_size: Option<f64>,
    pub max_size: Option<f64>,
    pub min_color: Option<f64>,
    pub max_color: Option<f64>,
}

impl ScaleBounds {
    fn from_ranges(size: Option<ValueRange>, color: Option<ValueRange>) -> Self {
        ScaleBounds {
            min_size: size.map(|r| r.min),
            max_size: size.map(|r| r.max),
            min_color: color.map(|r| r.min),
            max_color: color.map(|r| r.max),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.min_size.is_none()
    }

    pub fn size_range(&self) -> Option<ValueRange> {
        Some(ValueRange {
            min: self.min_size?,
            max: self.max_size?,
        })
    }

    pub fn color_range(&self) -> Option<ValueRange> {
        Some(ValueRange {
            min: self.min_color?,
            max: self.max_color?,
        })
    }

    /// Linear position of a size value in [0, 1]
    pub fn normalize_size(&self, value: f64) -> Option<f64> {
        self.size_range().map(|r| r.normalize(value))
    }

    /// Linear position of a color value in [0, 1]
    pub fn normalize_color(&self, value: f64) -> Option<f64> {
        self.color_range().map(|r| r.normalize(value))
    }
}

/// Everything the renderer needs to draw one network
#[derive(Debug, Clone, Serialize)]
pub struct NetworkView {
    pub grouping: Grouping,
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
    pub bounds: ScaleBounds,
    /// Number of distinct endpoints, for render admission control
    pub endpoint_count: usize,
    /// Aligned with `nodes`
    #[serde(skip)]
    degrees: Vec<WeightedDegree>,
}

impl NetworkView {
    /// True when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&NetworkNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes with the greatest weighted out-degree
    pub fn top_by_out(&self, k: usize) -> Vec<&NetworkNode> {
        self.top_by(Direction::Outgoing, k)
    }

    /// Nodes with the greatest weighted in-degree
    pub fn top_by_in(&self, k: usize) -> Vec<&NetworkNode> {
        self.top_by(Direction::Incoming, k)
    }

    /// Equal weights are ordered by ascending node id
    fn top_by(&self, direction: Direction, k: usize) -> Vec<&NetworkNode> {
        top_k_by_weight(&self.degrees, direction, k, |a, b| {
            self.nodes[a].id.cmp(&self.nodes[b].id)
        })
        .into_iter()
        .map(|(idx, _)| &self.nodes[idx])
        .collect()
    }
}

/// Build the network for a set of weighted edges.
///
/// Source nodes are labelled with their display name; attribute nodes with
/// the attribute value. Parallel edges are merged by summing weights.
pub fn build(weighted: &WeightedEdges, sources: &SourceTable) -> NetworkView {
    let mut keys: IndexSet<&NodeKey> = IndexSet::new();
    let triples: Vec<(AlgoNodeId, AlgoNodeId, f64)> = weighted
        .iter()
        .map(|e| {
            let u = keys.insert_full(&e.source).0 as AlgoNodeId;
            let v = keys.insert_full(&e.target).0 as AlgoNodeId;
            (u, v, e.weight as f64)
        })
        .collect();

    let view = GraphView::from_weighted_edges(&triples);
    let degrees = weighted_degrees(&view);

    let key_at = |idx: usize| keys[view.index_to_node[idx] as usize];

    let nodes: Vec<NetworkNode> = degrees
        .iter()
        .enumerate()
        .map(|(idx, degree)| {
            let key = key_at(idx);
            NetworkNode {
                id: key.id(),
                label: label_for(key, sources),
                size: degree.total(),
                color: degree.net(),
                in_weight: degree.in_weight,
                out_weight: degree.out_weight,
            }
        })
        .collect();

    let mut edges: Vec<NetworkEdge> = Vec::with_capacity(view.edge_count());
    edges.extend(view.edges().map(|(u, v, w)| NetworkEdge {
        source: nodes[u].id.clone(),
        target: nodes[v].id.clone(),
        weight: w as u64,
    }));

    let bounds = if edges.is_empty() {
        ScaleBounds::default()
    } else {
        ScaleBounds::from_ranges(
            ValueRange::of(nodes.iter().map(|n| n.size)),
            ValueRange::of(nodes.iter().map(|n| n.color)),
        )
    };

    NetworkView {
        grouping: weighted.grouping,
        endpoint_count: nodes.len(),
        nodes,
        edges,
        bounds,
        degrees,
    }
}

fn label_for(key: &NodeKey, sources: &SourceTable) -> String {
    match key {
        NodeKey::Source(idx) => sources
            .get(*idx)
            .map(|r| r.display_name())
            .unwrap_or_else(|| idx.to_string()),
        NodeKey::Value(v) => v.clone(),
        NodeKey::Missing => MISSING_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::aggregate::WeightedEdge;
    use crate::dataset::{SourceIndex, SourceRecord};

    fn value(v: &str) -> NodeKey {
        NodeKey::Value(v.to_string())
    }

    fn edges(list: Vec<(NodeKey, NodeKey, u64)>, grouping: Grouping) -> WeightedEdges {
        WeightedEdges {
            grouping,
            edges: list
                .into_iter()
                .map(|(source, target, weight)| WeightedEdge { source, target, weight })
                .collect(),
        }
    }

    #[test]
    fn test_degenerate_graph() {
        let network = build(&WeightedEdges::default(), &SourceTable::new());

        assert!(network.nodes.is_empty());
        assert!(network.edges.is_empty());
        assert_eq!(network.bounds, ScaleBounds::default());
        assert!(network.bounds.is_degenerate());
        assert_eq!(network.bounds.normalize_size(1.0), None);
    }

    #[test]
    fn test_self_loop_only() {
        let network = build(
            &edges(vec![(value("EU"), value("EU"), 4)], Grouping::Region),
            &SourceTable::new(),
        );

        assert_eq!(network.nodes.len(), 1);
        assert_eq!(network.nodes[0].size, 8.0);
        assert_eq!(network.bounds.min_size, Some(8.0));
        assert_eq!(network.bounds.max_size, Some(8.0));
        assert_eq!(network.bounds.normalize_size(8.0), Some(0.5));
    }

    #[test]
    fn test_bounds_and_labels() {
        let sources: SourceTable = vec![SourceRecord::new(1).with_name("Alpha")].into_iter().collect();
        let network = build(
            &edges(
                vec![
                    (NodeKey::Source(SourceIndex(1)), NodeKey::Source(SourceIndex(2)), 3),
                    (NodeKey::Source(SourceIndex(2)), NodeKey::Source(SourceIndex(3)), 1),
                ],
                Grouping::Source,
            ),
            &sources,
        );

        assert_eq!(network.node("1").unwrap().label, "Alpha");
        assert_eq!(network.node("2").unwrap().label, "2");
        assert_eq!(network.node("2").unwrap().size, 4.0);
        assert_eq!(network.bounds.min_size, Some(1.0));
        assert_eq!(network.bounds.max_size, Some(4.0));
        assert_eq!(network.endpoint_count, 3);
    }

    #[test]
    fn test_missing_group_label() {
        let network = build(
            &edges(vec![(value("EU"), NodeKey::Missing, 2)], Grouping::Region),
            &SourceTable::new(),
        );
        let missing = network.node("missing").unwrap();
        assert_eq!(missing.label, MISSING_LABEL);
    }

    #[test]
    fn test_null_text_value_stays_distinct_from_missing() {
        let network = build(
            &edges(vec![(value("<null>"), NodeKey::Missing, 1)], Grouping::Country),
            &SourceTable::new(),
        );

        assert_eq!(network.nodes.len(), 2);
        assert_ne!(network.nodes[0].id, network.nodes[1].id);
        assert_eq!(network.node("value:<null>").unwrap().label, "<null>");
        assert_eq!(network.node("missing").unwrap().label, MISSING_LABEL);
        assert_eq!(network.edges[0].source, "value:<null>");
        assert_eq!(network.edges[0].target, "missing");
    }

    #[test]
    fn test_top_by_direction() {
        let network = build(
            &edges(
                vec![
                    (value("EU"), value("US"), 5),
                    (value("ASIA"), value("US"), 2),
                    (value("US"), value("EU"), 1),
                ],
                Grouping::Region,
            ),
            &SourceTable::new(),
        );

        let top_out: Vec<&str> = network.top_by_out(2).iter().map(|n| n.label.as_str()).collect();
        assert_eq!(top_out, vec!["EU", "ASIA"]);

        let top_in: Vec<&str> = network.top_by_in(1).iter().map(|n| n.label.as_str()).collect();
        assert_eq!(top_in, vec!["US"]);
    }

    #[test]
    fn test_top_by_ties_ordered_by_id() {
        let network = build(
            &edges(
                vec![(value("US"), value("EU"), 1), (value("ASIA"), value("EU"), 1)],
                Grouping::Region,
            ),
            &SourceTable::new(),
        );

        let top_out: Vec<&str> = network.top_by_out(2).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(top_out, vec!["value:ASIA", "value:US"]);

        // EU sends nothing; it ranks after both senders
        let all: Vec<&str> = network.top_by_out(3).iter().map(|n| n.label.as_str()).collect();
        assert_eq!(all, vec!["ASIA", "US", "EU"]);
    }

    #[test]
    fn test_top_by_source_ties() {
        let network = build(
            &edges(
                vec![
                    (NodeKey::Source(SourceIndex(7)), NodeKey::Source(SourceIndex(1)), 2),
                    (NodeKey::Source(SourceIndex(3)), NodeKey::Source(SourceIndex(1)), 2),
                ],
                Grouping::Source,
            ),
            &SourceTable::new(),
        );

        let top_out: Vec<&str> = network.top_by_out(2).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(top_out, vec!["3", "7"]);
    }
}
