//! Aggregation of filtered events into weighted edges

use crate::dataset::SourceIndex;
use crate::error::{DashboardError, DashboardResult};
use crate::table::{Attribute, Column, EnrichedRow, EnrichedTable, Endpoint};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregation granularity for a network
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// One node per media source
    #[default]
    #[serde(alias = "individual")]
    Source,
    Region,
    Country,
    #[serde(alias = "lang")]
    Language,
}

impl Grouping {
    pub const ALL: [Grouping; 4] = [
        Grouping::Source,
        Grouping::Region,
        Grouping::Country,
        Grouping::Language,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grouping::Source => "source",
            Grouping::Region => "region",
            Grouping::Country => "country",
            Grouping::Language => "language",
        }
    }

    /// Attribute whose endpoint columns form the key; `None` for raw source pairs
    pub fn attribute(&self) -> Option<Attribute> {
        match self {
            Grouping::Source => None,
            Grouping::Region => Some(Attribute::Region),
            Grouping::Country => Some(Attribute::Country),
            Grouping::Language => Some(Attribute::Language),
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" | "individual" | "none" => Ok(Grouping::Source),
            "region" => Ok(Grouping::Region),
            "country" => Ok(Grouping::Country),
            "language" | "lang" => Ok(Grouping::Language),
            other => Err(format!("unknown grouping '{}'", other)),
        }
    }
}

/// A node of an aggregated network
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    Source(SourceIndex),
    Value(String),
    /// Null attribute value, kept as its own group
    Missing,
}

impl NodeKey {
    fn from_cell(cell: Option<&str>) -> Self {
        match cell {
            Some(v) => NodeKey::Value(v.to_string()),
            None => NodeKey::Missing,
        }
    }

    /// Stable identifier used by the renderer.
    ///
    /// Sources use their bare index; attribute values carry a `value:`
    /// prefix so no value can collide with the `missing` group.
    pub fn id(&self) -> String {
        match self {
            NodeKey::Source(idx) => idx.to_string(),
            NodeKey::Value(v) => format!("value:{}", v),
            NodeKey::Missing => "missing".to_string(),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Source(idx) => write!(f, "{}", idx),
            NodeKey::Value(v) => f.write_str(v),
            NodeKey::Missing => f.write_str("<null>"),
        }
    }
}

/// Summed event count between two keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedEdge {
    pub source: NodeKey,
    pub target: NodeKey,
    pub weight: u64,
}

/// Output of the aggregator; carries no ordering guarantee
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightedEdges {
    pub grouping: Grouping,
    pub edges: Vec<WeightedEdge>,
}

impl WeightedEdges {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeightedEdge> {
        self.edges.iter()
    }

    pub fn total_weight(&self) -> u64 {
        self.edges.iter().map(|e| e.weight).sum()
    }

    /// Weight of the edge between two keys, if present
    pub fn weight(&self, source: &NodeKey, target: &NodeKey) -> Option<u64> {
        self.edges
            .iter()
            .find(|e| &e.source == source && &e.target == target)
            .map(|e| e.weight)
    }
}

/// Group events by the grouping key and sum their counts.
///
/// Attribute groupings need a dual-endpoint table, since the key is the
/// `(from_<attr>, to_<attr>)` pair.
pub fn aggregate(table: &EnrichedTable, grouping: Grouping) -> DashboardResult<WeightedEdges> {
    let key_of: Box<dyn Fn(&EnrichedRow) -> (NodeKey, NodeKey)> = match grouping.attribute() {
        None => Box::new(|row: &EnrichedRow| {
            (NodeKey::Source(row.from_index), NodeKey::Source(row.to_index))
        }),
        Some(attr) => {
            if !table.dual_endpoint() {
                return Err(DashboardError::Schema(format!(
                    "grouping by {} needs from_{} and to_{} columns",
                    grouping,
                    attr.column_name(),
                    attr.column_name()
                )));
            }
            Box::new(move |row: &EnrichedRow| {
                (
                    NodeKey::from_cell(row.value(Column::Endpoint(Endpoint::From, attr))),
                    NodeKey::from_cell(row.value(Column::Endpoint(Endpoint::To, attr))),
                )
            })
        }
    };

    let mut groups: IndexMap<(NodeKey, NodeKey), u64, FxBuildHasher> = IndexMap::default();
    for row in table.iter() {
        *groups.entry(key_of(row)).or_insert(0) += row.count;
    }

    let edges = groups
        .into_iter()
        .map(|((source, target), weight)| WeightedEdge {
            source,
            target,
            weight,
        })
        .collect();

    Ok(WeightedEdges { grouping, edges })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{EdgeEvent, EdgeTable, SourceRecord, SourceTable};
    use crate::table::enrich;

    fn sources() -> SourceTable {
        vec![
            SourceRecord::new(0).with(Attribute::Region, "EU"),
            SourceRecord::new(1).with(Attribute::Region, "EU"),
            SourceRecord::new(2).with(Attribute::Region, "US"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_grouping_parse() {
        assert_eq!("individual".parse::<Grouping>().unwrap(), Grouping::Source);
        assert_eq!("lang".parse::<Grouping>().unwrap(), Grouping::Language);
        assert!("planet".parse::<Grouping>().is_err());
    }

    #[test]
    fn test_node_ids_are_unambiguous() {
        assert_eq!(NodeKey::Source(SourceIndex(12)).id(), "12");
        assert_eq!(NodeKey::Value("EU".into()).id(), "value:EU");
        assert_eq!(NodeKey::Missing.id(), "missing");
        assert_ne!(NodeKey::Value("missing".into()).id(), NodeKey::Missing.id());
        assert_ne!(NodeKey::Value("<null>".into()).id(), NodeKey::Missing.id());
    }

    #[test]
    fn test_aggregate_by_source_pair() {
        let edges = EdgeTable::new(vec![
            EdgeEvent::new(0, 1),
            EdgeEvent::new(0, 1),
            EdgeEvent::new(1, 0),
        ]);
        let table = enrich(&edges, &sources(), false);
        let weighted = aggregate(&table, Grouping::Source).unwrap();

        assert_eq!(weighted.len(), 2);
        assert_eq!(
            weighted.weight(&NodeKey::Source(SourceIndex(0)), &NodeKey::Source(SourceIndex(1))),
            Some(2)
        );
        assert_eq!(weighted.total_weight(), 3);
    }

    #[test]
    fn test_aggregate_keeps_null_group() {
        let edges = EdgeTable::new(vec![EdgeEvent::new(0, 9), EdgeEvent::new(0, 9)]);
        let table = enrich(&edges, &sources(), true);
        let weighted = aggregate(&table, Grouping::Region).unwrap();

        assert_eq!(
            weighted.weight(&NodeKey::Value("EU".into()), &NodeKey::Missing),
            Some(2)
        );
    }

    #[test]
    fn test_attribute_grouping_needs_dual_table() {
        let table = enrich(&EdgeTable::new(vec![EdgeEvent::new(0, 1)]), &sources(), false);
        let err = aggregate(&table, Grouping::Country).unwrap_err();
        assert!(matches!(err, DashboardError::Schema(_)));
    }
}
