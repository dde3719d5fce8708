//! Values available for selection in each dimension

use crate::dataset::EdgeTable;
use crate::table::{Dimension, EnrichedTable};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Sorted distinct non-null values per dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub values: BTreeMap<Dimension, Vec<String>>,
}

impl FilterOptions {
    pub fn get(&self, dimension: Dimension) -> &[String] {
        self.values
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Collect selectable values.
///
/// Attribute dimensions read every column of the enriched table (both
/// endpoints when dual). Topics list the individual topic values rather
/// than composite labels, since topic filters match by containment.
pub fn filter_options(table: &EnrichedTable, edges: &EdgeTable) -> FilterOptions {
    let dual = table.dual_endpoint();
    let mut values = BTreeMap::new();

    for dimension in Dimension::ALL {
        let distinct: BTreeSet<&str> = match dimension {
            Dimension::Topics => edges
                .iter()
                .flat_map(|e| [e.topic1.as_deref(), e.topic2.as_deref()])
                .flatten()
                .collect(),
            _ => {
                let columns = dimension.columns(dual);
                table
                    .iter()
                    .flat_map(|row| columns.iter().filter_map(move |&c| row.value(c)))
                    .collect()
            }
        };
        values.insert(
            dimension,
            distinct.into_iter().map(str::to_string).collect(),
        );
    }

    FilterOptions { values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{EdgeEvent, SourceRecord, SourceTable};
    use crate::table::{enrich, Attribute};

    #[test]
    fn test_filter_options() {
        let sources: SourceTable = vec![
            SourceRecord::new(0).with(Attribute::Region, "US"),
            SourceRecord::new(1).with(Attribute::Region, "EU"),
            SourceRecord::new(2),
        ]
        .into_iter()
        .collect();
        let edges = EdgeTable::new(vec![
            EdgeEvent::new(0, 1).with_topics("sports", Some("arts")),
            EdgeEvent::new(2, 0).with_topics("sports", None),
        ]);

        let single = filter_options(&enrich(&edges, &sources, false), &edges);
        assert_eq!(single.get(Dimension::Region), &["US".to_string()]);
        assert_eq!(single.get(Dimension::Topics), &["arts".to_string(), "sports".to_string()]);
        assert!(single.get(Dimension::Country).is_empty());

        let dual = filter_options(&enrich(&edges, &sources, true), &edges);
        assert_eq!(dual.get(Dimension::Region), &["EU".to_string(), "US".to_string()]);
    }
}
