//! Ranked top-N tables

use crate::dataset::{SourceIndex, SourceTable};
use crate::error::{DashboardError, DashboardResult};
use crate::table::{Attribute, Column, EnrichedTable, Endpoint};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use serde::Serialize;
use std::cmp::Ordering;

/// Name of the summed count column
pub const COUNT_COLUMN: &str = "count";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedRow {
    /// One value per non-count column, in column order
    pub keys: Vec<Option<String>>,
    pub count: u64,
}

/// Column names plus rows ranked by descending count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankedTable {
    pub columns: Vec<String>,
    pub rows: Vec<RankedRow>,
}

impl RankedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_count(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// Cell of `row` under `column`; the count column is not addressable here
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let pos = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.keys.get(pos)?.as_deref()
    }
}

/// Group by `group_cols`, sum counts, rank and keep the first `n`.
///
/// Ranking is by descending count, then ascending `sort_key` value (nulls
/// last), then the remaining key values.
pub fn top_n(
    table: &EnrichedTable,
    n: usize,
    group_cols: &[Column],
    sort_key: Column,
) -> DashboardResult<RankedTable> {
    if let Some(missing) = group_cols.iter().find(|c| !table.has_column(**c)) {
        return Err(DashboardError::Schema(format!(
            "column {} is not part of this table",
            missing
        )));
    }
    let sort_pos = group_cols.iter().position(|c| *c == sort_key).ok_or_else(|| {
        DashboardError::Schema(format!("sort key {} is not a grouping column", sort_key))
    })?;

    let mut groups: IndexMap<Vec<Option<&str>>, u64, FxBuildHasher> = IndexMap::default();
    for row in table.iter() {
        let key: Vec<Option<&str>> = group_cols.iter().map(|c| row.value(*c)).collect();
        *groups.entry(key).or_insert(0) += row.count;
    }

    let mut ranked: Vec<(Vec<Option<&str>>, u64)> = groups.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| nulls_last(a.0[sort_pos], b.0[sort_pos]))
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(n);

    let mut columns: Vec<String> = group_cols.iter().map(|c| c.name().to_string()).collect();
    columns.push(COUNT_COLUMN.to_string());

    Ok(RankedTable {
        columns,
        rows: ranked
            .into_iter()
            .map(|(keys, count)| RankedRow {
                keys: keys.into_iter().map(|k| k.map(str::to_string)).collect(),
                count,
            })
            .collect(),
    })
}

/// Sources ranked by events sent (`From`) or received (`To`).
///
/// Ties are broken by ascending display name.
pub fn top_sources(
    table: &EnrichedTable,
    sources: &SourceTable,
    endpoint: Endpoint,
    n: usize,
) -> RankedTable {
    let mut counts: IndexMap<SourceIndex, u64, FxBuildHasher> = IndexMap::default();
    for row in table.iter() {
        *counts.entry(row.endpoint(endpoint)).or_insert(0) += row.count;
    }

    let mut ranked: Vec<(SourceIndex, String, u64)> = counts
        .into_iter()
        .map(|(idx, count)| {
            let name = sources
                .get(idx)
                .map(|r| r.display_name())
                .unwrap_or_else(|| idx.to_string());
            (idx, name, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.1.cmp(&b.1)).then(a.0.cmp(&b.0)));
    ranked.truncate(n);

    let mut columns = vec![format!("{}_index", endpoint.prefix()), "name".to_string()];
    columns.extend(Attribute::ALL.iter().map(|a| a.column_name().to_string()));
    columns.push(COUNT_COLUMN.to_string());

    let rows = ranked
        .into_iter()
        .map(|(idx, name, count)| {
            let record = sources.get(idx);
            let mut keys = vec![Some(idx.to_string()), Some(name)];
            keys.extend(
                Attribute::ALL
                    .iter()
                    .map(|&a| record.and_then(|r| r.attribute(a)).map(str::to_string)),
            );
            RankedRow { keys, count }
        })
        .collect();

    RankedTable { columns, rows }
}

/// Distinct sources appearing on either end of any event
pub fn endpoint_count(table: &EnrichedTable) -> usize {
    let mut seen: FxHashSet<SourceIndex> = FxHashSet::default();
    for row in table.iter() {
        seen.insert(row.from_index);
        seen.insert(row.to_index);
    }
    seen.len()
}

fn nulls_last(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{EdgeEvent, EdgeTable, SourceRecord};
    use crate::table::enrich;

    fn fixture() -> (EnrichedTable, SourceTable) {
        let sources: SourceTable = vec![
            SourceRecord::new(0).with_name("Zeta").with(Attribute::Country, "Spain"),
            SourceRecord::new(1).with_name("Alpha").with(Attribute::Country, "France"),
            SourceRecord::new(2).with_name("Beta"),
        ]
        .into_iter()
        .collect();
        let edges = EdgeTable::new(vec![
            EdgeEvent::new(0, 1),
            EdgeEvent::new(1, 0),
            EdgeEvent::new(2, 0),
            EdgeEvent::new(2, 1),
            EdgeEvent::new(2, 1),
        ]);
        (enrich(&edges, &sources, false), sources)
    }

    #[test]
    fn test_top_n_ranks_and_breaks_ties() {
        let (table, _) = fixture();
        let country = Column::Source(Attribute::Country);
        let ranked = top_n(&table, 20, &[country], country).unwrap();

        assert_eq!(ranked.columns, vec!["country", "count"]);
        // null country (source 2) has 3 events, then France and Spain tie at 1
        assert_eq!(ranked.rows[0].keys, vec![None]);
        assert_eq!(ranked.rows[0].count, 3);
        assert_eq!(ranked.value(1, "country"), Some("France"));
        assert_eq!(ranked.value(2, "country"), Some("Spain"));
        assert_eq!(ranked.total_count(), table.total_count());
    }

    #[test]
    fn test_top_n_truncates() {
        let (table, _) = fixture();
        let country = Column::Source(Attribute::Country);
        assert_eq!(top_n(&table, 1, &[country], country).unwrap().len(), 1);
    }

    #[test]
    fn test_top_n_rejects_foreign_columns() {
        let (table, _) = fixture();
        let to_country = Column::Endpoint(Endpoint::To, Attribute::Country);
        assert!(top_n(&table, 5, &[to_country], to_country).is_err());

        let country = Column::Source(Attribute::Country);
        assert!(top_n(&table, 5, &[country], Column::Topics).is_err());
    }

    #[test]
    fn test_top_sources() {
        let (table, sources) = fixture();

        let senders = top_sources(&table, &sources, Endpoint::From, 10);
        assert_eq!(senders.columns[0], "from_index");
        assert_eq!(senders.value(0, "name"), Some("Beta"));
        assert_eq!(senders.rows[0].count, 3);
        // Alpha and Zeta tie at one event each
        assert_eq!(senders.value(1, "name"), Some("Alpha"));
        assert_eq!(senders.value(2, "name"), Some("Zeta"));

        let receivers = top_sources(&table, &sources, Endpoint::To, 1);
        assert_eq!(receivers.len(), 1);
        assert_eq!(receivers.value(0, "name"), Some("Alpha"));
        assert_eq!(receivers.value(0, "country"), Some("France"));
    }

    #[test]
    fn test_endpoint_count() {
        let (table, _) = fixture();
        assert_eq!(endpoint_count(&table), 3);
        assert_eq!(endpoint_count(&EnrichedTable::default()), 0);
    }
}
