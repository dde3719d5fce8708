//! Metadata join: edge events enriched with their endpoints' attributes

use super::dimension::{Attribute, Column, Endpoint};
use crate::dataset::{EdgeEvent, EdgeTable, SourceIndex, SourceRecord, SourceTable};
use chrono::NaiveDateTime;
use tracing::debug;

/// Categorical attributes copied from one source record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Attributes {
    pub category: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub lang: Option<String>,
}

impl Attributes {
    /// Attributes of a known source, or all-null for an unknown one
    fn of(record: Option<&SourceRecord>) -> Self {
        match record {
            Some(r) => Attributes {
                category: r.category.clone(),
                region: r.region.clone(),
                country: r.country.clone(),
                lang: r.lang.clone(),
            },
            None => Attributes::default(),
        }
    }

    pub fn get(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Category => self.category.as_deref(),
            Attribute::Region => self.region.as_deref(),
            Attribute::Country => self.country.as_deref(),
            Attribute::Language => self.lang.as_deref(),
        }
    }
}

/// One edge event with endpoint metadata and the composite topics label
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    pub from_index: SourceIndex,
    pub to_index: SourceIndex,
    pub parsed_date: Option<NaiveDateTime>,
    pub topics: Option<String>,
    pub count: u64,
    /// Attributes of the `from` source
    pub source: Attributes,
    /// Attributes of the `to` source; present only in dual-endpoint tables
    pub target: Option<Attributes>,
}

impl EnrichedRow {
    /// Value of a column, `None` when null or not part of this row's layout
    pub fn value(&self, column: Column) -> Option<&str> {
        match column {
            Column::Topics => self.topics.as_deref(),
            Column::Source(attr) if self.target.is_none() => self.source.get(attr),
            Column::Source(_) => None,
            Column::Endpoint(Endpoint::From, attr) if self.target.is_some() => self.source.get(attr),
            Column::Endpoint(Endpoint::From, _) => None,
            Column::Endpoint(Endpoint::To, attr) => self.target.as_ref().and_then(|t| t.get(attr)),
        }
    }

    pub fn endpoint(&self, endpoint: Endpoint) -> SourceIndex {
        match endpoint {
            Endpoint::From => self.from_index,
            Endpoint::To => self.to_index,
        }
    }
}

/// Edge events joined against source metadata
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnrichedTable {
    rows: Vec<EnrichedRow>,
    dual_endpoint: bool,
}

impl EnrichedTable {
    pub fn new(rows: Vec<EnrichedRow>, dual_endpoint: bool) -> Self {
        EnrichedTable { rows, dual_endpoint }
    }

    pub fn rows(&self) -> &[EnrichedRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnrichedRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether attributes were joined for both endpoints (`from_*`/`to_*` columns)
    pub fn dual_endpoint(&self) -> bool {
        self.dual_endpoint
    }

    /// Attribute and topics columns of this table
    pub fn columns(&self) -> Vec<Column> {
        Column::all(self.dual_endpoint)
    }

    pub fn has_column(&self, column: Column) -> bool {
        match column {
            Column::Topics => true,
            Column::Source(_) => !self.dual_endpoint,
            Column::Endpoint(..) => self.dual_endpoint,
        }
    }

    /// A new table holding the rows that satisfy `predicate`
    pub fn select<F>(&self, mut predicate: F) -> EnrichedTable
    where
        F: FnMut(&EnrichedRow) -> bool,
    {
        EnrichedTable {
            rows: self.rows.iter().filter(|r| predicate(r)).cloned().collect(),
            dual_endpoint: self.dual_endpoint,
        }
    }

    /// Sum of event counts
    pub fn total_count(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }
}

/// Composite topics label: both topics sorted and joined with `+`, or the single topic
pub fn merge_topics(topic1: Option<&str>, topic2: Option<&str>) -> Option<String> {
    match (topic1, topic2) {
        (Some(a), Some(b)) => {
            let (first, second) = if a <= b { (a, b) } else { (b, a) };
            Some(format!("{}+{}", first, second))
        }
        (Some(a), None) => Some(a.to_string()),
        (None, Some(b)) => Some(b.to_string()),
        (None, None) => None,
    }
}

/// Join edge events to source metadata.
///
/// With `dual_endpoint` both endpoints are joined (`from_*` and `to_*`
/// columns); otherwise only the `from` endpoint, unprefixed. This is a left
/// join: events whose endpoint is missing from the source table keep null
/// attributes instead of being dropped.
pub fn enrich(edges: &EdgeTable, sources: &SourceTable, dual_endpoint: bool) -> EnrichedTable {
    let mut unknown = 0usize;

    let rows = edges
        .iter()
        .map(|event: &EdgeEvent| {
            let from = sources.get(event.from_index);
            let to = sources.get(event.to_index);
            if from.is_none() || (dual_endpoint && to.is_none()) {
                unknown += 1;
            }

            EnrichedRow {
                from_index: event.from_index,
                to_index: event.to_index,
                parsed_date: event.parsed_date,
                topics: merge_topics(event.topic1.as_deref(), event.topic2.as_deref()),
                count: event.count(),
                source: Attributes::of(from),
                target: dual_endpoint.then(|| Attributes::of(to)),
            }
        })
        .collect();

    if unknown > 0 {
        debug!("{} events reference sources without metadata", unknown);
    }

    EnrichedTable::new(rows, dual_endpoint)
}
