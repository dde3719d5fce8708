//! Core record types for the edge-event and source-metadata tables

use crate::table::Attribute;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of a media source, shared by `from_index`/`to_index` and the source table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct SourceIndex(pub u64);

impl SourceIndex {
    pub fn new(index: u64) -> Self {
        SourceIndex(index)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SourceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SourceIndex {
    fn from(index: u64) -> Self {
        SourceIndex(index)
    }
}

/// One observed sharing interaction between two sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeEvent {
    pub from_index: SourceIndex,
    pub to_index: SourceIndex,
    pub parsed_date: Option<NaiveDateTime>,
    pub topic1: Option<String>,
    pub topic2: Option<String>,
}

impl EdgeEvent {
    pub fn new(from_index: u64, to_index: u64) -> Self {
        EdgeEvent {
            from_index: SourceIndex(from_index),
            to_index: SourceIndex(to_index),
            parsed_date: None,
            topic1: None,
            topic2: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.parsed_date = Some(date);
        self
    }

    pub fn with_topics(mut self, topic1: impl Into<String>, topic2: Option<&str>) -> Self {
        self.topic1 = Some(topic1.into());
        self.topic2 = topic2.map(str::to_string);
        self
    }

    /// Every event counts once before aggregation
    pub fn count(&self) -> u64 {
        1
    }
}

/// Categorical metadata for one media source
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceRecord {
    pub index: SourceIndex,
    pub name: Option<String>,
    pub text: Option<String>,
    pub category: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub lang: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl SourceRecord {
    pub fn new(index: u64) -> Self {
        SourceRecord {
            index: SourceIndex(index),
            ..Default::default()
        }
    }

    /// Set one categorical attribute (builder style)
    pub fn with(mut self, attribute: Attribute, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match attribute {
            Attribute::Category => self.category = value,
            Attribute::Region => self.region = value,
            Attribute::Country => self.country = value,
            Attribute::Language => self.lang = value,
        }
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn attribute(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Category => self.category.as_deref(),
            Attribute::Region => self.region.as_deref(),
            Attribute::Country => self.country.as_deref(),
            Attribute::Language => self.lang.as_deref(),
        }
    }

    /// Name shown for the source, falling back to `text`, then the index
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .or(self.text.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| self.index.to_string())
    }
}

/// The edge-event table, immutable once loaded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeTable {
    events: Vec<EdgeEvent>,
}

impl EdgeTable {
    pub fn new(events: Vec<EdgeEvent>) -> Self {
        EdgeTable { events }
    }

    pub fn events(&self) -> &[EdgeEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EdgeEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl FromIterator<EdgeEvent> for EdgeTable {
    fn from_iter<I: IntoIterator<Item = EdgeEvent>>(iter: I) -> Self {
        EdgeTable::new(iter.into_iter().collect())
    }
}

/// The source-metadata table, keyed by [`SourceIndex`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    records: IndexMap<SourceIndex, SourceRecord>,
}

impl SourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any earlier record with the same index
    pub fn insert(&mut self, record: SourceRecord) -> Option<SourceRecord> {
        self.records.insert(record.index, record)
    }

    pub fn get(&self, index: SourceIndex) -> Option<&SourceRecord> {
        self.records.get(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<SourceRecord> for SourceTable {
    fn from_iter<I: IntoIterator<Item = SourceRecord>>(iter: I) -> Self {
        let mut table = SourceTable::new();
        for record in iter {
            table.insert(record);
        }
        table
    }
}

/// Both tables of a loaded dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub edges: EdgeTable,
    pub sources: SourceTable,
}

impl Dataset {
    pub fn new(edges: EdgeTable, sources: SourceTable) -> Self {
        Dataset { edges, sources }
    }
}
