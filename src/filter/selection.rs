//! Declarative include/exclude selections

use crate::error::{DashboardError, DashboardResult};
use crate::table::Dimension;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accepted or rejected values for one dimension; `None` means no restriction
pub type ValueList = Option<Vec<String>>;

/// Include/exclude value lists keyed by dimension
///
/// Deserialises from `{"include": {"region": ["EU"]}, "exclude": {"topic": ["sports"]}}`.
/// A dimension that is absent, `null` or empty does not restrict anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub include: BTreeMap<Dimension, ValueList>,
    #[serde(default)]
    pub exclude: BTreeMap<Dimension, ValueList>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add accepted values for a dimension (builder style)
    pub fn include<I, S>(mut self, dimension: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.include, dimension, values);
        self
    }

    /// Add rejected values for a dimension (builder style)
    pub fn exclude<I, S>(mut self, dimension: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.exclude, dimension, values);
        self
    }

    /// Include dimensions with at least one value
    pub fn active_include(&self) -> impl Iterator<Item = (Dimension, &[String])> {
        active(&self.include)
    }

    /// Exclude dimensions with at least one value
    pub fn active_exclude(&self) -> impl Iterator<Item = (Dimension, &[String])> {
        active(&self.exclude)
    }

    /// True when neither side restricts anything
    pub fn is_unrestricted(&self) -> bool {
        self.active_include().next().is_none() && self.active_exclude().next().is_none()
    }

    pub fn from_json_str(json: &str) -> DashboardResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| DashboardError::Schema(format!("invalid filter selection: {}", e)))
    }
}

fn extend<I, S>(map: &mut BTreeMap<Dimension, ValueList>, dimension: Dimension, values: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    map.entry(dimension)
        .or_insert(None)
        .get_or_insert_with(Vec::new)
        .extend(values.into_iter().map(Into::into));
}

fn active(map: &BTreeMap<Dimension, ValueList>) -> impl Iterator<Item = (Dimension, &[String])> {
    map.iter().filter_map(|(dim, values)| match values {
        Some(v) if !v.is_empty() => Some((*dim, v.as_slice())),
        _ => None,
    })
}
