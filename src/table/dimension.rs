//! Categorical dimensions and the columns they resolve to

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A categorical attribute carried by source metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Category,
    Region,
    Country,
    #[serde(rename = "lang")]
    Language,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Category,
        Attribute::Region,
        Attribute::Country,
        Attribute::Language,
    ];

    /// Column name in the source table
    pub fn column_name(&self) -> &'static str {
        match self {
            Attribute::Category => "category",
            Attribute::Region => "region",
            Attribute::Country => "country",
            Attribute::Language => "lang",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Side of an edge event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    From,
    To,
}

impl Endpoint {
    pub const BOTH: [Endpoint; 2] = [Endpoint::From, Endpoint::To];

    pub fn prefix(&self) -> &'static str {
        match self {
            Endpoint::From => "from",
            Endpoint::To => "to",
        }
    }
}

/// A dimension a filter selection can restrict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Category,
    Region,
    Country,
    #[serde(alias = "lang")]
    Language,
    #[serde(alias = "topic")]
    Topics,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Category,
        Dimension::Region,
        Dimension::Country,
        Dimension::Language,
        Dimension::Topics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Category => "category",
            Dimension::Region => "region",
            Dimension::Country => "country",
            Dimension::Language => "language",
            Dimension::Topics => "topics",
        }
    }

    /// The source attribute behind this dimension; `None` for topics,
    /// which belong to the event rather than an endpoint.
    pub fn attribute(&self) -> Option<Attribute> {
        match self {
            Dimension::Category => Some(Attribute::Category),
            Dimension::Region => Some(Attribute::Region),
            Dimension::Country => Some(Attribute::Country),
            Dimension::Language => Some(Attribute::Language),
            Dimension::Topics => None,
        }
    }

    /// Columns this dimension is matched against
    pub fn columns(&self, dual_endpoint: bool) -> Vec<Column> {
        match (self.attribute(), dual_endpoint) {
            (None, _) => vec![Column::Topics],
            (Some(attr), true) => Endpoint::BOTH
                .iter()
                .map(|&e| Column::Endpoint(e, attr))
                .collect(),
            (Some(attr), false) => vec![Column::Source(attr)],
        }
    }

    /// Whether values match by substring rather than equality
    pub fn matches_by_containment(&self) -> bool {
        matches!(self, Dimension::Topics)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(Dimension::Category),
            "region" => Ok(Dimension::Region),
            "country" => Ok(Dimension::Country),
            "language" | "lang" => Ok(Dimension::Language),
            "topic" | "topics" => Ok(Dimension::Topics),
            other => Err(format!("unknown dimension '{}'", other)),
        }
    }
}

impl From<Attribute> for Dimension {
    fn from(attr: Attribute) -> Self {
        match attr {
            Attribute::Category => Dimension::Category,
            Attribute::Region => Dimension::Region,
            Attribute::Country => Dimension::Country,
            Attribute::Language => Dimension::Language,
        }
    }
}

/// A column of an enriched table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    /// Attribute of the `from` endpoint in a single-endpoint table (unprefixed)
    Source(Attribute),
    /// Attribute of one endpoint in a dual-endpoint table
    Endpoint(Endpoint, Attribute),
    /// Composite topics label of the event
    Topics,
}

impl Column {
    pub fn name(&self) -> &'static str {
        match self {
            Column::Source(attr) => attr.column_name(),
            Column::Endpoint(Endpoint::From, Attribute::Category) => "from_category",
            Column::Endpoint(Endpoint::From, Attribute::Region) => "from_region",
            Column::Endpoint(Endpoint::From, Attribute::Country) => "from_country",
            Column::Endpoint(Endpoint::From, Attribute::Language) => "from_lang",
            Column::Endpoint(Endpoint::To, Attribute::Category) => "to_category",
            Column::Endpoint(Endpoint::To, Attribute::Region) => "to_region",
            Column::Endpoint(Endpoint::To, Attribute::Country) => "to_country",
            Column::Endpoint(Endpoint::To, Attribute::Language) => "to_lang",
            Column::Topics => "topics",
        }
    }

    /// All attribute and topics columns of a table with the given layout
    pub fn all(dual_endpoint: bool) -> Vec<Column> {
        let mut columns: Vec<Column> = if dual_endpoint {
            Endpoint::BOTH
                .iter()
                .flat_map(|&e| Attribute::ALL.iter().map(move |&a| Column::Endpoint(e, a)))
                .collect()
        } else {
            Attribute::ALL.iter().map(|&a| Column::Source(a)).collect()
        };
        columns.push(Column::Topics);
        columns
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
