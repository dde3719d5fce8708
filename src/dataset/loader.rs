//! Dataset loading from delimited text tables
//!
//! Both tables carry a header row. Tab is the native delimiter; a header
//! without tabs but with commas is read as comma-separated instead.

use super::types::{Dataset, EdgeEvent, EdgeTable, SourceIndex, SourceRecord, SourceTable};
use crate::error::{DashboardError, DashboardResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Columns every edge table must carry
pub const EDGE_COLUMNS: &[&str] = &["from_index", "to_index", "parsed_date"];

/// Columns every source table must carry
pub const SOURCE_COLUMNS: &[&str] = &["category", "region", "country", "lang"];

/// Columns that identify an uploaded table as source metadata
const SOURCE_SIGNATURE: &[&str] = &["country", "lang", "name", "lat", "lon"];

/// Header names accepted for the source key column
const INDEX_HEADERS: &[&str] = &["index", "", "Unnamed: 0"];

/// Cell contents read as null
const NULL_TOKENS: &[&str] = &["", "nan", "NaN", "None", "null"];

/// Logical file role within a dataset handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableRole {
    Edgelist,
    Sources,
}

impl TableRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableRole::Edgelist => "edgelist",
            TableRole::Sources => "sources",
        }
    }
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a table by its header, as done for uploaded files
pub fn detect_role<S: AsRef<str>>(headers: &[S]) -> Option<TableRole> {
    let has_all = |wanted: &[&str]| {
        wanted
            .iter()
            .all(|w| headers.iter().any(|h| h.as_ref().trim() == *w))
    };

    if has_all(EDGE_COLUMNS) {
        Some(TableRole::Edgelist)
    } else if has_all(SOURCE_SIGNATURE) {
        Some(TableRole::Sources)
    } else {
        None
    }
}

/// Storage locations of the two tables that make up a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetHandle {
    pub edgelist: PathBuf,
    pub sources: PathBuf,
}

impl DatasetHandle {
    pub fn new(edgelist: impl Into<PathBuf>, sources: impl Into<PathBuf>) -> Self {
        DatasetHandle {
            edgelist: edgelist.into(),
            sources: sources.into(),
        }
    }

    /// Build a handle from a role -> location mapping.
    ///
    /// Unknown roles are ignored; a missing role is a load error.
    pub fn from_roles<I, K, V>(roles: I) -> DashboardResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<PathBuf>,
    {
        let mut edgelist = None;
        let mut sources = None;

        for (role, location) in roles {
            match role.as_ref() {
                "edgelist" => edgelist = Some(location.into()),
                "sources" => sources = Some(location.into()),
                other => debug!("Ignoring unknown dataset role '{}'", other),
            }
        }

        let missing = |role| DashboardError::data_load(role, "", "role missing from dataset handle");
        Ok(DatasetHandle {
            edgelist: edgelist.ok_or_else(|| missing(TableRole::Edgelist))?,
            sources: sources.ok_or_else(|| missing(TableRole::Sources))?,
        })
    }

    pub fn location(&self, role: TableRole) -> &Path {
        match role {
            TableRole::Edgelist => &self.edgelist,
            TableRole::Sources => &self.sources,
        }
    }

    /// Read both tables
    pub fn load(&self) -> DashboardResult<Dataset> {
        let edges = load_edges(&self.edgelist)?;
        let sources = load_sources(&self.sources)?;
        info!(
            "Loaded dataset: {} edge events, {} sources",
            edges.len(),
            sources.len()
        );
        Ok(Dataset::new(edges, sources))
    }
}

/// Read an edge-event table from disk
pub fn load_edges(path: &Path) -> DashboardResult<EdgeTable> {
    let text = read_table(path, TableRole::Edgelist)?;
    parse_edges(&text, &path.display().to_string())
}

/// Read a source-metadata table from disk
pub fn load_sources(path: &Path) -> DashboardResult<SourceTable> {
    let text = read_table(path, TableRole::Sources)?;
    parse_sources(&text, &path.display().to_string())
}

fn read_table(path: &Path, role: TableRole) -> DashboardResult<String> {
    debug!("Reading {} table from {:?}", role, path);
    std::fs::read_to_string(path)
        .map_err(|e| DashboardError::data_load(role, path.display().to_string(), e))
}

/// Parse an edge-event table from its text contents
pub fn parse_edges(text: &str, location: &str) -> DashboardResult<EdgeTable> {
    let role = TableRole::Edgelist;
    let mut reader = reader_for(text);
    let header = Header::read(&mut reader, role, location)?;
    header.require(EDGE_COLUMNS, role)?;

    let mut events = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DashboardError::data_load(role, location, e))?;
        let line = line_of(&record);

        let index = |name: &str| -> DashboardResult<SourceIndex> {
            let raw = header.get(&record, name).unwrap_or_default();
            parse_index(raw).map(SourceIndex).ok_or_else(|| {
                DashboardError::data_load(
                    role,
                    location,
                    format!("line {}: invalid {} '{}'", line, name, raw),
                )
            })
        };

        let from_index = index("from_index")?;
        let to_index = index("to_index")?;

        let parsed_date = match header.get(&record, "parsed_date") {
            None => None,
            Some(raw) => Some(parse_date(raw).ok_or_else(|| {
                DashboardError::data_load(
                    role,
                    location,
                    format!("line {}: invalid parsed_date '{}'", line, raw),
                )
            })?),
        };

        events.push(EdgeEvent {
            from_index,
            to_index,
            parsed_date,
            topic1: header.get(&record, "topic1").map(str::to_string),
            topic2: header.get(&record, "topic2").map(str::to_string),
        });
    }

    debug!("Parsed {} edge events from {}", events.len(), location);
    Ok(EdgeTable::new(events))
}

/// Parse a source-metadata table from its text contents
pub fn parse_sources(text: &str, location: &str) -> DashboardResult<SourceTable> {
    let role = TableRole::Sources;
    let mut reader = reader_for(text);
    let header = Header::read(&mut reader, role, location)?;
    header.require(SOURCE_COLUMNS, role)?;

    let index_column = INDEX_HEADERS.iter().copied().find(|h| header.has(h));

    let mut table = SourceTable::new();
    for (position, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DashboardError::data_load(role, location, e))?;

        let index = match index_column {
            Some(column) => {
                let raw = header.get(&record, column).unwrap_or_default();
                parse_index(raw).ok_or_else(|| {
                    DashboardError::data_load(
                        role,
                        location,
                        format!("line {}: invalid index '{}'", line_of(&record), raw),
                    )
                })?
            }
            None => position as u64,
        };

        let text_of = |name: &str| header.get(&record, name).map(str::to_string);
        let coordinate = |name: &str| header.get(&record, name).and_then(|v| v.parse::<f64>().ok());

        let source = SourceRecord {
            index: SourceIndex(index),
            name: text_of("name"),
            text: text_of("text"),
            category: text_of("category"),
            region: text_of("region"),
            country: text_of("country"),
            lang: text_of("lang"),
            lat: coordinate("lat"),
            lon: coordinate("lon"),
        };

        if table.insert(source).is_some() {
            debug!("Duplicate source index {} in {}, keeping the later row", index, location);
        }
    }

    debug!("Parsed {} sources from {}", table.len(), location);
    Ok(table)
}

/// Column positions resolved from a header row
struct Header {
    positions: HashMap<String, usize>,
}

impl Header {
    fn read(reader: &mut csv::Reader<&[u8]>, role: TableRole, location: &str) -> DashboardResult<Self> {
        let headers = reader
            .headers()
            .map_err(|e| DashboardError::data_load(role, location, e))?;

        let positions = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect();

        Ok(Header { positions })
    }

    fn has(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    fn require(&self, names: &[&str], role: TableRole) -> DashboardResult<()> {
        let missing: Vec<&str> = names.iter().copied().filter(|n| !self.has(n)).collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DashboardError::Schema(format!(
                "{} table is missing column(s): {}",
                role,
                missing.join(", ")
            )))
        }
    }

    /// Cell value for `name`, or `None` when the column is absent or the cell is null
    fn get<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        let raw = record.get(*self.positions.get(name)?)?.trim();
        if NULL_TOKENS.contains(&raw) {
            None
        } else {
            Some(raw)
        }
    }
}

/// Header names of a delimited table, read with the same delimiter sniffing
/// as the table parsers
pub fn read_headers(text: &str) -> DashboardResult<Vec<String>> {
    let mut reader = reader_for(text);
    let headers = reader
        .headers()
        .map_err(|e| DashboardError::Schema(format!("unreadable header row: {}", e)))?;
    Ok(headers.iter().map(|h| h.trim().to_string()).collect())
}

fn reader_for(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(text))
        .has_headers(true)
        .from_reader(text.as_bytes())
}

fn sniff_delimiter(text: &str) -> u8 {
    let first_line = text.lines().next().unwrap_or_default();
    if !first_line.contains('\t') && first_line.contains(',') {
        b','
    } else {
        b'\t'
    }
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or_default()
}

/// Parse a source index, accepting float renderings such as `12.0`
fn parse_index(raw: &str) -> Option<u64> {
    if let Ok(i) = raw.parse::<u64>() {
        return Some(i);
    }
    match raw.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Some(f as u64),
        _ => None,
    }
}

/// Parse a timestamp in one of the accepted layouts
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    const LAYOUTS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    if let Some(dt) = LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
    {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
