//! Filter engine
//!
//! Include filtering runs first and keeps a row when it matches at least
//! one value of at least one included dimension, on any of that dimension's
//! columns (both endpoints in a dual-endpoint table). Exclude filtering then
//! drops every row matching any excluded value of any dimension. Topics
//! match by substring against the composite label; everything else matches
//! by equality. Null cells never match.

pub mod options;
pub mod selection;

pub use options::{filter_options, FilterOptions};
pub use selection::{FilterSelection, ValueList};

use crate::table::{Dimension, EnrichedRow, EnrichedTable};
use tracing::debug;

/// Apply a selection: include stage, then exclude stage
pub fn apply(table: &EnrichedTable, selection: &FilterSelection) -> EnrichedTable {
    if selection.is_unrestricted() {
        return table.clone();
    }

    let included = apply_include(table, selection);
    let filtered = apply_exclude(&included, selection);
    debug!(
        "Filtered {} rows to {} ({} after include)",
        table.len(),
        filtered.len(),
        included.len()
    );
    filtered
}

/// Keep rows matching any included dimension (OR across dimensions)
pub fn apply_include(table: &EnrichedTable, selection: &FilterSelection) -> EnrichedTable {
    let dual = table.dual_endpoint();
    let include: Vec<(Dimension, &[String])> = selection.active_include().collect();
    if include.is_empty() {
        return table.clone();
    }

    table.select(|row| {
        include
            .iter()
            .any(|(dim, values)| row_matches(row, *dim, values, dual))
    })
}

/// Drop rows matching any excluded dimension (each enforced independently)
pub fn apply_exclude(table: &EnrichedTable, selection: &FilterSelection) -> EnrichedTable {
    let dual = table.dual_endpoint();
    let exclude: Vec<(Dimension, &[String])> = selection.active_exclude().collect();
    if exclude.is_empty() {
        return table.clone();
    }

    table.select(|row| {
        !exclude
            .iter()
            .any(|(dim, values)| row_matches(row, *dim, values, dual))
    })
}

/// Whether any of the dimension's columns in `row` matches any of `values`
pub fn row_matches(row: &EnrichedRow, dimension: Dimension, values: &[String], dual_endpoint: bool) -> bool {
    dimension.columns(dual_endpoint).into_iter().any(|column| {
        let Some(cell) = row.value(column) else {
            return false;
        };
        if dimension.matches_by_containment() {
            values.iter().any(|v| cell.contains(v.as_str()))
        } else {
            values.iter().any(|v| v == cell)
        }
    })
}
