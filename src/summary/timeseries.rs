//! Daily event series per category, with a window around the central date

use crate::table::{Dimension, EnrichedTable};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Legend labels longer than this are truncated
pub const LABEL_WIDTH: usize = 15;

/// Legend label for the null category
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: u64,
}

/// Daily counts of one category value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySeries {
    pub category: Option<String>,
    /// Display label, padded or truncated to the legend width
    pub label: String,
    pub total: u64,
    pub points: Vec<SeriesPoint>,
}

/// Date range centred on the median event date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub central: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn around(central: NaiveDate, days: i64) -> Self {
        let span = Duration::days(days.max(0));
        DateWindow {
            central,
            start: central.checked_sub_signed(span).unwrap_or(NaiveDate::MIN),
            end: central.checked_add_signed(span).unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// All series of one dimension, ordered by ascending total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySeriesSet {
    pub dimension: Dimension,
    pub series: Vec<DailySeries>,
    /// `None` when no event carries a date
    pub window: Option<DateWindow>,
}

impl DailySeriesSet {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, category: Option<&str>) -> Option<&DailySeries> {
        self.series.iter().find(|s| s.category.as_deref() == category)
    }
}

/// Per-day counts of each value of `dimension`.
///
/// The value column is the first column the dimension resolves to, so
/// dual-endpoint tables are split by the sending side. Undated events are
/// skipped; an empty table yields an empty set.
pub fn daily_series(table: &EnrichedTable, dimension: Dimension, window_days: i64) -> DailySeriesSet {
    let column = dimension.columns(table.dual_endpoint())[0];

    let mut grouped: BTreeMap<Option<&str>, BTreeMap<NaiveDate, u64>> = BTreeMap::new();
    for row in table.iter() {
        let Some(stamp) = row.parsed_date else {
            continue;
        };
        *grouped
            .entry(row.value(column))
            .or_default()
            .entry(stamp.date())
            .or_insert(0) += row.count;
    }

    let mut series: Vec<DailySeries> = grouped
        .into_iter()
        .map(|(category, days)| DailySeries {
            category: category.map(str::to_string),
            label: display_label(category),
            total: days.values().sum(),
            points: days
                .into_iter()
                .map(|(date, value)| SeriesPoint { date, value })
                .collect(),
        })
        .collect();
    // stable sort keeps categories in name order within equal totals
    series.sort_by_key(|s| s.total);

    let window = central_date(&daily_totals(table)).map(|c| DateWindow::around(c, window_days));

    DailySeriesSet {
        dimension,
        series,
        window,
    }
}

/// Event count per calendar day over all dated events
pub fn daily_totals(table: &EnrichedTable) -> BTreeMap<NaiveDate, u64> {
    let mut totals = BTreeMap::new();
    for row in table.iter() {
        if let Some(stamp) = row.parsed_date {
            *totals.entry(stamp.date()).or_insert(0) += row.count;
        }
    }
    totals
}

/// First date at which the cumulative share of events reaches one half
pub fn central_date(totals: &BTreeMap<NaiveDate, u64>) -> Option<NaiveDate> {
    let total: u64 = totals.values().sum();
    if total == 0 {
        return None;
    }
    let mut cumulative = 0u64;
    for (date, count) in totals {
        cumulative += count;
        if cumulative * 2 >= total {
            return Some(*date);
        }
    }
    None
}

/// Legend label: values wider than [`LABEL_WIDTH`] are cut and suffixed
/// with `...`, shorter ones padded to the width.
pub fn display_label(category: Option<&str>) -> String {
    let name = category.unwrap_or(UNKNOWN_LABEL);
    if name.chars().count() > LABEL_WIDTH {
        let head: String = name.chars().take(LABEL_WIDTH).collect();
        format!("{}...", head)
    } else {
        format!("{:<width$}", name, width = LABEL_WIDTH)
    }
}
