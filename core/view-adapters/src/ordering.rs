//! FILENAME: core/view-adapters/src/ordering.rs
//! Explicit row ordering applied by views after aggregation.
//!
//! All sorts are stable, so rows that compare equal keep the engine's
//! first-seen order. Text compares by code point, never by locale.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use aggregate_engine::{AggregateRow, AggregateTable, Dimension, DimensionValue, Measure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortBy {
    Dimension(Dimension),
    Measure(Measure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub by: SortBy,
    pub order: SortOrder,
}

impl SortKey {
    pub fn ascending(by: SortBy) -> Self {
        SortKey { by, order: SortOrder::Ascending }
    }

    pub fn descending(by: SortBy) -> Self {
        SortKey { by, order: SortOrder::Descending }
    }
}

/// Stable sort of `table.rows` by `key`.
/// A key naming a column the table does not have leaves the order untouched.
pub fn sort_rows(table: &mut AggregateTable, key: SortKey) {
    let compare: Box<dyn Fn(&AggregateRow, &AggregateRow) -> Ordering> = match key.by {
        SortBy::Dimension(dimension) => match table.dimension_index(dimension) {
            Some(i) => Box::new(move |a, b| a.keys[i].cmp(&b.keys[i])),
            None => return,
        },
        SortBy::Measure(measure) => match table.measure_index(measure) {
            Some(i) => Box::new(move |a, b| a.values[i].total_cmp(&b.values[i])),
            None => return,
        },
    };

    match key.order {
        SortOrder::Ascending => table.rows.sort_by(|a, b| compare(a, b)),
        SortOrder::Descending => table.rows.sort_by(|a, b| compare(b, a)),
    }
}

/// Reorders rows so that rows sharing a `dimension` value are contiguous,
/// with the groups in first-seen order. Returns each group's value and
/// row range.
pub fn group_contiguous(table: &mut AggregateTable, dimension: Dimension) -> Vec<(DimensionValue, usize, usize)> {
    let Some(i) = table.dimension_index(dimension) else {
        return Vec::new();
    };

    let mut seen: Vec<DimensionValue> = Vec::new();
    for row in &table.rows {
        if !seen.contains(&row.keys[i]) {
            seen.push(row.keys[i].clone());
        }
    }

    table.rows.sort_by_key(|row| seen.iter().position(|v| *v == row.keys[i]));

    let mut ranges = Vec::with_capacity(seen.len());
    let mut start = 0;
    for value in seen {
        let len = table.rows[start..]
            .iter()
            .take_while(|row| row.keys[i] == value)
            .count();
        ranges.push((value, start, len));
        start += len;
    }
    ranges
}

/// (min, max) of a measure across all rows.
pub fn value_range(table: &AggregateTable, measure: Measure) -> Option<(f64, f64)> {
    let i = table.measure_index(measure)?;
    table.rows.iter().map(|r| r.values[i]).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
