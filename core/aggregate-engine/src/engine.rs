//! FILENAME: core/aggregate-engine/src/engine.rs
//! Aggregation Engine - turns filtered records into an aggregate table.
//!
//! Algorithm:
//! 1. Single pass over the records, skipping those the predicate rejects
//! 2. Hash-group survivors by the tuple of GroupSpec dimension values
//! 3. Feed each measure's accumulator as records arrive
//! 4. Emit one row per realized group, in first-seen order
//!
//! The engine never sorts and never rounds. Any ordering or formatting is
//! applied afterwards by the view that owns the table.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use dataset::{AgeBand, EnrichedRecord, RegionCode, Season};

use crate::definition::{Dimension, GroupSpec, Measure};
use crate::filter::Predicate;

// ============================================================================
// DIMENSION VALUES
// ============================================================================

/// One group-key component of an output row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DimensionValue {
    Text(String),
    Season(Season),
    AgeBand(AgeBand),
    RegionCode(RegionCode),
}

impl DimensionValue {
    pub fn text(s: impl Into<String>) -> Self {
        DimensionValue::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DimensionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_age_band(&self) -> Option<AgeBand> {
        match self {
            DimensionValue::AgeBand(band) => Some(*band),
            _ => None,
        }
    }

    pub fn as_region_code(&self) -> Option<&RegionCode> {
        match self {
            DimensionValue::RegionCode(code) => Some(code),
            _ => None,
        }
    }
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionValue::Text(s) => f.write_str(s),
            DimensionValue::Season(s) => write!(f, "{}", s),
            DimensionValue::AgeBand(b) => write!(f, "{}", b),
            DimensionValue::RegionCode(c) => write!(f, "{}", c),
        }
    }
}

impl Dimension {
    /// The owned value of this dimension for a record.
    pub fn value_of(&self, record: &EnrichedRecord) -> DimensionValue {
        KeyPart::of(record, *self).to_value()
    }
}

/// Borrowed key component used while grouping, so building a key never
/// allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum KeyPart<'a> {
    Text(&'a str),
    Season(Season),
    AgeBand(AgeBand),
    RegionCode(&'a RegionCode),
}

impl<'a> KeyPart<'a> {
    fn of(record: &'a EnrichedRecord, dimension: Dimension) -> Self {
        let r = &record.record;
        match dimension {
            Dimension::Region => KeyPart::Text(&r.region),
            Dimension::RegionCode => KeyPart::RegionCode(&record.region_code),
            Dimension::Season => KeyPart::Season(r.season),
            Dimension::Gender => KeyPart::Text(&r.gender),
            Dimension::Item => KeyPart::Text(&r.item),
            Dimension::Category => KeyPart::Text(&r.category),
            Dimension::AgeBand => KeyPart::AgeBand(record.age_band),
        }
    }

    fn to_value(self) -> DimensionValue {
        match self {
            KeyPart::Text(s) => DimensionValue::Text(s.to_string()),
            KeyPart::Season(s) => DimensionValue::Season(s),
            KeyPart::AgeBand(b) => DimensionValue::AgeBand(b),
            KeyPart::RegionCode(c) => DimensionValue::RegionCode(c.clone()),
        }
    }

    fn matches(&self, value: &DimensionValue) -> bool {
        match (self, value) {
            (KeyPart::Text(a), DimensionValue::Text(b)) => *a == b.as_str(),
            (KeyPart::Season(a), DimensionValue::Season(b)) => a == b,
            (KeyPart::AgeBand(a), DimensionValue::AgeBand(b)) => a == b,
            (KeyPart::RegionCode(a), DimensionValue::RegionCode(b)) => *a == b,
            _ => false,
        }
    }
}

type GroupKey<'a> = SmallVec<[KeyPart<'a>; 4]>;

// ============================================================================
// ACCUMULATOR
// ============================================================================

/// Running state for one measure of one group.
/// Only created from a first value, so it is never empty.
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: u64,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn start(value: f64) -> Self {
        Accumulator {
            sum: value,
            count: 1,
            min: value,
            max: value,
        }
    }

    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn finish(&self, measure: &Measure) -> f64 {
        use crate::definition::Reducer;
        match measure.reducer {
            Reducer::Mean => self.sum / self.count as f64,
            Reducer::Sum => self.sum,
            Reducer::Count => self.count as f64,
            Reducer::Min => self.min,
            Reducer::Max => self.max,
        }
    }
}

// ============================================================================
// OUTPUT TABLE
// ============================================================================

/// One output row: a value per grouping dimension, a value per measure,
/// and the number of records in the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub keys: Vec<DimensionValue>,
    pub values: Vec<f64>,
    pub count: usize,
}

/// The ordered result of one aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateTable {
    pub dimensions: Vec<Dimension>,
    pub measures: Vec<Measure>,
    pub rows: Vec<AggregateRow>,
}

impl AggregateTable {
    /// An empty table shaped like `spec`.
    pub fn empty(spec: &GroupSpec) -> Self {
        AggregateTable {
            dimensions: spec.dimensions().to_vec(),
            measures: spec.measures().to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dimension_index(&self, dimension: Dimension) -> Option<usize> {
        self.dimensions.iter().position(|d| *d == dimension)
    }

    pub fn measure_index(&self, measure: Measure) -> Option<usize> {
        self.measures.iter().position(|m| *m == measure)
    }

    /// The key of `row` for `dimension`, if the table groups by it.
    pub fn key<'t>(&self, row: &'t AggregateRow, dimension: Dimension) -> Option<&'t DimensionValue> {
        self.dimension_index(dimension).and_then(|i| row.keys.get(i))
    }

    /// The value of `row` for `measure`, if the table computes it.
    pub fn value(&self, row: &AggregateRow, measure: Measure) -> Option<f64> {
        self.measure_index(measure).and_then(|i| row.values.get(i).copied())
    }

    /// Finds the row with exactly these keys.
    pub fn find(&self, keys: &[DimensionValue]) -> Option<&AggregateRow> {
        self.rows.iter().find(|row| row.keys == keys)
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

struct Group<'a> {
    key: GroupKey<'a>,
    accumulators: SmallVec<[Accumulator; 4]>,
    count: usize,
}

/// Filters `records` with `predicate` and aggregates the survivors
/// according to `spec`.
///
/// Groups appear in the order their first record appears. A group only
/// exists if at least one record reached it, so every reducer runs over
/// a non-empty set. Returns an empty table when nothing passes the filter.
pub fn aggregate(records: &[EnrichedRecord], predicate: &Predicate, spec: &GroupSpec) -> AggregateTable {
    let dimensions = spec.dimensions();
    let measures = spec.measures();

    let mut slots: FxHashMap<GroupKey<'_>, usize> = FxHashMap::default();
    let mut groups: Vec<Group<'_>> = Vec::new();

    for record in records.iter().filter(|r| predicate.matches(r)) {
        let key: GroupKey<'_> = dimensions.iter().map(|&d| KeyPart::of(record, d)).collect();

        match slots.get(&key) {
            Some(&slot) => {
                let group = &mut groups[slot];
                for (acc, measure) in group.accumulators.iter_mut().zip(measures) {
                    acc.add(measure.metric.value(&record.record));
                }
                group.count += 1;
            }
            None => {
                let accumulators = measures
                    .iter()
                    .map(|m| Accumulator::start(m.metric.value(&record.record)))
                    .collect();
                slots.insert(key.clone(), groups.len());
                groups.push(Group { key, accumulators, count: 1 });
            }
        }
    }

    let rows = groups
        .into_iter()
        .map(|group| AggregateRow {
            keys: group.key.iter().map(|part| part.to_value()).collect(),
            values: group
                .accumulators
                .iter()
                .zip(measures)
                .map(|(acc, measure)| acc.finish(measure))
                .collect(),
            count: group.count,
        })
        .collect();

    AggregateTable {
        dimensions: dimensions.to_vec(),
        measures: measures.to_vec(),
        rows,
    }
}

// ============================================================================
// DRILL DOWN
// ============================================================================

/// Source records behind one aggregate row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillDownResult {
    pub keys: Vec<DimensionValue>,
    /// Indices into the record slice, in input order, capped at `max_records`.
    pub record_indices: Vec<usize>,
    pub total_count: usize,
    pub max_records: usize,
    pub is_truncated: bool,
}

/// Lists the records that fed the group `keys` of an aggregation over
/// `dimensions`. Used to audit any value a view shows.
pub fn drill_down(
    records: &[EnrichedRecord],
    predicate: &Predicate,
    dimensions: &[Dimension],
    keys: &[DimensionValue],
    max_records: usize,
) -> DrillDownResult {
    let mut result = DrillDownResult {
        keys: keys.to_vec(),
        record_indices: Vec::new(),
        total_count: 0,
        max_records,
        is_truncated: false,
    };

    if dimensions.len() != keys.len() {
        return result;
    }

    for (index, record) in records.iter().enumerate() {
        if !predicate.matches(record) {
            continue;
        }
        let in_group = dimensions
            .iter()
            .zip(keys)
            .all(|(&d, key)| KeyPart::of(record, d).matches(key));
        if in_group {
            result.total_count += 1;
            if result.record_indices.len() < max_records {
                result.record_indices.push(index);
            }
        }
    }

    result.is_truncated = result.total_count > max_records;
    result
}
