//! FILENAME: core/aggregate-engine/src/definition.rs
//! Group Spec Definition - the declarative grouping + reduction config.
//!
//! This module contains all the types needed to DESCRIBE an aggregation.
//! These structures are designed to be:
//! - Serializable (views can be described in config or sent to a renderer)
//! - Validated once at construction, never re-interpreted per call
//! - Immutable snapshots of a view's intent

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use dataset::Record;

use crate::error::SpecError;

// ============================================================================
// DIMENSIONS
// ============================================================================

/// A field records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// Full region name ("Location" in the source).
    Region,
    /// Derived region code.
    RegionCode,
    Season,
    Gender,
    Item,
    Category,
    /// Derived age band.
    AgeBand,
}

impl Dimension {
    /// Column header used when the dimension is displayed.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Region => "Location",
            Dimension::RegionCode => "State Code",
            Dimension::Season => "Season",
            Dimension::Gender => "Gender",
            Dimension::Item => "Item Purchased",
            Dimension::Category => "Category",
            Dimension::AgeBand => "Age Group",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Dimension {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "region" | "location" | "state" => Ok(Dimension::Region),
            "region_code" | "state_code" | "state_abbr" => Ok(Dimension::RegionCode),
            "season" => Ok(Dimension::Season),
            "gender" => Ok(Dimension::Gender),
            "item" | "item_purchased" => Ok(Dimension::Item),
            "category" => Ok(Dimension::Category),
            "age_band" | "age_group" => Ok(Dimension::AgeBand),
            _ => Err(SpecError::UnknownDimension(s.to_string())),
        }
    }
}

// ============================================================================
// METRICS
// ============================================================================

/// A numeric record field that can be reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Age,
    ReviewRating,
    PurchaseAmount,
    PreviousPurchases,
}

impl Metric {
    pub fn value(&self, record: &Record) -> f64 {
        match self {
            Metric::Age => f64::from(record.age),
            Metric::ReviewRating => record.review_rating,
            Metric::PurchaseAmount => record.purchase_amount,
            Metric::PreviousPurchases => f64::from(record.previous_purchases),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Age => "Age",
            Metric::ReviewRating => "Review Rating",
            Metric::PurchaseAmount => "Purchase Amount (USD)",
            Metric::PreviousPurchases => "Previous Purchases",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "age" => Ok(Metric::Age),
            "review_rating" | "rating" => Ok(Metric::ReviewRating),
            "purchase_amount" | "purchase_amount_(usd)" | "amount" => Ok(Metric::PurchaseAmount),
            "previous_purchases" => Ok(Metric::PreviousPurchases),
            _ => Err(SpecError::UnknownMetric(s.to_string())),
        }
    }
}

// ============================================================================
// REDUCERS
// ============================================================================

/// Supported reduction functions. All of them are only ever applied to
/// non-empty groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reducer {
    Mean,
    Sum,
    Count,
    Min,
    Max,
}

impl Reducer {
    pub fn label(&self) -> &'static str {
        match self {
            Reducer::Mean => "Mean",
            Reducer::Sum => "Sum",
            Reducer::Count => "Count",
            Reducer::Min => "Min",
            Reducer::Max => "Max",
        }
    }
}

impl fmt::Display for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Reducer {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "mean" | "average" | "avg" => Ok(Reducer::Mean),
            "sum" => Ok(Reducer::Sum),
            "count" => Ok(Reducer::Count),
            "min" => Ok(Reducer::Min),
            "max" => Ok(Reducer::Max),
            _ => Err(SpecError::UnknownReducer(s.to_string())),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

// ============================================================================
// MEASURES
// ============================================================================

/// A (metric, reducer) pair, e.g. "Mean of Review Rating".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measure {
    pub metric: Metric,
    pub reducer: Reducer,
}

impl Measure {
    pub fn new(metric: Metric, reducer: Reducer) -> Self {
        Measure { metric, reducer }
    }

    pub fn mean(metric: Metric) -> Self {
        Measure::new(metric, Reducer::Mean)
    }

    pub fn sum(metric: Metric) -> Self {
        Measure::new(metric, Reducer::Sum)
    }

    pub fn count(metric: Metric) -> Self {
        Measure::new(metric, Reducer::Count)
    }

    /// Parses a measure from its metric and reducer names.
    pub fn parse(metric: &str, reducer: &str) -> Result<Self, SpecError> {
        Ok(Measure::new(metric.parse()?, reducer.parse()?))
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.reducer, self.metric)
    }
}

// ============================================================================
// GROUP SPEC
// ============================================================================

/// Ordered grouping dimensions plus the measures computed per group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGroupSpec", into = "RawGroupSpec")]
pub struct GroupSpec {
    dimensions: Vec<Dimension>,
    measures: Vec<Measure>,
}

impl GroupSpec {
    /// Validates and creates a spec.
    ///
    /// Rejects duplicate dimensions, duplicate measures and an empty measure
    /// list. An empty dimension list is allowed and produces at most one
    /// (grand total) row.
    pub fn new(dimensions: Vec<Dimension>, measures: Vec<Measure>) -> Result<Self, SpecError> {
        for (i, dim) in dimensions.iter().enumerate() {
            if dimensions[..i].contains(dim) {
                return Err(SpecError::DuplicateDimension(*dim));
            }
        }
        if measures.is_empty() {
            return Err(SpecError::NoMeasures);
        }
        for (i, measure) in measures.iter().enumerate() {
            if measures[..i].contains(measure) {
                return Err(SpecError::DuplicateMeasure(*measure));
            }
        }
        Ok(GroupSpec { dimensions, measures })
    }

    /// Builds a spec from field-name strings, e.g. `["region", "season"]`
    /// and `[("review_rating", "mean")]`.
    pub fn parse(dimensions: &[&str], measures: &[(&str, &str)]) -> Result<Self, SpecError> {
        let dimensions = dimensions
            .iter()
            .map(|d| d.parse())
            .collect::<Result<Vec<Dimension>, _>>()?;
        let measures = measures
            .iter()
            .map(|(metric, reducer)| Measure::parse(metric, reducer))
            .collect::<Result<Vec<Measure>, _>>()?;
        GroupSpec::new(dimensions, measures)
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    pub fn dimension_index(&self, dimension: Dimension) -> Option<usize> {
        self.dimensions.iter().position(|d| *d == dimension)
    }

    pub fn measure_index(&self, measure: Measure) -> Option<usize> {
        self.measures.iter().position(|m| *m == measure)
    }

    /// The same spec with one dimension dropped.
    pub fn without(&self, dimension: Dimension) -> Result<Self, SpecError> {
        if !self.dimensions.contains(&dimension) {
            return Err(SpecError::MissingDimension(dimension));
        }
        let dimensions = self
            .dimensions
            .iter()
            .copied()
            .filter(|d| *d != dimension)
            .collect();
        GroupSpec::new(dimensions, self.measures.clone())
    }
}

/// Unvalidated wire form of a `GroupSpec`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawGroupSpec {
    dimensions: Vec<Dimension>,
    measures: Vec<Measure>,
}

impl TryFrom<RawGroupSpec> for GroupSpec {
    type Error = SpecError;

    fn try_from(raw: RawGroupSpec) -> Result<Self, Self::Error> {
        GroupSpec::new(raw.dimensions, raw.measures)
    }
}

impl From<GroupSpec> for RawGroupSpec {
    fn from(spec: GroupSpec) -> Self {
        RawGroupSpec {
            dimensions: spec.dimensions,
            measures: spec.measures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_spec() {
        let spec = GroupSpec::new(
            vec![Dimension::Region, Dimension::Season],
            vec![Measure::mean(Metric::ReviewRating)],
        )
        .unwrap();
        assert_eq!(spec.dimensions(), &[Dimension::Region, Dimension::Season]);
        assert_eq!(spec.dimension_index(Dimension::Season), Some(1));
        assert_eq!(spec.measure_index(Measure::mean(Metric::ReviewRating)), Some(0));
    }

    #[test]
    fn test_duplicate_dimension_rejected() {
        let err = GroupSpec::new(
            vec![Dimension::Item, Dimension::Item],
            vec![Measure::mean(Metric::ReviewRating)],
        )
        .unwrap_err();
        assert_eq!(err, SpecError::DuplicateDimension(Dimension::Item));
    }

    #[test]
    fn test_duplicate_measure_rejected() {
        let err = GroupSpec::new(
            vec![Dimension::Item],
            vec![Measure::sum(Metric::PurchaseAmount), Measure::sum(Metric::PurchaseAmount)],
        )
        .unwrap_err();
        assert_eq!(err, SpecError::DuplicateMeasure(Measure::sum(Metric::PurchaseAmount)));
    }

    #[test]
    fn test_no_measures_rejected() {
        assert_eq!(
            GroupSpec::new(vec![Dimension::Item], Vec::new()).unwrap_err(),
            SpecError::NoMeasures
        );
    }

    #[test]
    fn test_parse_from_names() {
        let spec = GroupSpec::parse(
            &["Location", "season"],
            &[("Review Rating", "mean"), ("previous purchases", "sum")],
        )
        .unwrap();
        assert_eq!(spec.dimensions(), &[Dimension::Region, Dimension::Season]);
        assert_eq!(spec.measures()[1], Measure::sum(Metric::PreviousPurchases));
    }

    #[test]
    fn test_parse_rejects_unknown_reducer() {
        let err = GroupSpec::parse(&["item"], &[("review_rating", "median")]).unwrap_err();
        assert_eq!(err, SpecError::UnknownReducer("median".to_string()));
    }

    #[test]
    fn test_parse_rejects_unknown_dimension() {
        let err = GroupSpec::parse(&["zip"], &[("review_rating", "mean")]).unwrap_err();
        assert_eq!(err, SpecError::UnknownDimension("zip".to_string()));
    }

    #[test]
    fn test_without_drops_dimension() {
        let spec = GroupSpec::new(
            vec![Dimension::AgeBand, Dimension::Gender],
            vec![Measure::mean(Metric::ReviewRating)],
        )
        .unwrap();
        let pooled = spec.without(Dimension::Gender).unwrap();
        assert_eq!(pooled.dimensions(), &[Dimension::AgeBand]);
        assert_eq!(pooled.measures(), spec.measures());
        assert_eq!(
            pooled.without(Dimension::Gender).unwrap_err(),
            SpecError::MissingDimension(Dimension::Gender)
        );
    }

    #[test]
    fn test_measure_display() {
        assert_eq!(Measure::mean(Metric::ReviewRating).to_string(), "Mean of Review Rating");
    }
}
