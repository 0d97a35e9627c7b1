//! FILENAME: core/aggregate-engine/src/error.rs

use thiserror::Error;

use crate::definition::{Dimension, Measure};

/// Rejections raised while building a `GroupSpec`.
/// Aggregation itself never fails once a spec exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("Dimension listed twice: {0}")]
    DuplicateDimension(Dimension),

    #[error("Measure listed twice: {0}")]
    DuplicateMeasure(Measure),

    #[error("A group spec needs at least one measure")]
    NoMeasures,

    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Unsupported reducer: {0}")]
    UnknownReducer(String),

    #[error("Dimension {0} is not part of the group spec")]
    MissingDimension(Dimension),
}
