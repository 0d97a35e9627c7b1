//! FILENAME: core/aggregate-engine/src/lib.rs
//! Filter + aggregation subsystem for the Shopping Trends dashboard.
//!
//! This crate is a pure computation core. It depends on `dataset` only for
//! the enriched record type and performs no I/O.
//!
//! Layers:
//! - `definition`: Validated grouping + reduction specs (what a view asks for)
//! - `filter`: FilterState and per-clause predicates (which records count)
//! - `engine`: Grouping and reduction (HOW we calculate)

pub mod error;
pub mod definition;
pub mod filter;
pub mod engine;

pub use error::SpecError;
pub use definition::*;
pub use filter::{compile, Condition, FilterClause, FilterInputs, FilterState, Predicate};
pub use engine::{aggregate, drill_down, AggregateRow, AggregateTable, DimensionValue, DrillDownResult};
