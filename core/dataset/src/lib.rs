//! FILENAME: core/dataset/src/lib.rs
//! Dataset subsystem for the Shopping Trends dashboard.
//!
//! This crate owns the transaction records and the derived dimensions.
//! It performs no I/O; records arrive already parsed.
//!
//! Layers:
//! - `record`: Raw transaction rows (what the source file contains)
//! - `lookup`: Static region table and age-band boundaries
//! - `enrich`: One-time derivation of region codes and age bands
//! - `store`: The immutable, shared `Dataset` handle

pub mod error;
pub mod record;
pub mod lookup;
pub mod enrich;
pub mod store;

pub use error::LookupError;
pub use record::{Record, Season};
pub use lookup::{AgeBand, AgeBands, RegionCode, RegionTable, MISSING_REGION_LABEL};
pub use enrich::{enrich_records, EnrichedRecord, EnrichmentReport};
pub use store::Dataset;
