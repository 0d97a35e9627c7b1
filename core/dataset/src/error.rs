//! FILENAME: core/dataset/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Unknown season: {0}")]
    UnknownSeason(String),

    #[error("Invalid age band layout: start={start} end={end} width={width}")]
    InvalidAgeBands { start: u32, end: u32, width: u32 },
}
