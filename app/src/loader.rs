//! FILENAME: app/src/loader.rs
// PURPOSE: Reads the shopping trends CSV into records.
// CONTEXT: Columns are matched by header name; extra columns are ignored.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use dataset::{Record, Season};

use crate::{log_debug, log_info};

/// Header names the loader needs.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "Age",
    "Gender",
    "Item Purchased",
    "Category",
    "Purchase Amount (USD)",
    "Location",
    "Review Rating",
    "Season",
    "Previous Purchases",
];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("file not found: {path}")]
    FileNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("missing column \"{column}\" in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("CSV error in {path} at line {line}: {source}")]
    Csv {
        path: PathBuf,
        line: u64,
        source: csv::Error,
    },

    #[error("unknown season \"{raw}\" in {path} at line {line}")]
    UnknownSeason { path: PathBuf, line: u64, raw: String },

    #[error("non-finite {column} in {path} at line {line}: \"{raw}\"")]
    NonFiniteValue {
        path: PathBuf,
        line: u64,
        column: &'static str,
        raw: String,
    },
}

/// One CSV row as written in the source file.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Age")]
    age: u32,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Item Purchased")]
    item: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Purchase Amount (USD)")]
    purchase_amount: f64,
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Review Rating")]
    review_rating: f64,
    #[serde(rename = "Season")]
    season: String,
    #[serde(rename = "Previous Purchases")]
    previous_purchases: u32,
}

/// Loads every record from the CSV file at `path`.
pub fn load_records(path: &Path) -> Result<Vec<Record>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records(file, path)?;
    log_info!("LOAD", "loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parses CSV from any reader. `path` is only used in error messages.
pub fn read_records<R: Read>(reader: R, path: &Path) -> Result<Vec<Record>, LoadError> {
    let csv_error = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        line: source.position().map_or(0, |p| p.line()),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(csv_error)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }
    log_debug!("LOAD", "header ok, {} columns", headers.len());

    let mut records = Vec::new();
    for result in rdr.deserialize::<CsvRow>() {
        let row = result.map_err(csv_error)?;
        // header is line 1
        let line = records.len() as u64 + 2;

        let season: Season = row.season.parse().map_err(|_| LoadError::UnknownSeason {
            path: path.to_path_buf(),
            line,
            raw: row.season.clone(),
        })?;
        for (column, value) in [
            ("Review Rating", row.review_rating),
            ("Purchase Amount (USD)", row.purchase_amount),
        ] {
            if !value.is_finite() {
                return Err(LoadError::NonFiniteValue {
                    path: path.to_path_buf(),
                    line,
                    column,
                    raw: value.to_string(),
                });
            }
        }

        records.push(
            Record::new(row.gender, row.location, season, row.item, row.category)
                .with_age(row.age)
                .with_rating(row.review_rating)
                .with_amount(row.purchase_amount)
                .with_previous_purchases(row.previous_purchases),
        );
    }

    Ok(records)
}
