#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the processed cherry tree inventory.
//!
//! The input is the CSV written by the offline preprocessing step (raw
//! street-tree export joined against the cultivar bloom-period table).
//! Loading happens once at startup; the resulting [`Dataset`] is shared
//! read-only for the rest of the process.

pub mod parsing;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use blossom_map_tree_models::{Dataset, TreeRecord, title_case};
use thiserror::Error;

/// Columns the loader requires in the header row.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "TREE_ID",
    "CULTIVAR_NAME",
    "COMMON_NAME",
    "NEIGHBOURHOOD_NAME",
    "DIAMETER",
    "BLOOM_START",
    "BLOOM_END",
    "lat",
    "lon",
];

/// Errors that can occur while loading the tree inventory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened.
    #[error("Failed to open {path}: {source}")]
    Open {
        /// Path that was opened.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// CSV framing or I/O failed while reading rows.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("Missing required column: {column}")]
    MissingColumn {
        /// Column name.
        column: String,
    },

    /// A cell could not be parsed into its column's type.
    #[error("Invalid {column} value '{value}' on line {line}: {message}")]
    InvalidValue {
        /// Column name.
        column: String,
        /// The raw cell text.
        value: String,
        /// 1-based line number in the file.
        line: u64,
        /// Description of what went wrong.
        message: String,
    },
}

/// Loads the tree inventory from a CSV file.
///
/// # Errors
///
/// Returns [`LoadError`] if the file is missing, a required column is
/// absent, or a value cannot be parsed.
pub fn load(path: &Path) -> Result<Dataset, LoadError> {
    log::info!("Loading tree inventory from {}", path.display());

    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let dataset = load_from_reader(file)?;
    log::info!("Loaded {} trees", dataset.len());
    Ok(dataset)
}

/// Loads the tree inventory from any CSV reader.
///
/// # Errors
///
/// Returns [`LoadError`] if a required column is absent or a value cannot
/// be parsed.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(csv_reader.headers()?)?;

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result?;
        records.push(columns.parse_row(&row)?);
    }

    Ok(Dataset::new(records))
}

/// Positions of the required columns in the header row.
struct ColumnIndex {
    tree_id: usize,
    cultivar_name: usize,
    common_name: usize,
    neighbourhood_name: usize,
    diameter: usize,
    bloom_start: usize,
    bloom_end: usize,
    lat: usize,
    lon: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| LoadError::MissingColumn {
                    column: column.to_string(),
                })
        };

        Ok(Self {
            tree_id: find("TREE_ID")?,
            cultivar_name: find("CULTIVAR_NAME")?,
            common_name: find("COMMON_NAME")?,
            neighbourhood_name: find("NEIGHBOURHOOD_NAME")?,
            diameter: find("DIAMETER")?,
            bloom_start: find("BLOOM_START")?,
            bloom_end: find("BLOOM_END")?,
            lat: find("lat")?,
            lon: find("lon")?,
        })
    }

    fn parse_row(&self, row: &csv::StringRecord) -> Result<TreeRecord, LoadError> {
        let line = row.position().map_or(0, csv::Position::line);
        let cell = |idx: usize| row.get(idx).filter(|s| !s.is_empty());
        let invalid = |column: &str, value: &str, message: String| LoadError::InvalidValue {
            column: column.to_string(),
            value: value.to_string(),
            line,
            message,
        };

        let raw_id = cell(self.tree_id).unwrap_or_default();
        let tree_id = parsing::parse_tree_id(raw_id)
            .ok_or_else(|| invalid("TREE_ID", raw_id, "expected an integer".to_string()))?;

        let float = |column: &str, idx: usize| {
            cell(idx)
                .map(|s| {
                    s.parse::<f64>()
                        .map_err(|e| invalid(column, s, e.to_string()))
                })
                .transpose()
        };

        let date = |column: &str, idx: usize| {
            cell(idx)
                .map(|s| parsing::parse_bloom_date(s).map_err(|e| invalid(column, s, e.to_string())))
                .transpose()
        };

        Ok(TreeRecord {
            tree_id,
            common_name: cell(self.common_name).map(title_case),
            cultivar_name: cell(self.cultivar_name).map(title_case),
            neighbourhood_name: cell(self.neighbourhood_name).map(title_case),
            diameter: float("DIAMETER", self.diameter)?,
            bloom_start: date("BLOOM_START", self.bloom_start)?,
            bloom_end: date("BLOOM_END", self.bloom_end)?,
            lat: float("lat", self.lat)?,
            lon: float("lon", self.lon)?,
        })
    }
}
