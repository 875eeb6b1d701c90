use crate::types::LeafKey;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a tabular source into rate tables.
///
/// Any of these aborts the whole import; the tables already held by the
/// session stay as they were.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("required columns missing from the table: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("columns given more than once in the header: {}", .0.join(", "))]
    DuplicateColumns(Vec<String>),

    #[error("row {row}: `{column}` is empty")]
    MissingValue { row: usize, column: &'static str },

    #[error("row {row}: `{column}` is not a number: {value:?}")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why an estimate was refused. Nothing is recorded when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("incomplete selection: choose city, region, housing type, supply type and scale")]
    IncompleteSelection,

    #[error("invalid unit count {0}: must be 1 or more")]
    InvalidUnitCount(i64),

    #[error("no yield rate configured for combination {0}")]
    NoYieldRate(LeafKey),

    #[error("no high-school occupancy configured for combination {0}")]
    NoHighSchoolRate(LeafKey),
}

impl Rejection {
    /// True when the selection itself was fine but the table lacks data for it.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, Self::NoYieldRate(_) | Self::NoHighSchoolRate(_))
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("rate table file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rate table json in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("saved file {} does not match the table in memory", .0.display())]
    VerifyMismatch(PathBuf),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
