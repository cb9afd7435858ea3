/// Error types for the airport traffic core
use chrono::NaiveDate;
use thiserror::Error;

/// Fatal errors raised while loading the dataset or the region boundaries.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Reading the source failed
    #[error("Failed to read data source: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// A required header is absent
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// Date parsing failed
    #[error("Failed to parse date {value:?} on line {line} (expected DD/MM/YYYY)")]
    DateParse { line: u64, value: String },

    /// A flight count is not a non-negative integer
    #[error("Invalid flight count {value:?} in column {column} on line {line}")]
    InvalidCount {
        line: u64,
        column: &'static str,
        value: String,
    },

    /// The table has a header but no rows
    #[error("Dataset contains no records")]
    Empty,

    /// Failed to parse GeoJSON
    #[error("Failed to parse GeoJSON: {0}")]
    GeoJson(#[from] serde_json::Error),

    /// Writing the records into the in-memory store failed
    #[error("Failed to build the flight store: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

/// Failures of a query against the loaded flight store.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Flight store query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Filter selections that cannot be honoured as given.
///
/// These never abort a query: callers either reject the input at the UI
/// boundary or recover with an empty result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidFilterError {
    #[error("End date {end} is before start date {start}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Unknown movement type: {0:?} (expected Arrival, Departure or Both)")]
    UnknownMovement(String),

    #[error("Unknown data source: {0:?} (expected NM or APT)")]
    UnknownSource(String),
}

/// Type alias for Results using DataLoadError
pub type Result<T> = std::result::Result<T, DataLoadError>;

/// Type alias for Results using QueryError
pub type QueryResult<T> = std::result::Result<T, QueryError>;
