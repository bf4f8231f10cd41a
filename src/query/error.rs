//! Query error types
//!
//! Defines all error conditions that can occur while deriving options,
//! changing the selection, running a query or projecting its result.

use serde::Serialize;
use thiserror::Error;

/// The two categorical dimensions a user selects on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Location,
    Topic,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Location => write!(f, "location"),
            Self::Topic => write!(f, "topic"),
        }
    }
}

/// Errors that can occur during query operations
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryError {
    /// Dataset has no usable values for a dimension
    #[error("Data missing for {0}: dataset has no usable values")]
    EmptyOptions(Dimension),

    /// Requested value is not one of the available options
    #[error("Invalid {dimension} selection: {value:?} is not an available option")]
    InvalidSelection { dimension: Dimension, value: String },

    /// A valid selection matched zero records
    #[error("No data available for {topic} in {location}")]
    NoData { location: String, topic: String },

    /// A record lacks a field the active projection needs
    #[error("Missing {field} for year {year} (row {position})")]
    MissingField {
        field: String,
        year: i32,
        position: usize,
    },

    /// Year range bounds are inverted
    #[error("Invalid year range: {lower} is after {upper}")]
    InvalidYearRange { lower: i32, upper: i32 },
}

impl QueryError {
    /// Whether the session cannot continue after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::EmptyOptions(_))
    }
}

/// Result type for query operations
pub type EngineResult<T> = Result<T, QueryError>;
