//! Dataset loading error types
//!
//! Every failure here is fatal for a dashboard session: nothing is
//! initialised when loading fails.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a dataset
#[derive(Error, Debug)]
pub enum LoadError {
    /// Local file could not be read
    #[error("Failed to read dataset {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport failure while fetching a remote dataset
    #[error("Failed to fetch dataset {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Remote dataset answered with a non-success status
    #[error("HTTP error fetching {url}: status {status}")]
    Status { url: String, status: u16 },

    /// Document is not valid JSON
    #[error("Malformed dataset JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Document is JSON but not an array or a `names` object
    #[error("Unsupported dataset document: {0}")]
    UnsupportedShape(String),

    /// Document holds no records at all
    #[error("No data found in dataset")]
    Empty,

    /// Every record lacked a usable location, topic or year
    #[error("No usable records in dataset ({skipped} skipped)")]
    NoValidRecords { skipped: usize },
}

/// Result type alias for dataset loading
pub type LoadResult<T> = Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoadError::Status {
            url: "http://localhost/data.json".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "HTTP error fetching http://localhost/data.json: status 404"
        );

        assert_eq!(LoadError::Empty.to_string(), "No data found in dataset");
        assert_eq!(
            LoadError::NoValidRecords { skipped: 3 }.to_string(),
            "No usable records in dataset (3 skipped)"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("[{").unwrap_err();
        let load_err: LoadError = json_err.into();
        assert!(matches!(load_err, LoadError::Parse(_)));
    }
}
