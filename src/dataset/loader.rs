//! Dataset Loader
//!
//! Fetches the dataset document once and turns it into a [`Dataset`].
//!
//! # Document shapes
//!
//! ```text
//! [ {record}, {record}, ... ]
//! { "names": [...], "records": [ {record}, ... ] }   // also "data" / "samples"
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

use super::error::{LoadError, LoadResult};
use super::types::{Dataset, FieldMapping, Record};

/// Keys under which a `names` document may carry its records
const RECORD_KEYS: [&str; 3] = ["records", "data", "samples"];

/// Where a dataset document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// Local file path
    File(PathBuf),
    /// Remote `http://` or `https://` URL
    Url(String),
}

impl DatasetSource {
    /// Classify a source string as a URL or a file path
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Common trait for the ways a dataset document can be fetched
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Read the raw document bytes
    async fn fetch(&self, source: &DatasetSource) -> LoadResult<Vec<u8>>;
}

/// Reads datasets from the local filesystem
#[derive(Debug, Default)]
pub struct FileFetcher;

#[async_trait]
impl Fetcher for FileFetcher {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self, source: &DatasetSource) -> LoadResult<Vec<u8>> {
        let path = match source {
            DatasetSource::File(path) => path.clone(),
            DatasetSource::Url(url) => PathBuf::from(url),
        };

        tokio::fs::read(&path)
            .await
            .map_err(|source| LoadError::Io { path, source })
    }
}

/// Fetches datasets over HTTP
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given request timeout
    pub fn new(timeout: Duration) -> LoadResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LoadError::Client)?;

        Ok(Self { client })
    }

    /// Create a fetcher around an existing client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, source: &DatasetSource) -> LoadResult<Vec<u8>> {
        let url = source.to_string();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| LoadError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| LoadError::Http { url, source })?;

        Ok(body.to_vec())
    }
}

/// Loads a dataset document and validates its records
pub struct DatasetLoader {
    mapping: FieldMapping,
    timeout: Duration,
}

impl DatasetLoader {
    /// Create a loader for the given field mapping
    pub fn new(mapping: FieldMapping) -> Self {
        Self {
            mapping,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the HTTP request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Fetch and parse the dataset
    pub async fn load(&self, source: &DatasetSource) -> LoadResult<Dataset> {
        let bytes = match source {
            DatasetSource::File(_) => self.load_with(&FileFetcher, source).await?,
            DatasetSource::Url(_) => {
                let fetcher = HttpFetcher::new(self.timeout)?;
                self.load_with(&fetcher, source).await?
            }
        };

        parse_document(&bytes, &self.mapping)
    }

    async fn load_with(&self, fetcher: &dyn Fetcher, source: &DatasetSource) -> LoadResult<Vec<u8>> {
        tracing::debug!(fetcher = fetcher.name(), source = %source, "Fetching dataset");
        fetcher.fetch(source).await
    }
}

/// Parse a dataset document
///
/// Source objects without a usable location, topic or year are skipped and
/// counted; the load only fails if none survive.
pub fn parse_document(bytes: &[u8], mapping: &FieldMapping) -> LoadResult<Dataset> {
    let document: Value = serde_json::from_slice(bytes)?;

    let (items, names) = match document {
        Value::Array(items) => (items, None),
        Value::Object(mut object) => {
            let names = match object.remove("names") {
                None => None,
                Some(Value::Array(values)) => Some(
                    values
                        .into_iter()
                        .map(|v| match v {
                            Value::String(s) => s,
                            other => other.to_string(),
                        })
                        .collect::<Vec<_>>(),
                ),
                Some(other) => {
                    return Err(LoadError::UnsupportedShape(format!(
                        "names must be an array, found {}",
                        json_kind(&other)
                    )))
                }
            };

            let items = RECORD_KEYS
                .iter()
                .find_map(|key| match object.remove(*key) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                })
                .ok_or_else(|| {
                    LoadError::UnsupportedShape(format!(
                        "object without a {} array",
                        RECORD_KEYS.join("/")
                    ))
                })?;

            (items, names)
        }
        other => {
            return Err(LoadError::UnsupportedShape(format!(
                "expected an array or object, found {}",
                json_kind(&other)
            )))
        }
    };

    if items.is_empty() {
        return Err(LoadError::Empty);
    }

    let total = items.len();
    let records: Vec<Record> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(fields) => Record::from_fields(fields, mapping),
            _ => None,
        })
        .collect();

    let skipped = total - records.len();
    if records.is_empty() {
        return Err(LoadError::NoValidRecords { skipped });
    }
    if skipped > 0 {
        tracing::warn!(
            skipped,
            location_field = %mapping.location,
            topic_field = %mapping.topic,
            year_field = %mapping.year,
            "Skipped records without location, topic or year"
        );
    }

    tracing::info!(records = records.len(), skipped, "Dataset loaded");

    let dataset = Dataset::new(records)?;
    Ok(match names {
        Some(names) => dataset.with_names(names),
        None => dataset,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
