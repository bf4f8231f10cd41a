//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::chart::ChartKind;
use crate::dataset::{DatasetSource, FieldMapping};
use crate::query::{QueryOptions, YearRange};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Explicit field mapping; overrides `dataset.preset` when present
    #[serde(default)]
    pub fields: Option<FieldMapping>,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dataset source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// File path or http(s) URL of the dataset document
    #[serde(default = "default_source")]
    pub source: String,

    /// Field mapping preset (nutrition, chronic_disease, nutrition_by_location)
    #[serde(default = "default_preset")]
    pub preset: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_source() -> String {
    "nutrition_obesity_cleaned.json".to_string()
}

fn default_preset() -> String {
    "nutrition".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            preset: default_preset(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Query configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryConfig {
    /// Earliest year to include (inclusive)
    pub year_min: Option<i32>,

    /// Latest year to include (inclusive)
    pub year_max: Option<i32>,
}

/// Chart configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default)]
    pub kind: ChartKind,

    /// Output format: table, csv or json
    #[serde(default = "default_chart_format")]
    pub format: String,
}

fn default_chart_format() -> String {
    "table".to_string()
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            kind: ChartKind::default(),
            format: default_chart_format(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// A config file that exists but fails to load is an error.
    pub fn load_default() -> Result<Self, ConfigError> {
        // Try default config locations
        let config_paths = [
            dirs::config_dir().map(|p| p.join("healthboard").join("config.toml")),
            Some(PathBuf::from("./healthboard.toml")),
        ];

        Self::load_first(config_paths.iter().flatten())
    }

    /// Load the first existing file in `paths`, else environment-only config
    fn load_first<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> Result<Self, ConfigError> {
        for path in paths {
            if path.exists() {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                return Ok(config);
            }
        }

        // Fall back to environment-only config
        tracing::info!("Using default config with environment overrides");
        Ok(Self::from_env())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Dataset overrides
        if let Ok(source) = std::env::var("HEALTHBOARD_DATASET") {
            self.dataset.source = source;
        }
        if let Ok(preset) = std::env::var("HEALTHBOARD_PRESET") {
            self.dataset.preset = preset;
            self.fields = None;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("HEALTHBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("HEALTHBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Resolve the field mapping: explicit `[fields]` first, then the preset
    pub fn field_mapping(&self) -> Result<FieldMapping, ConfigError> {
        if let Some(fields) = &self.fields {
            return Ok(fields.clone());
        }
        FieldMapping::preset(&self.dataset.preset)
            .ok_or_else(|| ConfigError::UnknownPreset(self.dataset.preset.clone()))
    }

    /// Build query options from the `[query]` section
    pub fn query_options(&self) -> Result<QueryOptions, ConfigError> {
        let range = YearRange::between(self.query.year_min, self.query.year_max)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(QueryOptions { year_range: range })
    }

    pub fn dataset_source(&self) -> DatasetSource {
        DatasetSource::parse(&self.dataset.source)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.dataset.request_timeout_secs)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Unknown field preset {0:?} (expected one of: nutrition, chronic_disease, nutrition_by_location)")]
    UnknownPreset(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Healthboard Configuration
#
# Environment variables override these settings:
# - HEALTHBOARD_DATASET
# - HEALTHBOARD_PRESET
# - HEALTHBOARD_LOG_LEVEL
# - HEALTHBOARD_LOG_FORMAT

[dataset]
# Dataset document: a local path or an http(s) URL
source = "nutrition_obesity_cleaned.json"

# Field mapping preset: nutrition, chronic_disease, nutrition_by_location
preset = "nutrition"

# Timeout for remote datasets (seconds)
request_timeout_secs = 30

[query]
# Inclusive year range; omit either bound to leave it open
year_min = 2011
year_max = 2021

[chart]
# Chart type: bar, line, bubble
kind = "bar"

# Output format: table, csv, json
format = "table"

# Explicit field mapping (replaces the preset)
# [fields]
# location = "LocationDesc"
# topic = "CDI_Topic"
# year = "YearEnd"
#
# [[fields.series]]
# label = "Avg CDI Data Value"
# field = "avg_CDI_DataValue"
# role = "value"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/healthboard/healthboard.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::SeriesRole;

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();

        assert_eq!(config.dataset.preset, "nutrition");
        assert_eq!(config.chart.kind, ChartKind::Bar);
        assert_eq!(config.field_mapping().unwrap(), FieldMapping::nutrition());

        let range = config.query_options().unwrap().year_range.unwrap();
        assert_eq!((range.lower(), range.upper()), (2011, 2021));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.dataset.source, "nutrition_obesity_cleaned.json");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.logging.level, "info");
        assert!(config.query_options().unwrap().year_range.is_none());
    }

    #[test]
    fn test_explicit_fields_override_preset() {
        let config = Config::parse(
            r#"
            [dataset]
            source = "https://example.org/cdi.json"
            preset = "nutrition"

            [fields]
            location = "LocationDesc"
            topic = "CDI_Topic"
            year = "YearEnd"

            [[fields.series]]
            label = "Avg CDI Data Value"
            field = "avg_CDI_DataValue"

            [[fields.series]]
            label = "Sample"
            field = "Sample_Size"
            role = "sample_size"

            [chart]
            kind = "line"
            "#,
        )
        .unwrap();

        let mapping = config.field_mapping().unwrap();
        assert_eq!(mapping.location, "LocationDesc");
        assert_eq!(mapping.series.len(), 2);
        assert_eq!(mapping.series[0].role, SeriesRole::Value);
        assert_eq!(mapping.series[1].role, SeriesRole::SampleSize);
        assert_eq!(config.chart.kind, ChartKind::Line);
        assert!(matches!(config.dataset_source(), DatasetSource::Url(_)));
    }

    #[test]
    fn test_unknown_preset() {
        let config = Config::parse("[dataset]\npreset = \"tobacco\"").unwrap();
        assert!(matches!(
            config.field_mapping(),
            Err(ConfigError::UnknownPreset(name)) if name == "tobacco"
        ));
    }

    #[test]
    fn test_inverted_year_range_rejected() {
        let config = Config::parse("[query]\nyear_min = 2021\nyear_max = 2011").unwrap();
        assert!(matches!(config.query_options(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_first_reports_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let broken = dir.path().join("healthboard.toml");
        std::fs::write(&broken, "[dataset\nsource = \"d.json\"").unwrap();

        let err = Config::load_first([&missing, &broken]).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path, .. } if path == broken));
    }

    #[test]
    fn test_load_first_uses_first_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let first = dir.path().join("first.toml");
        let second = dir.path().join("second.toml");
        std::fs::write(&first, "[dataset]\nrequest_timeout_secs = 5").unwrap();
        std::fs::write(&second, "[dataset]\nrequest_timeout_secs = 9").unwrap();

        let config = Config::load_first([&missing, &first, &second]).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(5));

        let config = Config::load_first([&missing]).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::parse("[dataset\nsource = 1"),
            Err(ConfigError::Parse { .. })
        ));
    }
}
