//! Survey Datasets
//!
//! - **Types**: records, datasets and field mappings
//! - **Loader**: one-shot fetch and validation of the dataset document
//!
//! # Example
//!
//! ```rust,no_run
//! use healthboard::dataset::{DatasetLoader, DatasetSource, FieldMapping};
//!
//! # async fn run() -> Result<(), healthboard::dataset::LoadError> {
//! let loader = DatasetLoader::new(FieldMapping::chronic_disease());
//! let dataset = loader
//!     .load(&DatasetSource::parse("Chronic_Disease_Indicators_Avg.json"))
//!     .await?;
//! println!("{} records", dataset.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod loader;
mod types;

pub use error::{LoadError, LoadResult};
pub use loader::{parse_document, DatasetLoader, DatasetSource, Fetcher, FileFetcher, HttpFetcher};
pub use types::{Dataset, FieldMapping, Record, SeriesRole, SeriesSpec};
