//! # Healthboard
//!
//! Query and projection engine behind the public-health survey dashboards:
//! load a survey dataset, pick a location and a topic, and get the matching
//! records ordered by year, projected into chart-ready series.
//!
//! ## Modules
//!
//! - [`dataset`]: Records, field mappings and the dataset loader
//! - [`query`]: Filter options, selection state, query engine and projection
//! - [`session`]: Dashboard session driving an observer
//! - [`chart`]: Chart frames and renderers
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use healthboard::chart::{ChartBinding, ChartKind, TableRenderer};
//! use healthboard::dataset::{DatasetLoader, DatasetSource, FieldMapping};
//! use healthboard::query::QueryOptions;
//! use healthboard::session::DashboardSession;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = DatasetLoader::new(FieldMapping::nutrition());
//!     let source = DatasetSource::parse("nutrition_obesity_cleaned.json");
//!     let binding = ChartBinding::new(ChartKind::Line, TableRenderer::new(std::io::stdout()));
//!
//!     // Loads, publishes options and draws the default selection
//!     let mut session =
//!         DashboardSession::start(&loader, &source, QueryOptions::new(), binding).await?;
//!
//!     // Redraws the chart in place
//!     let update = session.select("AL", "Obesity")?;
//!     println!("{} years plotted", update.projection.len());
//!
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod config;
pub mod dataset;
pub mod query;
pub mod session;

// Re-export top-level types for convenience
pub use dataset::{
    Dataset, DatasetLoader, DatasetSource, FieldMapping, LoadError, LoadResult, Record,
    SeriesRole, SeriesSpec,
};

pub use query::{
    query, project, Dimension, EngineResult, FilterOptions, Projection, QueryEngine, QueryError,
    QueryOptions, QueryResult, Selection, SelectionState, Series, YearRange,
};

pub use session::{
    ChartUpdate, DashboardObserver, DashboardSession, Notification, NotificationLevel,
    RecordSummary, SessionError, SessionResult,
};

pub use chart::{ChartBinding, ChartFrame, ChartKind, ChartRenderer, RenderError, RenderMode};

pub use config::{Config, ConfigError};
