//! Dashboard Session
//!
//! The context object behind one dashboard page: it owns the dataset, the
//! selection state and the last successful result, and drives the observer.
//!
//! # Lifecycle
//!
//! ```text
//! load ──► initialize selection ──► on_options_ready ──► query ──► on_query_result
//!                                                          ▲
//!                         set_location / set_topic ────────┘
//! ```
//!
//! The dataset is written once, by [`DashboardSession::open`]. The selection
//! is written only by the mutators, which take `&mut self`; a run always
//! completes before the next change can be applied.

mod error;
mod observer;
mod panel;

pub use error::{SessionError, SessionResult};
pub use observer::{DashboardObserver, LogObserver, Notification, NotificationLevel};
pub use panel::{RecordSummary, SummaryValue};

use serde::Serialize;

use crate::dataset::{Dataset, DatasetLoader, DatasetSource, SeriesSpec};
use crate::query::{
    project, FilterOptions, Projection, QueryEngine, QueryError, QueryOptions, Selection,
    SelectionState,
};

/// Everything a renderer needs for one successful query run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartUpdate {
    pub selection: Selection,
    pub projection: Projection,
    /// Missing values, reported per series
    pub missing: Vec<QueryError>,
    /// Info panel for the earliest matching record
    pub summary: RecordSummary,
}

/// One dashboard page worth of state
pub struct DashboardSession<O: DashboardObserver> {
    dataset: Dataset,
    state: SelectionState,
    engine: QueryEngine,
    series: Vec<SeriesSpec>,
    observer: O,
    last_update: Option<ChartUpdate>,
    runs: usize,
}

impl<O: DashboardObserver> DashboardSession<O> {
    /// Load the dataset, publish the options and run the initial query
    ///
    /// A default selection with no data is reported through the observer
    /// but does not fail the session.
    pub async fn start(
        loader: &DatasetLoader,
        source: &DatasetSource,
        options: QueryOptions,
        observer: O,
    ) -> SessionResult<Self> {
        let mut session = Self::open(loader, source, options, observer).await?;
        if let Err(e) = session.refresh() {
            if !matches!(e, SessionError::Query(QueryError::NoData { .. })) {
                return Err(e);
            }
        }
        Ok(session)
    }

    /// Load the dataset and publish the options without querying
    pub async fn open(
        loader: &DatasetLoader,
        source: &DatasetSource,
        options: QueryOptions,
        mut observer: O,
    ) -> SessionResult<Self> {
        tracing::info!(source = %source, "Loading dataset");

        let dataset = match loader.load(source).await {
            Ok(dataset) => dataset,
            Err(e) => {
                tracing::error!(source = %source, error = %e, "Failed to load dataset");
                observer.notify(&Notification::error(format!("Failed to load data: {}", e)));
                return Err(e.into());
            }
        };

        Self::from_dataset(dataset, loader.mapping().series.clone(), options, observer)
    }

    /// Build a session over an already loaded dataset
    pub fn from_dataset(
        dataset: Dataset,
        series: Vec<SeriesSpec>,
        options: QueryOptions,
        mut observer: O,
    ) -> SessionResult<Self> {
        let state = match SelectionState::initialize(&dataset) {
            Ok(state) => state,
            Err(e) => {
                observer.notify(&Notification::error(e.to_string()));
                return Err(e.into());
            }
        };

        observer.on_options_ready(state.options());

        Ok(Self {
            dataset,
            state,
            engine: QueryEngine::new(options),
            series,
            observer,
            last_update: None,
            runs: 0,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn options(&self) -> &FilterOptions {
        self.state.options()
    }

    pub fn selection(&self) -> &Selection {
        self.state.selection()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Last successful run, untouched by later failures
    pub fn last_update(&self) -> Option<&ChartUpdate> {
        self.last_update.as_ref()
    }

    /// Number of query runs so far, successful or not
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Change the location and re-run the query
    pub fn set_location(&mut self, value: &str) -> SessionResult<&ChartUpdate> {
        let changed = self.state.set_location(value);
        self.apply(changed)
    }

    /// Change the topic and re-run the query
    pub fn set_topic(&mut self, value: &str) -> SessionResult<&ChartUpdate> {
        let changed = self.state.set_topic(value);
        self.apply(changed)
    }

    /// Change both dimensions and run the query once
    pub fn select(&mut self, location: &str, topic: &str) -> SessionResult<&ChartUpdate> {
        let changed = self.state.select(location, topic);
        self.apply(changed)
    }

    /// Re-run the query for the current selection
    pub fn refresh(&mut self) -> SessionResult<&ChartUpdate> {
        self.run()
    }

    fn apply(&mut self, changed: Result<(), QueryError>) -> SessionResult<&ChartUpdate> {
        if let Err(e) = changed {
            tracing::warn!(error = %e, selection = %self.state.selection(), "Selection rejected");
            self.observer.notify(&Notification::error(e.to_string()));
            return Err(e.into());
        }
        self.run()
    }

    fn run(&mut self) -> SessionResult<&ChartUpdate> {
        self.runs += 1;
        let selection = self.state.selection().clone();
        let result = self.engine.query(&self.dataset, &selection);

        let first = match result.first() {
            Some(record) => record,
            None => {
                let err = QueryError::NoData {
                    location: selection.location,
                    topic: selection.topic,
                };
                tracing::warn!(error = %err, "Query returned no records");
                self.observer.notify(&Notification::warning(err.to_string()));
                return Err(err.into());
            }
        };

        let summary = RecordSummary::from_record(first, &self.series);
        let projection = project(&result, &self.series);
        let missing = projection.missing_fields();

        for series in projection.series.iter().filter(|s| !s.is_complete()) {
            let count = series.missing_positions().count();
            tracing::warn!(field = %series.field, count, "Series has missing values");
            self.observer.notify(&Notification::warning(format!(
                "{} is missing {} of {} values",
                series.label,
                count,
                series.values.len()
            )));
        }

        let update = ChartUpdate {
            selection,
            projection,
            missing,
            summary,
        };

        self.observer.on_query_result(&update);
        Ok(&*self.last_update.insert(update))
    }
}
