//! Selection State
//!
//! Holds the active (location, topic) pair and the options it was chosen
//! from. Every mutation is validated against those options; a rejected
//! mutation leaves the selection exactly as it was.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::query::error::{Dimension, EngineResult, QueryError};
use crate::query::options::FilterOptions;

/// The active filter values
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub location: String,
    pub topic: String,
}

impl Selection {
    pub fn new(location: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            topic: topic.into(),
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} in {}", self.topic, self.location)
    }
}

/// Active selection plus the immutable options it is validated against
#[derive(Debug, Clone)]
pub struct SelectionState {
    options: FilterOptions,
    active: Selection,
}

impl SelectionState {
    /// Derive options from the dataset and select the first of each
    pub fn initialize(dataset: &Dataset) -> EngineResult<Self> {
        let options = FilterOptions::from_dataset(dataset)?;
        let (location, topic) = options
            .first()
            .ok_or(QueryError::EmptyOptions(Dimension::Location))?;
        let active = Selection::new(location, topic);

        tracing::debug!(
            locations = options.locations().len(),
            topics = options.topics().len(),
            selection = %active,
            "Selection initialized"
        );

        Ok(Self { options, active })
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn selection(&self) -> &Selection {
        &self.active
    }

    /// Replace the active location
    pub fn set_location(&mut self, value: &str) -> EngineResult<()> {
        self.validate(Dimension::Location, value)?;
        self.active.location = value.to_string();
        Ok(())
    }

    /// Replace the active topic
    pub fn set_topic(&mut self, value: &str) -> EngineResult<()> {
        self.validate(Dimension::Topic, value)?;
        self.active.topic = value.to_string();
        Ok(())
    }

    /// Replace both fields; nothing changes unless both are valid
    pub fn select(&mut self, location: &str, topic: &str) -> EngineResult<()> {
        self.validate(Dimension::Location, location)?;
        self.validate(Dimension::Topic, topic)?;
        self.active = Selection::new(location, topic);
        Ok(())
    }

    fn validate(&self, dimension: Dimension, value: &str) -> EngineResult<()> {
        if self.options.contains(dimension, value) {
            Ok(())
        } else {
            Err(QueryError::InvalidSelection {
                dimension,
                value: value.to_string(),
            })
        }
    }
}
