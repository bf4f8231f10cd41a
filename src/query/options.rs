//! Filter options derived from a dataset

use serde::Serialize;
use std::collections::BTreeSet;

use crate::dataset::Dataset;
use crate::query::error::{Dimension, EngineResult, QueryError};

/// Distinct, sorted values a user can select from
///
/// Computed once per dataset load and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    locations: Vec<String>,
    topics: Vec<String>,
}

impl FilterOptions {
    /// Derive options from every record in the dataset
    ///
    /// Blank values are not offered as options.
    pub fn from_dataset(dataset: &Dataset) -> EngineResult<Self> {
        let locations: BTreeSet<&str> = dataset
            .iter()
            .map(|r| r.location.as_str())
            .filter(|v| !v.trim().is_empty())
            .collect();
        let topics: BTreeSet<&str> = dataset
            .iter()
            .map(|r| r.topic.as_str())
            .filter(|v| !v.trim().is_empty())
            .collect();

        if locations.is_empty() {
            return Err(QueryError::EmptyOptions(Dimension::Location));
        }
        if topics.is_empty() {
            return Err(QueryError::EmptyOptions(Dimension::Topic));
        }

        Ok(Self {
            locations: locations.into_iter().map(str::to_string).collect(),
            topics: topics.into_iter().map(str::to_string).collect(),
        })
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Check whether a value is offered for a dimension
    pub fn contains(&self, dimension: Dimension, value: &str) -> bool {
        let values = match dimension {
            Dimension::Location => &self.locations,
            Dimension::Topic => &self.topics,
        };
        values
            .binary_search_by(|probe| probe.as_str().cmp(value))
            .is_ok()
    }

    /// Default selection: the first value of each set
    pub fn first(&self) -> Option<(&str, &str)> {
        Some((self.locations.first()?.as_str(), self.topics.first()?.as_str()))
    }
}
