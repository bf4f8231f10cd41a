//! Query Engine
//!
//! Filters the dataset by the active selection and orders the matches.
//!
//! # Execution Pipeline
//!
//! ```text
//! Dataset → Filter (location, topic, year range) → Stable sort by year → QueryResult
//! ```
//!
//! Nothing is cached: every run re-filters and re-sorts the whole dataset.

use serde::Serialize;
use std::time::Instant;

use crate::dataset::{Dataset, Record};
use crate::query::error::{EngineResult, QueryError};
use crate::query::selection::Selection;

/// Inclusive bound on record years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    lower: i32,
    upper: i32,
}

impl YearRange {
    /// Create a range, rejecting `lower > upper`
    pub fn new(lower: i32, upper: i32) -> EngineResult<Self> {
        if lower > upper {
            return Err(QueryError::InvalidYearRange { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Range bounded on one or both sides
    pub fn between(lower: Option<i32>, upper: Option<i32>) -> EngineResult<Option<Self>> {
        match (lower, upper) {
            (None, None) => Ok(None),
            (lower, upper) => {
                Self::new(lower.unwrap_or(i32::MIN), upper.unwrap_or(i32::MAX)).map(Some)
            }
        }
    }

    pub fn lower(&self) -> i32 {
        self.lower
    }

    pub fn upper(&self) -> i32 {
        self.upper
    }

    pub fn contains(&self, year: i32) -> bool {
        self.lower <= year && year <= self.upper
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.lower, self.upper)
    }
}

/// Settings applied to every query run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub year_range: Option<YearRange>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: bound results to a year range
    pub fn with_year_range(mut self, range: YearRange) -> Self {
        self.year_range = Some(range);
        self
    }
}

/// Records matching a selection, sorted ascending by year
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    selection: Selection,
    records: Vec<Record>,
    points_scanned: usize,
}

impl QueryResult {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First (earliest) record, used by the info panel
    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    /// Year sequence, the x-axis of every chart
    pub fn years(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    /// Number of dataset records examined
    pub fn points_scanned(&self) -> usize {
        self.points_scanned
    }
}

/// Query engine
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    options: QueryOptions,
}

impl QueryEngine {
    pub fn new(options: QueryOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Run a query for the selection
    ///
    /// An empty result is not an error here; callers decide how to surface it.
    pub fn query(&self, dataset: &Dataset, selection: &Selection) -> QueryResult {
        let start = Instant::now();
        let result = query(dataset, selection, &self.options);

        tracing::debug!(
            selection = %selection,
            matched = result.len(),
            scanned = result.points_scanned(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Query executed"
        );

        result
    }
}

/// Filter `dataset` by `selection` and sort the matches by year
///
/// The sort is stable: records sharing a year keep their dataset order and
/// duplicates are passed through untouched.
pub fn query(dataset: &Dataset, selection: &Selection, options: &QueryOptions) -> QueryResult {
    let mut records: Vec<Record> = dataset
        .iter()
        .filter(|r| r.location == selection.location && r.topic == selection.topic)
        .filter(|r| options.year_range.map_or(true, |range| range.contains(r.year)))
        .cloned()
        .collect();

    records.sort_by_key(|r| r.year);

    QueryResult {
        selection: selection.clone(),
        records,
        points_scanned: dataset.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Dataset {
        Dataset::new(vec![
            Record::new("AL", "Obesity", 2012).with_value("value", 30.1),
            Record::new("AL", "Obesity", 2011).with_value("value", 29.4),
            Record::new("GA", "Obesity", 2011).with_value("value", 28.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_scenario_filter_and_sort() {
        let result = query(&scenario(), &Selection::new("AL", "Obesity"), &QueryOptions::new());

        assert_eq!(result.years(), vec![2011, 2012]);
        let values: Vec<_> = result.records().iter().map(|r| r.value("value")).collect();
        assert_eq!(values, vec![Some(29.4), Some(30.1)]);
        assert_eq!(result.points_scanned(), 3);
    }

    #[test]
    fn test_every_record_matches_selection() {
        let dataset = scenario();
        for selection in [
            Selection::new("AL", "Obesity"),
            Selection::new("GA", "Obesity"),
        ] {
            let result = query(&dataset, &selection, &QueryOptions::new());
            assert!(!result.is_empty());
            assert!(result
                .records()
                .iter()
                .all(|r| r.location == selection.location && r.topic == selection.topic));
        }
    }

    #[test]
    fn test_stable_sort_keeps_duplicates() {
        let dataset = Dataset::new(vec![
            Record::new("AL", "Obesity", 2013).with_value("value", 1.0),
            Record::new("AL", "Obesity", 2011).with_value("value", 2.0),
            Record::new("AL", "Obesity", 2013).with_value("value", 3.0),
            Record::new("AL", "Obesity", 2011).with_value("value", 4.0),
        ])
        .unwrap();

        let result = query(&dataset, &Selection::new("AL", "Obesity"), &QueryOptions::new());

        assert_eq!(result.years(), vec![2011, 2011, 2013, 2013]);
        let values: Vec<_> = result.records().iter().map(|r| r.value("value")).collect();
        assert_eq!(values, vec![Some(2.0), Some(4.0), Some(1.0), Some(3.0)]);
    }

    #[test]
    fn test_query_is_idempotent() {
        let dataset = scenario();
        let engine = QueryEngine::default();
        let selection = Selection::new("AL", "Obesity");

        assert_eq!(
            engine.query(&dataset, &selection),
            engine.query(&dataset, &selection)
        );
    }

    #[test]
    fn test_year_range_excludes_out_of_bounds() {
        let dataset = Dataset::new(vec![
            Record::new("AL", "Obesity", 2025),
            Record::new("AL", "Obesity", 2011),
            Record::new("AL", "Obesity", 2021),
            Record::new("AL", "Obesity", 2010),
        ])
        .unwrap();

        let options = QueryOptions::new().with_year_range(YearRange::new(2011, 2021).unwrap());
        let result = query(&dataset, &Selection::new("AL", "Obesity"), &options);

        assert_eq!(result.years(), vec![2011, 2021]);
    }

    #[test]
    fn test_absent_topic_yields_empty_result() {
        let result = query(&scenario(), &Selection::new("AL", "Smoking"), &QueryOptions::new());
        assert!(result.is_empty());
        assert!(result.first().is_none());
    }

    #[test]
    fn test_year_range_validation() {
        assert!(YearRange::new(2011, 2021).is_ok());
        assert!(YearRange::new(2015, 2015).unwrap().contains(2015));
        assert_eq!(
            YearRange::new(2021, 2011),
            Err(QueryError::InvalidYearRange {
                lower: 2021,
                upper: 2011
            })
        );
    }

    #[test]
    fn test_year_range_between() {
        assert_eq!(YearRange::between(None, None), Ok(None));

        let open_ended = YearRange::between(Some(2015), None).unwrap().unwrap();
        assert!(open_ended.contains(2099));
        assert!(!open_ended.contains(2014));

        assert!(YearRange::between(Some(2020), Some(2010)).is_err());
    }
}
