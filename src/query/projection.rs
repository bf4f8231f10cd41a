//! Projection of query results into chart-ready series
//!
//! Every series is aligned with the result's year order and has exactly one
//! slot per record. A record without the projected field leaves `None` in
//! its slot and is reported as a [`QueryError::MissingField`] for that
//! series only; the remaining series stay usable.

use serde::Serialize;

use crate::dataset::{SeriesRole, SeriesSpec};
use crate::query::engine::QueryResult;
use crate::query::error::QueryError;

/// One named numeric sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub field: String,
    pub role: SeriesRole,
    pub values: Vec<Option<f64>>,
}

impl Series {
    /// True when every slot holds a value
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    /// Positions that have no value
    pub fn missing_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(idx, _)| idx)
    }
}

/// Year sequence plus the series projected from a query result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub years: Vec<i32>,
    pub series: Vec<Series>,
}

impl Projection {
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Find a series by its label
    pub fn series(&self, label: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.label == label)
    }

    /// First series with the given role
    pub fn first_with_role(&self, role: SeriesRole) -> Option<&Series> {
        self.series.iter().find(|s| s.role == role)
    }

    /// One `MissingField` error per empty slot, grouped by series
    pub fn missing_fields(&self) -> Vec<QueryError> {
        self.series
            .iter()
            .flat_map(|series| {
                series.missing_positions().map(|position| QueryError::MissingField {
                    field: series.field.clone(),
                    year: self.years[position],
                    position,
                })
            })
            .collect()
    }
}

/// Extract each spec's field from every record in `result`
pub fn project(result: &QueryResult, specs: &[SeriesSpec]) -> Projection {
    let series = specs
        .iter()
        .map(|spec| Series {
            label: spec.label.clone(),
            field: spec.field.clone(),
            role: spec.role,
            values: result.records().iter().map(|r| r.value(&spec.field)).collect(),
        })
        .collect();

    Projection {
        years: result.years(),
        series,
    }
}
