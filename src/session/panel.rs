//! Info panel for the earliest record of a query result

use serde::Serialize;

use crate::dataset::{Record, SeriesRole, SeriesSpec};

/// One labelled measurement on the info panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryValue {
    pub label: String,
    pub role: SeriesRole,
    pub value: Option<f64>,
}

impl SummaryValue {
    /// Two decimals for measurements, plain for sample sizes, `n/a` if absent
    pub fn display(&self) -> String {
        match (self.value, self.role) {
            (None, _) => "n/a".to_string(),
            (Some(v), SeriesRole::SampleSize) => format!("{}", v),
            (Some(v), _) => format!("{:.2}", v),
        }
    }
}

/// Snapshot of a single record for display next to the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    pub location: String,
    pub topic: String,
    pub year: i32,
    pub values: Vec<SummaryValue>,
}

impl RecordSummary {
    pub fn from_record(record: &Record, specs: &[SeriesSpec]) -> Self {
        Self {
            location: record.location.clone(),
            topic: record.topic.clone(),
            year: record.year,
            values: specs
                .iter()
                .map(|spec| SummaryValue {
                    label: spec.label.clone(),
                    role: spec.role,
                    value: record.value(&spec.field),
                })
                .collect(),
        }
    }

    /// Label/value rows in display order
    pub fn rows(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("Location".to_string(), self.location.clone()),
            ("Topic".to_string(), self.topic.clone()),
            ("Year".to_string(), self.year.to_string()),
        ];
        rows.extend(self.values.iter().map(|v| (v.label.clone(), v.display())));
        rows
    }
}
