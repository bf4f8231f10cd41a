//! Chart frames
//!
//! A frame is the complete, renderer-agnostic description of one chart:
//! axis titles, the year labels and the aligned datasets.

use serde::{Deserialize, Serialize};

use crate::chart::RenderError;
use crate::dataset::SeriesRole;
use crate::query::Series;
use crate::session::ChartUpdate;

/// Chart types the dashboards draw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Grouped bars: value and confidence limits per year
    #[default]
    Bar,
    /// A single value line over the years
    Line,
    /// Sample size per year, bubble size and colour from the value
    Bubble,
}

impl ChartKind {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bar" => Some(Self::Bar),
            "line" => Some(Self::Line),
            "bubble" | "scatter" => Some(Self::Bubble),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bar => write!(f, "bar"),
            Self::Line => write!(f, "line"),
            Self::Bubble => write!(f, "bubble"),
        }
    }
}

/// One plotted sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub values: Vec<Option<f64>>,
    /// Bubble marker sizes (also used as marker colour)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_sizes: Option<Vec<Option<f64>>>,
    /// Per-point hover text
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hover: Vec<String>,
    /// Some points have no value
    pub incomplete: bool,
}

impl ChartDataset {
    fn from_series(label: String, series: &Series) -> Self {
        Self {
            label,
            values: series.values.clone(),
            marker_sizes: None,
            hover: Vec::new(),
            incomplete: !series.is_complete(),
        }
    }
}

/// A fully prepared chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFrame {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Years along the x-axis
    pub labels: Vec<i32>,
    pub datasets: Vec<ChartDataset>,
}

impl ChartFrame {
    /// Build the frame for `kind` from a query update
    pub fn build(kind: ChartKind, update: &ChartUpdate) -> Result<Self, RenderError> {
        let projection = &update.projection;
        let topic = &update.selection.topic;

        let frame = match kind {
            ChartKind::Bar => {
                let datasets: Vec<_> = projection
                    .series
                    .iter()
                    .filter(|s| s.role != SeriesRole::SampleSize)
                    .map(|s| ChartDataset::from_series(format!("{} - {}", topic, s.label), s))
                    .collect();

                Self {
                    kind,
                    title: format!("{}: data value and confidence levels vs year", topic),
                    x_label: "Year".to_string(),
                    y_label: "Value".to_string(),
                    labels: projection.years.clone(),
                    datasets,
                }
            }
            ChartKind::Line => {
                let series = projection.first_with_role(SeriesRole::Value);
                Self {
                    kind,
                    title: update.selection.to_string(),
                    x_label: "Year".to_string(),
                    y_label: series.map(|s| s.label.clone()).unwrap_or_default(),
                    labels: projection.years.clone(),
                    datasets: series
                        .map(|s| ChartDataset::from_series(update.selection.to_string(), s))
                        .into_iter()
                        .collect(),
                }
            }
            ChartKind::Bubble => {
                let y = projection
                    .first_with_role(SeriesRole::SampleSize)
                    .or_else(|| projection.series.first());
                let size = projection.first_with_role(SeriesRole::Value).or(y);

                let datasets = match (y, size) {
                    (Some(y), Some(size)) => {
                        let hover = projection
                            .years
                            .iter()
                            .enumerate()
                            .map(|(idx, year)| {
                                format!(
                                    "Year: {} / {}: {} / {}: {}",
                                    year,
                                    y.label,
                                    display(y.values[idx]),
                                    size.label,
                                    display(size.values[idx])
                                )
                            })
                            .collect();

                        let mut dataset = ChartDataset::from_series(y.label.clone(), y);
                        dataset.marker_sizes = Some(size.values.clone());
                        dataset.hover = hover;
                        dataset.incomplete = !y.is_complete() || !size.is_complete();
                        vec![dataset]
                    }
                    _ => Vec::new(),
                };

                Self {
                    kind,
                    title: format!(
                        "{}: {} vs year",
                        topic,
                        y.map(|s| s.label.as_str()).unwrap_or("value")
                    ),
                    x_label: "Year".to_string(),
                    y_label: y.map(|s| s.label.clone()).unwrap_or_default(),
                    labels: projection.years.clone(),
                    datasets,
                }
            }
        };

        if frame.datasets.is_empty() {
            return Err(RenderError::NoSeries(kind));
        }
        Ok(frame)
    }
}

fn display(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "n/a".to_string())
}
