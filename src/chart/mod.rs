//! Charts
//!
//! Bridges session results to a renderer:
//!
//! - **Frame**: renderer-agnostic chart description per [`ChartKind`]
//! - **Surface**: remembers whether a chart exists (construct vs redraw)
//! - **Render**: table, CSV and JSON renderers
//! - **Binding**: a [`DashboardObserver`] that renders every query result

mod frame;
mod render;

pub use frame::{ChartDataset, ChartFrame, ChartKind};
pub use render::{ChartRenderer, CsvRenderer, JsonRenderer, TableRenderer};

use serde::Serialize;
use thiserror::Error;

use crate::query::FilterOptions;
use crate::session::{ChartUpdate, DashboardObserver, Notification};

/// Whether a frame creates the chart or updates it in place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Construct,
    Redraw,
}

/// Errors that can occur while building or drawing a chart
#[derive(Error, Debug)]
pub enum RenderError {
    /// Nothing plottable for this chart kind
    #[error("No series to plot for a {0} chart")]
    NoSeries(ChartKind),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The chart currently on screen, if any
#[derive(Debug, Default)]
pub struct ChartSurface {
    current: Option<ChartFrame>,
}

impl ChartSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode the next frame will be drawn with
    pub fn next_mode(&self) -> RenderMode {
        if self.current.is_some() {
            RenderMode::Redraw
        } else {
            RenderMode::Construct
        }
    }

    /// Replace the displayed frame
    pub fn present(&mut self, frame: ChartFrame) -> RenderMode {
        let mode = self.next_mode();
        self.current = Some(frame);
        mode
    }

    pub fn current(&self) -> Option<&ChartFrame> {
        self.current.as_ref()
    }
}

/// Observer that draws every successful query with a renderer
///
/// Notifications are queued for the UI to drain; a failed render is queued
/// as an error notification and leaves the surface untouched.
pub struct ChartBinding<R: ChartRenderer> {
    kind: ChartKind,
    surface: ChartSurface,
    renderer: R,
    options: Option<FilterOptions>,
    notifications: Vec<Notification>,
}

impl<R: ChartRenderer> ChartBinding<R> {
    pub fn new(kind: ChartKind, renderer: R) -> Self {
        Self {
            kind,
            surface: ChartSurface::new(),
            renderer,
            options: None,
            notifications: Vec::new(),
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn surface(&self) -> &ChartSurface {
        &self.surface
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Options published by the session, once ready
    pub fn options(&self) -> Option<&FilterOptions> {
        self.options.as_ref()
    }

    /// Take all queued notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn draw(&mut self, update: &ChartUpdate) -> Result<RenderMode, RenderError> {
        let frame = ChartFrame::build(self.kind, update)?;
        self.renderer.render(&frame, self.surface.next_mode())?;
        Ok(self.surface.present(frame))
    }
}

impl<R: ChartRenderer> DashboardObserver for ChartBinding<R> {
    fn on_options_ready(&mut self, options: &FilterOptions) {
        self.options = Some(options.clone());
    }

    fn on_query_result(&mut self, update: &ChartUpdate) {
        match self.draw(update) {
            Ok(mode) => {
                tracing::debug!(kind = %self.kind, ?mode, selection = %update.selection, "Chart rendered")
            }
            Err(e) => {
                tracing::error!(kind = %self.kind, error = %e, "Chart render failed");
                self.notifications.push(Notification::error(e.to_string()));
            }
        }
    }

    fn notify(&mut self, notification: &Notification) {
        self.notifications.push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, FieldMapping, Record};
    use crate::query::QueryOptions;
    use crate::session::{DashboardSession, NotificationLevel};

    fn session(kind: ChartKind) -> DashboardSession<ChartBinding<JsonRenderer<Vec<u8>>>> {
        let dataset = Dataset::new(vec![
            Record::new("AL", "Obesity", 2012).with_value("avg_CDI_DataValue", 30.1),
            Record::new("AL", "Obesity", 2011).with_value("avg_CDI_DataValue", 29.4),
            Record::new("GA", "Obesity", 2011).with_value("avg_CDI_DataValue", 28.0),
            Record::new("GA", "Asthma", 2011),
        ])
        .unwrap();

        DashboardSession::from_dataset(
            dataset,
            FieldMapping::chronic_disease().series,
            QueryOptions::new(),
            ChartBinding::new(kind, JsonRenderer::new(Vec::new())),
        )
        .unwrap()
    }

    fn rendered_modes(binding: &ChartBinding<JsonRenderer<Vec<u8>>>) -> Vec<String> {
        let text = String::from_utf8(binding.renderer().get_ref().clone()).unwrap();
        text.lines()
            .map(|line| {
                let doc: serde_json::Value = serde_json::from_str(line).unwrap();
                doc["mode"].as_str().unwrap().to_string()
            })
            .collect()
    }

    #[test]
    fn test_surface_construct_then_redraw() {
        let mut surface = ChartSurface::new();
        let frame = ChartFrame {
            kind: ChartKind::Line,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            labels: Vec::new(),
            datasets: Vec::new(),
        };

        assert_eq!(surface.present(frame.clone()), RenderMode::Construct);
        assert_eq!(surface.present(frame), RenderMode::Redraw);
    }

    #[test]
    fn test_binding_constructs_once() {
        let mut session = session(ChartKind::Line);
        assert!(session.observer().options().is_some());

        session.set_topic("Obesity").unwrap();
        session.set_location("GA").unwrap();

        assert_eq!(rendered_modes(session.observer()), vec!["construct", "redraw"]);
        assert_eq!(
            session.observer().surface().current().unwrap().datasets[0].label,
            "Obesity in GA"
        );
    }

    #[test]
    fn test_no_data_leaves_chart_untouched() {
        let mut session = session(ChartKind::Line);
        session.set_topic("Obesity").unwrap();
        let before = session.observer().surface().current().cloned();

        // AL has no Asthma records
        assert!(session.set_topic("Asthma").is_err());

        assert_eq!(session.observer().surface().current().cloned(), before);
        assert_eq!(rendered_modes(session.observer()).len(), 1);

        let notifications = session.observer_mut().take_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, NotificationLevel::Warning);
        assert!(session.observer_mut().take_notifications().is_empty());
    }
}
