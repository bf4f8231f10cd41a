//! Callbacks the UI layer binds to a session

use serde::Serialize;

use crate::query::FilterOptions;
use crate::session::ChartUpdate;

/// Severity of a user-visible notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Error,
    Warning,
}

/// A single message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.level {
            NotificationLevel::Error => write!(f, "error: {}", self.message),
            NotificationLevel::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// Receiver for session events
///
/// Called synchronously from the session's `&mut self` methods, so an
/// implementation never sees two events at once.
pub trait DashboardObserver {
    /// Filter options are known; populate the selection controls
    fn on_options_ready(&mut self, options: &FilterOptions);

    /// A query produced data; construct or redraw the chart
    fn on_query_result(&mut self, update: &ChartUpdate);

    /// Surface a message to the user
    fn notify(&mut self, notification: &Notification);
}

/// Observer that only logs
#[derive(Debug, Default)]
pub struct LogObserver;

impl DashboardObserver for LogObserver {
    fn on_options_ready(&mut self, options: &FilterOptions) {
        tracing::info!(
            locations = options.locations().len(),
            topics = options.topics().len(),
            "Options ready"
        );
    }

    fn on_query_result(&mut self, update: &ChartUpdate) {
        tracing::info!(selection = %update.selection, rows = update.projection.len(), "Query result");
    }

    fn notify(&mut self, notification: &Notification) {
        tracing::warn!("{}", notification);
    }
}

impl<T: DashboardObserver + ?Sized> DashboardObserver for &mut T {
    fn on_options_ready(&mut self, options: &FilterOptions) {
        (**self).on_options_ready(options)
    }

    fn on_query_result(&mut self, update: &ChartUpdate) {
        (**self).on_query_result(update)
    }

    fn notify(&mut self, notification: &Notification) {
        (**self).notify(notification)
    }
}
