//! Session error types

use thiserror::Error;

use crate::dataset::LoadError;
use crate::query::QueryError;

/// Errors surfaced by a dashboard session
#[derive(Error, Debug)]
pub enum SessionError {
    /// Dataset could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Selection, query or projection failed
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl SessionError {
    /// Whether the session halts in an unrendered state
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Load(_) => true,
            Self::Query(e) => e.is_fatal(),
        }
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
