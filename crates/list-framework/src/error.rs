//! # Framework Errors
//!
//! Error types shared by every list controller. They are split by layer:
//!
//! - [`ListError`] comes back from the outside world (gateway, translator) and is
//!   absorbed by the controller into its `Failed` phase.
//! - [`QueryError`] rejects a transition before anything is sent.
//! - [`ControllerError`] is what a handle sees when talking to the controller task.

use thiserror::Error;

/// Failures reported by external collaborators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListError {
    /// Transport-level failure, e.g. the backend is unreachable.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The addressed record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Rejections produced while turning UI state into a request descriptor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Page size {0} is not one of the offered sizes")]
    PageSizeNotAllowed(u32),

    #[error("Unknown filter field: {0}")]
    UnknownFilter(String),
}

/// Errors seen by a [`ListHandle`](crate::ListHandle).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Controller closed")]
    Closed,

    #[error("Controller dropped response channel")]
    Dropped,

    #[error(transparent)]
    Query(#[from] QueryError),
}
