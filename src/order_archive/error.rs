//! Error types for the order archive.

use list_framework::ControllerError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderArchiveError {
    #[error("Order archive controller error: {0}")]
    Controller(#[from] ControllerError),
}
