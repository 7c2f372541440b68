//! Error types for the admin user list.

use list_framework::{ControllerError, ListError};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdminUsersError {
    /// The list controller rejected the request or is gone.
    #[error("User list controller error: {0}")]
    Controller(#[from] ControllerError),

    /// A row action reached the backend and failed there.
    #[error("User action failed: {0}")]
    Action(ListError),

    /// The row does not offer the requested action.
    #[error("Action not offered for user: {0}")]
    NotOffered(String),
}
