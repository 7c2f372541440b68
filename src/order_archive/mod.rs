//! # Order Archive
//!
//! The waiter's table of finished orders. The order search endpoint is shared with
//! the live cockpit, so rows are narrowed on the client to orders that were paid or
//! canceled, and the total shown by the paginator is the number of rows kept.
//!
//! Filters: `bookingDate`, `email`, `bookingToken`. Selecting a row opens the order
//! dialog at 80% width.

pub mod entity;
pub mod error;

pub use entity::*;
pub use error::*;

use crate::clients::OrderArchiveClient;
use list_framework::{ControllerSettings, ListController};

/// Creates a new order archive controller and its client.
pub fn new(settings: ControllerSettings) -> (ListController<ArchivedOrder>, OrderArchiveClient) {
    let (controller, handle) = ListController::new(settings, ());
    (controller, OrderArchiveClient::new(handle))
}
