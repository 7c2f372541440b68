//! # Order Archive Client
//!
//! Wraps a `ListHandle<ArchivedOrder>`; paging, sorting and filtering come from
//! [`ListClient`].
use crate::model::OrderRow;
use crate::order_archive::{ArchivedOrder, OrderArchiveAction, OrderArchiveError};
use async_trait::async_trait;
use list_framework::{ControllerError, ListClient, ListHandle};
use tracing::{debug, instrument};

/// Client for the order archive controller.
#[derive(Clone)]
pub struct OrderArchiveClient {
    handle: ListHandle<ArchivedOrder>,
}

impl OrderArchiveClient {
    pub fn new(handle: ListHandle<ArchivedOrder>) -> Self {
        Self { handle }
    }

    /// Opens the order dialog for `row`; the list is not refreshed afterwards.
    #[instrument(skip(self, row), fields(order_id = %row.order_id))]
    pub async fn open_order_detail(&self, row: &OrderRow) -> Result<(), OrderArchiveError> {
        debug!("Sending request");
        self.handle
            .perform_action(OrderArchiveAction::OpenDetail(row.clone()))
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ListClient<ArchivedOrder> for OrderArchiveClient {
    type Error = OrderArchiveError;

    fn handle(&self) -> &ListHandle<ArchivedOrder> {
        &self.handle
    }

    fn map_error(e: ControllerError) -> Self::Error {
        OrderArchiveError::Controller(e)
    }
}
