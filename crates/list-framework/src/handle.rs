//! # List Handle
//!
//! The `ListHandle<E>` is the UI side of a [`ListController`](crate::ListController).
//! It forwards commands over a Tokio mpsc channel, awaits replies on oneshot
//! channels and exposes the published [`ListSnapshot`] through a watch receiver.
//!
//! * **Cloneable**: holds a sender and a receiver, so cloning is inexpensive.
//! * **Async API**: commands resolve to `Result<…, ControllerError>`.
//! * **Shutdown**: the controller stops once every handle is dropped.

use crate::controller::{ListPhase, ListSnapshot};
use crate::entity::{ActionOutcome, ListEntity};
use crate::error::ControllerError;
use crate::message::{ListRequest, RequestTicket};
use crate::query::{FilterSet, PageEvent, SortEvent};
use tokio::sync::{mpsc, oneshot, watch};

pub struct ListHandle<E: ListEntity> {
    sender: mpsc::Sender<ListRequest<E>>,
    state: watch::Receiver<ListSnapshot<E::Row>>,
}

impl<E: ListEntity> Clone for ListHandle<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            state: self.state.clone(),
        }
    }
}

impl<E: ListEntity> ListHandle<E> {
    pub fn new(
        sender: mpsc::Sender<ListRequest<E>>,
        state: watch::Receiver<ListSnapshot<E::Row>>,
    ) -> Self {
        Self { sender, state }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, ControllerError>>) -> ListRequest<E>,
    ) -> Result<T, ControllerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ControllerError::Closed)?;
        response.await.map_err(|_| ControllerError::Dropped)?
    }

    /// Issues the first fetch with the default query.
    pub async fn initialize(&self) -> Result<RequestTicket, ControllerError> {
        self.request(|respond_to| ListRequest::Initialize { respond_to })
            .await
    }

    pub async fn page(&self, event: PageEvent) -> Result<RequestTicket, ControllerError> {
        self.request(|respond_to| ListRequest::Page { event, respond_to })
            .await
    }

    pub async fn sort(&self, event: SortEvent) -> Result<RequestTicket, ControllerError> {
        self.request(|respond_to| ListRequest::Sort { event, respond_to })
            .await
    }

    /// Merges `filters` into the current ones and rewinds to the first page.
    pub async fn apply_filters(&self, filters: FilterSet) -> Result<RequestTicket, ControllerError> {
        self.request(|respond_to| ListRequest::ApplyFilters {
            filters,
            respond_to,
        })
        .await
    }

    pub async fn clear_filters(&self) -> Result<RequestTicket, ControllerError> {
        self.request(|respond_to| ListRequest::ClearFilters { respond_to })
            .await
    }

    /// Re-issues the current query unchanged.
    pub async fn reload(&self) -> Result<RequestTicket, ControllerError> {
        self.request(|respond_to| ListRequest::Reload { respond_to })
            .await
    }

    /// Replaces the client-side narrowing scope and re-fetches from the first page.
    pub async fn set_scope(&self, scope: E::Scope) -> Result<RequestTicket, ControllerError> {
        self.request(|respond_to| ListRequest::Scope { scope, respond_to })
            .await
    }

    pub async fn perform_action(&self, action: E::Action) -> Result<ActionOutcome, ControllerError> {
        self.request(|respond_to| ListRequest::Action { action, respond_to })
            .await
    }

    /// Asks the controller to stop even though other handles may still exist.
    pub async fn shutdown(&self) -> Result<(), ControllerError> {
        self.sender
            .send(ListRequest::Shutdown)
            .await
            .map_err(|_| ControllerError::Closed)
    }

    /// The most recently published state.
    pub fn snapshot(&self) -> ListSnapshot<E::Row> {
        self.state.borrow().clone()
    }

    /// A receiver that is notified on every published state.
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot<E::Row>> {
        self.state.clone()
    }

    /// Waits until no fetch is outstanding and returns that state.
    ///
    /// Fails with [`ControllerError::Closed`] when the controller stops first.
    pub async fn settled(&self) -> Result<ListSnapshot<E::Row>, ControllerError> {
        let mut state = self.state.clone();
        let snapshot = state
            .wait_for(|snapshot| snapshot.phase != ListPhase::Loading)
            .await
            .map_err(|_| ControllerError::Closed)?;
        Ok(snapshot.clone())
    }
}
