//! # ListClient Trait
//!
//! Provides a common interface for screen-specific clients, adding default paging,
//! sorting and filtering methods built on top of a generic [`ListHandle`].
use crate::{ControllerError, ListEntity, ListHandle, ListSnapshot, PageEvent, RequestTicket, SortEvent};
use crate::query::FilterSet;
use async_trait::async_trait;

/// Trait for screen-specific clients to inherit the standard list operations.
///
/// # Example
///
/// ```rust,ignore
/// struct OrderArchiveClient {
///     handle: ListHandle<ArchivedOrder>,
/// }
///
/// #[async_trait]
/// impl ListClient<ArchivedOrder> for OrderArchiveClient {
///     type Error = OrderArchiveError;
///
///     fn handle(&self) -> &ListHandle<ArchivedOrder> {
///         &self.handle
///     }
///
///     fn map_error(e: ControllerError) -> Self::Error {
///         OrderArchiveError::Controller(e)
///     }
/// }
///
/// // page(), sort(), apply_filters() ... are provided automatically
/// client.page(PageEvent { page_index: 1, page_size: 8 }).await?;
/// ```
#[async_trait]
pub trait ListClient<E: ListEntity>: Send + Sync {
    /// The screen-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic handle.
    fn handle(&self) -> &ListHandle<E>;

    /// Map controller errors to the screen-specific error type.
    fn map_error(e: ControllerError) -> Self::Error;

    #[tracing::instrument(skip(self))]
    async fn initialize(&self) -> Result<RequestTicket, Self::Error> {
        tracing::debug!("Sending request");
        self.handle().initialize().await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn page(&self, event: PageEvent) -> Result<RequestTicket, Self::Error> {
        tracing::debug!("Sending request");
        self.handle().page(event).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn sort(&self, event: SortEvent) -> Result<RequestTicket, Self::Error> {
        tracing::debug!("Sending request");
        self.handle().sort(event).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn apply_filters(&self, filters: FilterSet) -> Result<RequestTicket, Self::Error> {
        tracing::debug!("Sending request");
        self.handle()
            .apply_filters(filters)
            .await
            .map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn clear_filters(&self) -> Result<RequestTicket, Self::Error> {
        tracing::debug!("Sending request");
        self.handle().clear_filters().await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn reload(&self) -> Result<RequestTicket, Self::Error> {
        tracing::debug!("Sending request");
        self.handle().reload().await.map_err(Self::map_error)
    }

    /// Waits for the outstanding fetch, if any, and returns the settled state.
    async fn settled(&self) -> Result<ListSnapshot<E::Row>, Self::Error> {
        self.handle().settled().await.map_err(Self::map_error)
    }

    fn snapshot(&self) -> ListSnapshot<E::Row> {
        self.handle().snapshot()
    }
}
