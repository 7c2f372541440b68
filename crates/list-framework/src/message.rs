//! # Controller Messages
//!
//! Commands a [`ListHandle`](crate::ListHandle) sends to its
//! [`ListController`](crate::ListController). Each UI transition maps to one
//! variant; every variant except `Shutdown` carries a one-shot reply channel.

use crate::entity::{ActionOutcome, ListEntity};
use crate::error::ControllerError;
use crate::query::{FilterSet, PageEvent, RequestDescriptor, SortEvent};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by controllers.
pub type Response<T> = oneshot::Sender<Result<T, ControllerError>>;

/// Identifies the fetch a transition issued.
///
/// Sequence numbers grow monotonically per controller; only the result of the
/// highest one issued so far is ever applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
    pub descriptor: RequestDescriptor,
}

#[derive(Debug)]
pub enum ListRequest<E: ListEntity> {
    Initialize {
        respond_to: Response<RequestTicket>,
    },
    Page {
        event: PageEvent,
        respond_to: Response<RequestTicket>,
    },
    Sort {
        event: SortEvent,
        respond_to: Response<RequestTicket>,
    },
    ApplyFilters {
        filters: FilterSet,
        respond_to: Response<RequestTicket>,
    },
    ClearFilters {
        respond_to: Response<RequestTicket>,
    },
    Reload {
        respond_to: Response<RequestTicket>,
    },
    Scope {
        scope: E::Scope,
        respond_to: Response<RequestTicket>,
    },
    Action {
        action: E::Action,
        respond_to: Response<ActionOutcome>,
    },
    Shutdown,
}
