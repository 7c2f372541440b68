//! # List Framework
//!
//! Building blocks for table screens that page, sort and filter a backend
//! collection. One generic [`ListController`] owns the state of one screen and is
//! driven through a cloneable [`ListHandle`]; everything screen-specific lives in a
//! [`ListEntity`] implementation.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ListEntity`]) - records, rows, narrowing, labels, row actions
//! 2. **Runtime Layer** ([`ListController`]) - the paging/sort/filter state machine
//! 3. **Interface Layer** ([`ListHandle`], [`ListClient`]) - type-safe communication
//!
//! The controller is an actor: commands are processed one at a time by a single
//! task, so no locks guard its state. Fetches and translation lookups run beside it
//! and report back through its mailbox, tagged with sequence numbers so that a
//! superseded answer is never applied.
//!
//! ## Collaborators
//!
//! The controller reaches the outside world only through capability traits injected
//! at [`ListController::run`]:
//!
//! - [`ListGateway`] - executes a [`RequestDescriptor`]
//! - [`Translator`] + [`LocaleSubscription`] - column labels for the active locale
//! - [`Notifier`] - toast notices after successful row actions
//!
//! ## Example
//!
//! ```rust,ignore
//! let (controller, handle) = ListController::<ArchivedOrder>::new(settings, ());
//! tokio::spawn(controller.run(ControllerContext {
//!     gateway,
//!     translator,
//!     notifier,
//!     locales: Some(bus.subscribe()),
//!     entity: dialogs,
//! }));
//!
//! handle.initialize().await?;
//! let snapshot = handle.settled().await?;
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module provides a queued [`mock::MockGateway`], a manually answered
//! channel gateway ([`mock::create_mock_gateway`]), a [`mock::MockTranslator`] and a
//! [`mock::MockNotifier`].

pub mod client_trait;
pub mod controller;
pub mod entity;
pub mod error;
pub mod gateway;
pub mod handle;
pub mod locale;
pub mod message;
pub mod mock;
pub mod notice;
pub mod query;
pub mod tracing;

// Re-export core types for convenience
pub use client_trait::ListClient;
pub use controller::{ControllerContext, ControllerSettings, ListController, ListPhase, ListSnapshot};
pub use entity::{translated, ActionOutcome, ColumnSpec, Labels, ListEntity};
pub use error::{ControllerError, ListError, QueryError};
pub use gateway::{ListGateway, Page};
pub use handle::ListHandle;
pub use locale::{
    Locale, LocaleBus, LocaleChange, LocaleSubscription, TranslationBundle, Translations, Translator,
};
pub use message::{ListRequest, RequestTicket, Response};
pub use notice::{Notice, NoticeKind, Notifier, TracingNotifier, NOTICE_DURATION};
pub use query::{
    build_descriptor, FilterSet, FilterValue, PageEvent, PageSizes, Pageable, PageableDescriptor,
    RequestDescriptor, SortDirection, SortEvent, SortRule,
};
