//! # Cockpit
//!
//! List-view controllers behind the restaurant cockpit: the administrator's user
//! table and the waiter's order archive. Both screens are driven by the generic
//! [`ListController`](list_framework::ListController) from the `list-framework`
//! crate; this crate supplies what differs between them.
//!
//! ## Module Tour
//!
//! ### 1. The Screens ([`admin_users`], [`order_archive`])
//! [`ListEntity`](list_framework::ListEntity) implementations: record → row
//! projection, client-side narrowing, localized labels and row actions.
//!
//! ### 2. The Interface ([`clients`])
//! [`AdminUsersClient`](clients::AdminUsersClient) and
//! [`OrderArchiveClient`](clients::OrderArchiveClient) wrap the generic handle and
//! add the screen-specific actions.
//!
//! ### 3. The Collaborators ([`backend`], [`catalog`], [`dialog`])
//! The user gateway and an in-memory backend, the JSON translation catalog and
//! the dialog host capability.
//!
//! ### 4. The Orchestrator ([`lifecycle`], [`settings`])
//! Loads settings, spins up both controllers with their collaborators and shuts
//! them down.
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod admin_users;
pub mod backend;
pub mod catalog;
pub mod clients;
pub mod dialog;
pub mod lifecycle;
pub mod model;
pub mod order_archive;
pub mod settings;
