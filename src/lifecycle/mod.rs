//! # System Lifecycle
//!
//! Creates both list controllers, wires them to their collaborators and stops them
//! again.
//!
//! ## Wiring
//!
//! Controllers are created without dependencies; gateways, translator, notifier,
//! dialog host and a per-controller locale subscription are injected when
//! `run(context)` is spawned. Each screen owns its subscription, so there is no
//! listener left behind when a screen goes away.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients**: closes the controllers' mailboxes
//! 2. **Controllers detect closure**: abort in-flight fetches, log final state
//! 3. **Await completion**: wait for every controller task
//!
//! ## Observability
//!
//! [`setup_tracing`] initializes structured logging once per process:
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=debug cargo run
//! ```

pub mod cockpit_system;

pub use cockpit_system::*;
pub use list_framework::tracing::setup_tracing;
