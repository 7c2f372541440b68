//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging for every controller in the
//! process. Log lines carry an `entity_type` field instead of the module path, so
//! the admin user list and the order archive are easy to tell apart.
//!
//! ## What Gets Traced
//!
//! - **Controller lifecycle**: `Controller started`, `Shutdown` with the row count
//! - **Fetches**: every issued fetch with its `seq`, page and size; every applied
//!   page; every superseded page that was discarded
//! - **Locale changes**: label rebuilds and translation failures
//! - **Row actions**: action payloads at debug level, failures at warn level
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run      # One line per fetch and action
//! RUST_LOG=debug cargo run     # Full request payloads and discarded results
//! RUST_LOG=list_framework=debug,cockpit=info cargo run
//! ```
//!
//! With `RUST_LOG=info` a page switch on the archive reads:
//!
//! ```text
//! INFO Fetching page entity_type="ArchivedOrder" seq=2 page=1 size=8
//! INFO Page loaded entity_type="ArchivedOrder" seq=2 rows=5 total=13
//! ```

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type identifies the controller
        .compact()
        .init();
}
