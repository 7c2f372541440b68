//! # ListEntity Trait
//!
//! The `ListEntity` trait is the contract every table-like screen implements to be
//! driven by the generic [`ListController`](crate::ListController). It names the
//! backend record, the display row, the client-side narrowing scope, the row actions
//! and the context those actions need.
//!
//! # Architecture Note
//! The controller owns the paging/sort/filter state machine and is written *once*.
//! Everything that differs between the admin user list and the order archive is
//! expressed here through associated types and a handful of hooks:
//!
//! - [`ListEntity::project`] flattens a backend record into a row.
//! - [`ListEntity::narrows`] / [`ListEntity::retain`] drop rows the screen should
//!   not show, even though the backend returned them.
//! - [`ListEntity::labels`] rebuilds columns and alert texts for a locale.
//! - [`ListEntity::handle_action`] runs a row action against the injected context.

use crate::error::ListError;
use crate::locale::{TranslationBundle, Translations};
use async_trait::async_trait;
use std::fmt::Debug;

/// Column key plus its localized header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: String,
    pub label: String,
}

impl ColumnSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Everything a screen shows that depends on the active locale.
///
/// Rebuilt wholesale on every locale change, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    pub columns: Vec<ColumnSpec>,
    /// Localized names of cell values, e.g. order states.
    pub values: Vec<ColumnSpec>,
    pub alerts: TranslationBundle,
}

impl Labels {
    /// Alert text for `key`; the key itself when it has no translation.
    pub fn alert(&self, key: &str) -> String {
        self.alerts
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|spec| spec.key == key)
            .map(|spec| spec.label.as_str())
    }
}

/// Looks up `key` inside the `scope` bundle, falling back to the dotted key.
pub fn translated(translations: &Translations, scope: &str, key: &str) -> String {
    translations
        .get(scope)
        .and_then(|bundle| bundle.get(key))
        .cloned()
        .unwrap_or_else(|| format!("{scope}.{key}"))
}

/// Result of a row action, as reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing about the list changed.
    Unchanged,
    /// The action is a placeholder; it was logged and did nothing else.
    NotImplemented(&'static str),
    /// The list must be fetched again with the unchanged query. When `notice`
    /// carries an alert key, the localized text is shown once the fetch is issued.
    Refetch { notice: Option<String> },
    /// The action failed; the controller moved to its failed phase.
    Failed(ListError),
}

/// Trait that any list screen must implement to be driven by `ListController`.
#[async_trait]
pub trait ListEntity: Send + Sync + 'static {
    /// Record as returned by the backend.
    type Record: Send + Debug + 'static;

    /// Display-ready row.
    type Row: Clone + Send + Sync + Debug + 'static;

    /// Parameter of the client-side narrowing (use `()` when there is none).
    type Scope: Clone + Send + Sync + Debug + 'static;

    /// Row actions offered by the screen.
    type Action: Send + Debug + 'static;

    /// Dependencies injected into [`ListEntity::handle_action`].
    type Context: Send + Sync + 'static;

    /// Translation scopes requested on every locale change.
    const LABEL_KEYS: &'static [&'static str];

    /// Filter fields the screen offers.
    const FILTER_FIELDS: &'static [&'static str];

    fn project(record: Self::Record) -> Self::Row;

    /// Whether fetched rows are narrowed for this scope. When they are, the total
    /// count becomes the number of retained rows instead of the server total.
    fn narrows(_scope: &Self::Scope) -> bool {
        false
    }

    fn retain(_row: &Self::Row, _scope: &Self::Scope) -> bool {
        true
    }

    fn labels(translations: &Translations) -> Labels;

    async fn handle_action(
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<ActionOutcome, ListError>;
}
