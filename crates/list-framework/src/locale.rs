//! # Locale Channel & Translation Capability
//!
//! Locale switches are published on a [`LocaleBus`]. Every controller holds its own
//! [`LocaleSubscription`]; dropping the subscription is the teardown, there is no
//! global listener to forget about.
//!
//! The bus is backed by a `tokio::sync::watch` channel, so:
//! - a fresh subscription first yields the currently active locale,
//! - rapid switches coalesce and a slow subscriber only sees the latest one.

use crate::error::ListError;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::watch;

/// Flat `key → text` map for one translation scope (e.g. `cockpit.table`).
pub type TranslationBundle = BTreeMap<String, String>;

/// Bundles by scope key, as requested by a list entity.
pub type Translations = BTreeMap<String, TranslationBundle>;

/// A language code such as `en` or `de`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale(String);

impl Locale {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// Renders a booking timestamp the way tables in this locale show dates.
    pub fn format_date(&self, value: NaiveDateTime) -> String {
        let pattern = match self.0.as_str() {
            "en" => "%m/%d/%Y %H:%M",
            "de" | "ru" | "pl" => "%d.%m.%Y %H:%M",
            "fr" | "es" | "ca" => "%d/%m/%Y %H:%M",
            _ => "%Y-%m-%d %H:%M",
        };
        value.format(pattern).to_string()
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Message delivered to subscribers when the active locale changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleChange {
    pub locale: Locale,
}

/// Publisher side of the locale channel. Cheap to clone.
#[derive(Clone)]
pub struct LocaleBus {
    sender: Arc<watch::Sender<Locale>>,
}

impl LocaleBus {
    pub fn new(initial: Locale) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Switches the active locale. Publishing the locale that is already active
    /// still notifies subscribers.
    pub fn publish(&self, locale: Locale) {
        tracing::debug!(%locale, "Publishing locale change");
        self.sender.send_replace(locale);
    }

    pub fn active(&self) -> Locale {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> LocaleSubscription {
        let receiver = self.sender.subscribe();
        let pending = Some(receiver.borrow().clone());
        LocaleSubscription { receiver, pending }
    }
}

/// Receiving side of the locale channel, owned by exactly one consumer.
pub struct LocaleSubscription {
    receiver: watch::Receiver<Locale>,
    pending: Option<Locale>,
}

impl LocaleSubscription {
    /// Waits for the next locale. Returns `None` once the bus is gone.
    pub async fn next(&mut self) -> Option<LocaleChange> {
        if let Some(locale) = self.pending.take() {
            return Some(LocaleChange { locale });
        }
        self.receiver.changed().await.ok()?;
        let locale = self.receiver.borrow_and_update().clone();
        Some(LocaleChange { locale })
    }
}

/// Source of localized strings.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Returns every string under `key` (a dotted scope such as `cockpit.users`)
    /// for the given locale.
    async fn translate(&self, key: &str, locale: &Locale) -> Result<TranslationBundle, ListError>;
}
