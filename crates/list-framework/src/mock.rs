//! # Mock Collaborators & Testing Guide
//!
//! In-memory stand-ins for the controller's collaborators, so a `ListController`
//! can be driven in tests without a backend, an i18n engine or a toast service.
//!
//! ## When to use which gateway
//!
//! | Feature | `create_mock_gateway` | `MockGateway` |
//! |---------|-----------------------|---------------|
//! | **Answers** | Manually, from the test body | Queued up front |
//! | **Resolution order** | Fully controlled | First in, first out |
//! | **Use Case** | Superseded requests, in-flight shutdown | Scenario tests |
//!
//! ## Pattern 1: Queued answers
//!
//! ```rust,ignore
//! let mut gateway = MockGateway::<ArchivedOrder>::new();
//! gateway.expect_fetch().return_ok(Some(Page::new(orders, 3)));
//!
//! let (controller, handle) = ListController::new(settings, scope);
//! tokio::spawn(controller.run(context_with(gateway.gateway())));
//!
//! handle.initialize().await?;
//! let snapshot = handle.settled().await?;
//! gateway.verify();
//! ```
//!
//! ## Pattern 2: Manual responders
//!
//! Use [`create_mock_gateway`] plus [`expect_fetch`] to hold a fetch open and
//! answer it later, e.g. answering page 3 before page 2.
//!
//! ```rust,ignore
//! let (gateway, mut calls) = create_mock_gateway::<AdminUser>(10);
//! handle.page(PageEvent { page_index: 1, page_size: 8 }).await?;
//! handle.page(PageEvent { page_index: 2, page_size: 8 }).await?;
//!
//! let (_, older) = expect_fetch(&mut calls).await.unwrap();
//! let (_, newer) = expect_fetch(&mut calls).await.unwrap();
//! newer.send(Ok(Some(page_three))).unwrap();
//! older.send(Ok(Some(page_two))).unwrap(); // discarded
//! ```

use crate::entity::ListEntity;
use crate::error::ListError;
use crate::gateway::{ListGateway, Page};
use crate::locale::{Locale, TranslationBundle, Translator};
use crate::notice::{Notice, Notifier};
use crate::query::RequestDescriptor;
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Reply channel of a fetch captured by a channel gateway.
pub type FetchResponder<E> =
    oneshot::Sender<Result<Option<Page<<E as ListEntity>::Record>>, ListError>>;

/// A fetch that reached the channel gateway and waits for an answer.
pub struct FetchCall<E: ListEntity> {
    pub descriptor: RequestDescriptor,
    pub respond_to: FetchResponder<E>,
}

/// Gateway that forwards each fetch to a channel the test reads from.
pub struct ChannelGateway<E: ListEntity> {
    sender: mpsc::Sender<FetchCall<E>>,
}

#[async_trait]
impl<E: ListEntity> ListGateway<E> for ChannelGateway<E> {
    async fn fetch_page(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<Option<Page<E::Record>>, ListError> {
        let (respond_to, response) = oneshot::channel();
        let call = FetchCall {
            descriptor: descriptor.clone(),
            respond_to,
        };
        self.sender
            .send(call)
            .await
            .map_err(|_| ListError::Network("mock gateway closed".to_string()))?;
        response
            .await
            .map_err(|_| ListError::Network("mock responder dropped".to_string()))?
    }
}

/// Creates a gateway and a receiver for answering its fetches by hand.
pub fn create_mock_gateway<E: ListEntity>(
    buffer_size: usize,
) -> (Arc<dyn ListGateway<E>>, mpsc::Receiver<FetchCall<E>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (Arc::new(ChannelGateway { sender }), receiver)
}

/// Helper to take the next fetch from a channel gateway.
pub async fn expect_fetch<E: ListEntity>(
    receiver: &mut mpsc::Receiver<FetchCall<E>>,
) -> Option<(RequestDescriptor, FetchResponder<E>)> {
    receiver
        .recv()
        .await
        .map(|call| (call.descriptor, call.respond_to))
}

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

type FetchResult<E> = Result<Option<Page<<E as ListEntity>::Record>>, ListError>;

struct MockState<E: ListEntity> {
    expectations: VecDeque<FetchResult<E>>,
    requests: Vec<RequestDescriptor>,
    unexpected: usize,
}

/// A gateway with queued answers and request recording.
///
/// # Example
/// ```ignore
/// let mut mock = MockGateway::<AdminUser>::new();
/// mock.expect_fetch().return_ok(Some(Page::new(users, 2)));
/// mock.expect_fetch().return_err(ListError::Network("down".into()));
///
/// let gateway = mock.gateway();
/// // Use gateway in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockGateway<E: ListEntity> {
    state: Arc<Mutex<MockState<E>>>,
}

impl<E: ListEntity> Clone for MockGateway<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<E: ListEntity> Default for MockGateway<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ListEntity> MockGateway<E> {
    /// Creates a mock gateway with no expectations.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                expectations: VecDeque::new(),
                requests: Vec::new(),
                unexpected: 0,
            })),
        }
    }

    /// Returns the gateway for use in a controller context.
    pub fn gateway(&self) -> Arc<dyn ListGateway<E>> {
        Arc::new(self.clone())
    }

    /// Expects one more fetch.
    pub fn expect_fetch(&mut self) -> FetchExpectationBuilder<E> {
        FetchExpectationBuilder {
            state: Arc::clone(&self.state),
        }
    }

    /// Every descriptor fetched so far, in arrival order.
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Verifies that all expectations were met and nothing else was fetched.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
        if state.unexpected > 0 {
            panic!("{} unexpected fetch(es)", state.unexpected);
        }
    }
}

#[async_trait]
impl<E: ListEntity> ListGateway<E> for MockGateway<E> {
    async fn fetch_page(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<Option<Page<E::Record>>, ListError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(descriptor.clone());
        match state.expectations.pop_front() {
            Some(result) => result,
            None => {
                state.unexpected += 1;
                Err(ListError::Network("unexpected fetch".to_string()))
            }
        }
    }
}

/// Builder for `fetch` expectations.
pub struct FetchExpectationBuilder<E: ListEntity> {
    state: Arc<Mutex<MockState<E>>>,
}

impl<E: ListEntity> FetchExpectationBuilder<E> {
    /// Sets the expectation to return a page (or the empty answer for `None`).
    pub fn return_ok(self, page: Option<Page<E::Record>>) {
        self.state.lock().unwrap().expectations.push_back(Ok(page));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ListError) {
        self.state.lock().unwrap().expectations.push_back(Err(error));
    }
}

/// Translator backed by a fixed `locale → scope → bundle` table.
///
/// Unknown scopes translate to an empty bundle; a locale registered with
/// [`MockTranslator::fail_for`] fails every lookup, and one registered with
/// [`MockTranslator::delay_for`] answers each lookup late.
#[derive(Clone, Default)]
pub struct MockTranslator {
    bundles: Arc<Mutex<BTreeMap<(String, String), TranslationBundle>>>,
    failing: Arc<Mutex<Vec<String>>>,
    delays: Arc<Mutex<BTreeMap<String, Duration>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the strings of `scope` for `locale`.
    pub fn with_bundle(self, locale: &str, scope: &str, entries: &[(&str, &str)]) -> Self {
        let bundle = entries
            .iter()
            .map(|(key, text)| (key.to_string(), text.to_string()))
            .collect();
        self.bundles
            .lock()
            .unwrap()
            .insert((locale.to_string(), scope.to_string()), bundle);
        self
    }

    pub fn fail_for(self, locale: &str) -> Self {
        self.failing.lock().unwrap().push(locale.to_string());
        self
    }

    pub fn delay_for(self, locale: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(locale.to_string(), delay);
        self
    }

    /// `(locale, scope)` pairs requested so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, key: &str, locale: &Locale) -> Result<TranslationBundle, ListError> {
        self.calls
            .lock()
            .unwrap()
            .push((locale.code().to_string(), key.to_string()));
        let delay = self.delays.lock().unwrap().get(locale.code()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().iter().any(|code| code == locale.code()) {
            return Err(ListError::Network(format!("no catalog for {locale}")));
        }
        let bundles = self.bundles.lock().unwrap();
        Ok(bundles
            .get(&(locale.code().to_string(), key.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

/// Notifier that records every notice.
#[derive(Clone, Default)]
pub struct MockNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ActionOutcome, Labels};
    use crate::locale::Translations;
    use crate::query::{build_descriptor, FilterSet, PageSizes, Pageable};

    #[derive(Debug)]
    struct Dummy;

    #[async_trait]
    impl ListEntity for Dummy {
        type Record = u32;
        type Row = u32;
        type Scope = ();
        type Action = ();
        type Context = ();

        const LABEL_KEYS: &'static [&'static str] = &[];
        const FILTER_FIELDS: &'static [&'static str] = &[];

        fn project(record: u32) -> u32 {
            record
        }

        fn labels(_translations: &Translations) -> Labels {
            Labels::default()
        }

        async fn handle_action(_action: (), _ctx: &()) -> Result<ActionOutcome, ListError> {
            Ok(ActionOutcome::Unchanged)
        }
    }

    fn descriptor() -> RequestDescriptor {
        build_descriptor(&Pageable::first(8), &FilterSet::new(), &PageSizes::new([8])).unwrap()
    }

    #[tokio::test]
    async fn test_mock_gateway_answers_in_order() {
        let mut mock = MockGateway::<Dummy>::new();
        mock.expect_fetch().return_ok(Some(Page::new(vec![1, 2], 2)));
        mock.expect_fetch().return_err(ListError::Network("down".to_string()));

        let gateway = mock.gateway();
        let page = gateway.fetch_page(&descriptor()).await.unwrap().unwrap();
        assert_eq!(page.content, vec![1, 2]);
        assert!(gateway.fetch_page(&descriptor()).await.is_err());

        assert_eq!(mock.requests().len(), 2);
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "unexpected fetch")]
    async fn test_mock_gateway_flags_unexpected_fetch() {
        let mock = MockGateway::<Dummy>::new();
        let _ = mock.gateway().fetch_page(&descriptor()).await;
        mock.verify();
    }

    #[tokio::test]
    async fn test_channel_gateway_waits_for_responder() {
        let (gateway, mut calls) = create_mock_gateway::<Dummy>(4);
        let fetch = tokio::spawn(async move { gateway.fetch_page(&descriptor()).await });

        let (seen, respond_to) = expect_fetch(&mut calls).await.unwrap();
        assert_eq!(seen.pageable.page_size, 8);
        respond_to.send(Ok(None)).unwrap();

        assert_eq!(fetch.await.unwrap(), Ok(None));
    }

    #[tokio::test]
    async fn test_mock_translator_lookup() {
        let translator = MockTranslator::new()
            .with_bundle("en", "cockpit.users", &[("emailH", "Email")])
            .fail_for("xx");

        let bundle = translator
            .translate("cockpit.users", &Locale::new("en"))
            .await
            .unwrap();
        assert_eq!(bundle.get("emailH").map(String::as_str), Some("Email"));
        assert!(translator
            .translate("cockpit.users", &Locale::new("de"))
            .await
            .unwrap()
            .is_empty());
        assert!(translator.translate("cockpit.users", &Locale::new("xx")).await.is_err());
        assert_eq!(translator.calls().len(), 3);
    }
}
