//! # List-View Controller
//!
//! This module defines the `ListController`, the single owner of one screen's
//! paging/sort/filter state. It implements the "server" half of the pattern:
//! UI commands arrive over a channel and are processed one at a time.
//!
//! ## Phases
//!
//! `Idle → Loading → Loaded | Failed`. Any later transition re-enters `Loading`.
//!
//! ## Ordering
//!
//! Fetches and translation lookups run in spawned tasks and report back through an
//! internal completion channel. Each one is tagged with a sequence number; a
//! completion that is not the latest issued is logged and dropped, so a slow answer
//! for page 2 can never overwrite the answer for page 3.
//!
//! Row actions run in spawned tasks too. Their caller is answered once the outcome
//! has been applied, so a slow backend call never stalls the mailbox.
//!
//! ## Teardown
//!
//! The loop ends when every handle is dropped or `Shutdown` arrives. In-flight tasks
//! are aborted and the locale subscription is dropped with the context.

use crate::entity::{ActionOutcome, Labels, ListEntity};
use crate::error::{ControllerError, ListError};
use crate::gateway::{ListGateway, Page};
use crate::handle::ListHandle;
use crate::locale::{Locale, LocaleChange, LocaleSubscription, Translations, Translator};
use crate::message::{ListRequest, RequestTicket, Response};
use crate::notice::{Notice, Notifier};
use crate::query::{build_descriptor, FilterSet, PageSizes, Pageable, RequestDescriptor};
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

/// Lifecycle phase of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Everything the UI renders, published after every state change.
#[derive(Debug, Clone)]
pub struct ListSnapshot<R> {
    pub phase: ListPhase,
    pub rows: Vec<R>,
    /// `None` until the first successful fetch; left stale by failures.
    pub total_count: Option<u64>,
    pub pageable: Pageable,
    pub filters: FilterSet,
    pub labels: Labels,
    /// Locale used for column labels and date display.
    pub locale: Option<Locale>,
    pub last_error: Option<ListError>,
    /// Sequence number of the latest issued fetch.
    pub seq: u64,
}

/// Static settings of one controller.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub page_sizes: PageSizes,
    pub default_page_size: u32,
    pub buffer_size: usize,
}

/// Collaborators injected into [`ListController::run`].
pub struct ControllerContext<E: ListEntity> {
    pub gateway: Arc<dyn ListGateway<E>>,
    pub translator: Arc<dyn Translator>,
    pub notifier: Arc<dyn Notifier>,
    /// `None` keeps the labels empty for the controller's lifetime.
    pub locales: Option<LocaleSubscription>,
    pub entity: E::Context,
}

enum Completion<E: ListEntity> {
    Fetched {
        seq: u64,
        result: Result<Option<Page<E::Record>>, ListError>,
    },
    Translated {
        seq: u64,
        locale: Locale,
        result: Result<Translations, ListError>,
    },
    Acted {
        result: Result<ActionOutcome, ListError>,
        respond_to: Response<ActionOutcome>,
    },
}

/// [`ControllerContext`] as held by the running loop.
struct Wiring<E: ListEntity> {
    gateway: Arc<dyn ListGateway<E>>,
    translator: Arc<dyn Translator>,
    notifier: Arc<dyn Notifier>,
    entity: Arc<E::Context>,
}

/// The generic controller behind one table screen.
///
/// Create it with [`ListController::new`], hand the returned [`ListHandle`] to the
/// UI side and spawn [`ListController::run`] with the collaborators.
pub struct ListController<E: ListEntity> {
    receiver: mpsc::Receiver<ListRequest<E>>,
    completions: mpsc::UnboundedReceiver<Completion<E>>,
    core: ControllerCore<E>,
}

struct ControllerCore<E: ListEntity> {
    entity_type: &'static str,
    page_sizes: PageSizes,
    pageable: Pageable,
    filters: FilterSet,
    scope: E::Scope,
    phase: ListPhase,
    rows: Vec<E::Row>,
    total_count: Option<u64>,
    labels: Labels,
    locale: Option<Locale>,
    last_error: Option<ListError>,
    fetch_seq: u64,
    label_seq: u64,
    completer: mpsc::UnboundedSender<Completion<E>>,
    in_flight: Vec<AbortHandle>,
    state: watch::Sender<ListSnapshot<E::Row>>,
}

impl<E: ListEntity> ListController<E> {
    /// Creates a controller and its handle. Nothing is fetched until the handle
    /// calls `initialize`.
    pub fn new(settings: ControllerSettings, scope: E::Scope) -> (Self, ListHandle<E>) {
        let (sender, receiver) = mpsc::channel(settings.buffer_size);
        let (completer, completions) = mpsc::unbounded_channel();

        // Extract just the type name (e.g., "AdminUser" instead of "cockpit::admin_users::AdminUser")
        let entity_type = std::any::type_name::<E>()
            .split("::")
            .last()
            .unwrap_or("Unknown");

        let pageable = Pageable::first(settings.default_page_size);
        let filters = FilterSet::with_fields(E::FILTER_FIELDS);
        let initial = ListSnapshot {
            phase: ListPhase::Idle,
            rows: Vec::new(),
            total_count: None,
            pageable: pageable.clone(),
            filters: filters.clone(),
            labels: Labels::default(),
            locale: None,
            last_error: None,
            seq: 0,
        };
        let (state, state_rx) = watch::channel(initial);

        let core = ControllerCore {
            entity_type,
            page_sizes: settings.page_sizes,
            pageable,
            filters,
            scope,
            phase: ListPhase::Idle,
            rows: Vec::new(),
            total_count: None,
            labels: Labels::default(),
            locale: None,
            last_error: None,
            fetch_seq: 0,
            label_seq: 0,
            completer,
            in_flight: Vec::new(),
            state,
        };

        let controller = Self {
            receiver,
            completions,
            core,
        };
        (controller, ListHandle::new(sender, state_rx))
    }

    /// Runs the controller's event loop until every handle is gone or `Shutdown`
    /// is received.
    pub async fn run(self, context: ControllerContext<E>) {
        let ListController {
            mut receiver,
            mut completions,
            mut core,
        } = self;
        let ControllerContext {
            gateway,
            translator,
            notifier,
            mut locales,
            entity,
        } = context;
        let wiring = Wiring {
            gateway,
            translator,
            notifier,
            entity: Arc::new(entity),
        };
        let entity_type = core.entity_type;
        info!(entity_type, "Controller started");

        loop {
            tokio::select! {
                request = receiver.recv() => {
                    let Some(request) = request else { break };
                    if core.handle(request, &wiring).is_break() {
                        break;
                    }
                }
                Some(completion) = completions.recv() => core.complete(completion, &wiring),
                change = next_locale(&mut locales) => core.relabel(change, &wiring),
            }
        }

        core.abort_in_flight();
        info!(entity_type, rows = core.rows.len(), "Shutdown");
    }
}

async fn next_locale(locales: &mut Option<LocaleSubscription>) -> LocaleChange {
    if let Some(subscription) = locales.as_mut() {
        if let Some(change) = subscription.next().await {
            return change;
        }
        debug!("Locale bus closed");
    }
    *locales = None;
    std::future::pending().await
}

async fn load_translations(
    translator: &dyn Translator,
    keys: &[&str],
    locale: &Locale,
) -> Result<Translations, ListError> {
    let mut translations = Translations::new();
    for key in keys {
        let bundle = translator.translate(key, locale).await?;
        translations.insert(key.to_string(), bundle);
    }
    Ok(translations)
}

impl<E: ListEntity> ControllerCore<E> {
    fn handle(&mut self, request: ListRequest<E>, ctx: &Wiring<E>) -> ControlFlow<()> {
        let entity_type = self.entity_type;
        match request {
            ListRequest::Initialize { respond_to } => {
                debug!(entity_type, "Initialize");
                let result = self.transition(self.pageable.clone(), self.filters.clone(), ctx);
                let _ = respond_to.send(result);
            }
            ListRequest::Page { event, respond_to } => {
                debug!(entity_type, ?event, "Page");
                let result = self.transition(self.pageable.with_page(event), self.filters.clone(), ctx);
                let _ = respond_to.send(result);
            }
            ListRequest::Sort { event, respond_to } => {
                debug!(entity_type, ?event, "Sort");
                let result = self.transition(self.pageable.with_sort(&event), self.filters.clone(), ctx);
                let _ = respond_to.send(result);
            }
            ListRequest::ApplyFilters { filters, respond_to } => {
                debug!(entity_type, ?filters, "ApplyFilters");
                let result = match self.filters.merged(&filters) {
                    Ok(merged) => self.transition(self.pageable.rewound(), merged, ctx),
                    Err(e) => {
                        warn!(entity_type, error = %e, "Filters rejected");
                        Err(e.into())
                    }
                };
                let _ = respond_to.send(result);
            }
            ListRequest::ClearFilters { respond_to } => {
                debug!(entity_type, "ClearFilters");
                let result = self.transition(self.pageable.rewound(), self.filters.cleared(), ctx);
                let _ = respond_to.send(result);
            }
            ListRequest::Reload { respond_to } => {
                debug!(entity_type, "Reload");
                let result = self.transition(self.pageable.clone(), self.filters.clone(), ctx);
                let _ = respond_to.send(result);
            }
            ListRequest::Scope { scope, respond_to } => {
                debug!(entity_type, ?scope, "Scope");
                self.scope = scope;
                let result = self.transition(self.pageable.rewound(), self.filters.clone(), ctx);
                let _ = respond_to.send(result);
            }
            ListRequest::Action { action, respond_to } => self.perform(action, respond_to, ctx),
            ListRequest::Shutdown => {
                debug!(entity_type, "Shutdown requested");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Validates the next query, commits it and issues the fetch.
    fn transition(
        &mut self,
        pageable: Pageable,
        filters: FilterSet,
        ctx: &Wiring<E>,
    ) -> Result<RequestTicket, ControllerError> {
        let descriptor = build_descriptor(&pageable, &filters, &self.page_sizes).map_err(|e| {
            warn!(entity_type = self.entity_type, error = %e, "Transition rejected");
            e
        })?;
        self.pageable = pageable;
        self.filters = filters;
        Ok(self.dispatch(descriptor, ctx))
    }

    fn dispatch(&mut self, descriptor: RequestDescriptor, ctx: &Wiring<E>) -> RequestTicket {
        self.fetch_seq += 1;
        let seq = self.fetch_seq;
        self.phase = ListPhase::Loading;
        info!(
            entity_type = self.entity_type,
            seq,
            page = descriptor.pageable.page_number,
            size = descriptor.pageable.page_size,
            "Fetching page"
        );

        let gateway = Arc::clone(&ctx.gateway);
        let completer = self.completer.downgrade();
        let request = descriptor.clone();
        let task = tokio::spawn(async move {
            let result = gateway.fetch_page(&request).await;
            if let Some(completer) = completer.upgrade() {
                let _ = completer.send(Completion::Fetched { seq, result });
            }
        });
        self.track(task.abort_handle());
        self.publish();

        RequestTicket { seq, descriptor }
    }

    fn perform(&mut self, action: E::Action, respond_to: Response<ActionOutcome>, ctx: &Wiring<E>) {
        debug!(entity_type = self.entity_type, ?action, "Action");

        let entity = Arc::clone(&ctx.entity);
        let completer = self.completer.downgrade();
        let task = tokio::spawn(async move {
            let result = E::handle_action(action, &entity).await;
            if let Some(completer) = completer.upgrade() {
                let _ = completer.send(Completion::Acted { result, respond_to });
            }
        });
        self.track(task.abort_handle());
    }

    fn apply_outcome(&mut self, result: Result<ActionOutcome, ListError>, ctx: &Wiring<E>) -> ActionOutcome {
        let entity_type = self.entity_type;
        match result {
            Ok(ActionOutcome::Refetch { notice }) => {
                if let Err(e) = self.transition(self.pageable.clone(), self.filters.clone(), ctx) {
                    warn!(entity_type, error = %e, "Refetch after action failed");
                }
                if let Some(key) = &notice {
                    ctx.notifier.notify(Notice::success(self.labels.alert(key)));
                }
                info!(entity_type, "Action ok");
                ActionOutcome::Refetch { notice }
            }
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(entity_type, error = %error, "Action failed");
                // Outdate any fetch still in flight so it cannot resurrect the rows.
                self.fetch_seq += 1;
                self.fail(error.clone());
                ctx.notifier.notify(Notice::error(error.to_string()));
                ActionOutcome::Failed(error)
            }
        }
    }

    fn complete(&mut self, completion: Completion<E>, ctx: &Wiring<E>) {
        match completion {
            Completion::Fetched { seq, result } => self.apply_page(seq, result),
            Completion::Translated {
                seq,
                locale,
                result,
            } => self.apply_labels(seq, locale, result),
            Completion::Acted { result, respond_to } => {
                let outcome = self.apply_outcome(result, ctx);
                let _ = respond_to.send(Ok(outcome));
            }
        }
    }

    fn apply_page(&mut self, seq: u64, result: Result<Option<Page<E::Record>>, ListError>) {
        let entity_type = self.entity_type;
        if seq != self.fetch_seq {
            debug!(entity_type, seq, latest = self.fetch_seq, "Discarding superseded page");
            return;
        }

        match result {
            Ok(page) => {
                let (records, server_total) = match page {
                    Some(page) => (page.content, page.total_elements),
                    None => (Vec::new(), 0),
                };
                let rows = records.into_iter().map(E::project);
                if E::narrows(&self.scope) {
                    self.rows = rows.filter(|row| E::retain(row, &self.scope)).collect();
                    self.total_count = Some(self.rows.len() as u64);
                } else {
                    self.rows = rows.collect();
                    self.total_count = Some(server_total);
                }
                self.phase = ListPhase::Loaded;
                self.last_error = None;
                info!(entity_type, seq, rows = self.rows.len(), total = server_total, "Page loaded");
                self.publish();
            }
            Err(error) => {
                warn!(entity_type, seq, error = %error, "Fetch failed");
                self.fail(error);
            }
        }
    }

    /// Rows collapse to empty; the total count is deliberately left as it was.
    fn fail(&mut self, error: ListError) {
        self.phase = ListPhase::Failed;
        self.rows.clear();
        self.last_error = Some(error);
        self.publish();
    }

    fn relabel(&mut self, change: LocaleChange, ctx: &Wiring<E>) {
        self.label_seq += 1;
        let seq = self.label_seq;
        debug!(entity_type = self.entity_type, locale = %change.locale, seq, "Locale changed");

        let translator = Arc::clone(&ctx.translator);
        let completer = self.completer.downgrade();
        let keys = E::LABEL_KEYS;
        let task = tokio::spawn(async move {
            let locale = change.locale;
            let result = load_translations(translator.as_ref(), keys, &locale).await;
            if let Some(completer) = completer.upgrade() {
                let _ = completer.send(Completion::Translated {
                    seq,
                    locale,
                    result,
                });
            }
        });
        self.track(task.abort_handle());
    }

    fn apply_labels(&mut self, seq: u64, locale: Locale, result: Result<Translations, ListError>) {
        let entity_type = self.entity_type;
        if seq != self.label_seq {
            debug!(entity_type, seq, latest = self.label_seq, "Discarding superseded labels");
            return;
        }

        match result {
            Ok(translations) => {
                self.labels = E::labels(&translations);
                info!(entity_type, %locale, columns = self.labels.columns.len(), "Labels rebuilt");
                self.locale = Some(locale);
                self.publish();
            }
            Err(error) => warn!(entity_type, %locale, error = %error, "Translation failed"),
        }
    }

    fn track(&mut self, task: AbortHandle) {
        self.in_flight.retain(|task| !task.is_finished());
        self.in_flight.push(task);
    }

    fn abort_in_flight(&mut self) {
        for task in self.in_flight.drain(..) {
            task.abort();
        }
    }

    fn publish(&self) {
        self.state.send_replace(ListSnapshot {
            phase: self.phase,
            rows: self.rows.clone(),
            total_count: self.total_count,
            pageable: self.pageable.clone(),
            filters: self.filters.clone(),
            labels: self.labels.clone(),
            locale: self.locale.clone(),
            last_error: self.last_error.clone(),
            seq: self.fetch_seq,
        });
    }
}
