use async_trait::async_trait;
use list_framework::mock::{create_mock_gateway, expect_fetch, MockGateway, MockNotifier, MockTranslator};
use list_framework::{
    translated, ActionOutcome, ColumnSpec, ControllerContext, ControllerError, ControllerSettings,
    FilterSet, FilterValue, Labels, ListController, ListEntity, ListError, ListGateway, ListHandle,
    ListPhase, Locale, LocaleBus, NoticeKind, Page, PageEvent, PageSizes, QueryError, SortDirection,
    SortEvent, Translations, NOTICE_DURATION,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Ticket {
    id: u32,
    lane: &'static str,
}

#[derive(Debug)]
enum TicketAction {
    Close(u32),
    Jam,
    Peek,
    /// Never finishes.
    Stall,
}

#[async_trait]
impl ListEntity for Ticket {
    type Record = Ticket;
    type Row = Ticket;
    type Scope = Option<&'static str>;
    type Action = TicketAction;
    type Context = Arc<Mutex<Vec<u32>>>;

    const LABEL_KEYS: &'static [&'static str] = &["board.columns", "board.alerts"];
    const FILTER_FIELDS: &'static [&'static str] = &["title", "opened"];

    fn project(record: Ticket) -> Ticket {
        record
    }

    fn narrows(scope: &Self::Scope) -> bool {
        scope.is_some()
    }

    fn retain(row: &Ticket, scope: &Self::Scope) -> bool {
        scope.map_or(true, |lane| row.lane == lane)
    }

    fn labels(translations: &Translations) -> Labels {
        Labels {
            columns: vec![
                ColumnSpec::new("id", translated(translations, "board.columns", "idH")),
                ColumnSpec::new("lane", translated(translations, "board.columns", "laneH")),
            ],
            values: Vec::new(),
            alerts: translations.get("board.alerts").cloned().unwrap_or_default(),
        }
    }

    async fn handle_action(
        action: TicketAction,
        ctx: &Self::Context,
    ) -> Result<ActionOutcome, ListError> {
        match action {
            TicketAction::Close(id) => {
                ctx.lock().unwrap().push(id);
                Ok(ActionOutcome::Refetch {
                    notice: Some("closed".to_string()),
                })
            }
            TicketAction::Jam => Err(ListError::Server {
                status: 500,
                message: "jammed".to_string(),
            }),
            TicketAction::Peek => Ok(ActionOutcome::Unchanged),
            TicketAction::Stall => std::future::pending().await,
        }
    }
}

fn ticket(id: u32, lane: &'static str) -> Ticket {
    Ticket { id, lane }
}

fn settings() -> ControllerSettings {
    ControllerSettings {
        page_sizes: PageSizes::new(vec![8, 16, 24]),
        default_page_size: 8,
        buffer_size: 16,
    }
}

struct Harness {
    handle: ListHandle<Ticket>,
    notifier: MockNotifier,
    closed: Arc<Mutex<Vec<u32>>>,
    task: tokio::task::JoinHandle<()>,
}

fn start(
    gateway: Arc<dyn ListGateway<Ticket>>,
    translator: MockTranslator,
    bus: Option<&LocaleBus>,
    scope: Option<&'static str>,
) -> Harness {
    let notifier = MockNotifier::new();
    let closed = Arc::new(Mutex::new(Vec::new()));
    let (controller, handle) = ListController::<Ticket>::new(settings(), scope);
    let task = tokio::spawn(controller.run(ControllerContext {
        gateway,
        translator: Arc::new(translator),
        notifier: Arc::new(notifier.clone()),
        locales: bus.map(LocaleBus::subscribe),
        entity: closed.clone(),
    }));
    Harness {
        handle,
        notifier,
        closed,
        task,
    }
}

#[tokio::test]
async fn test_initialize_loads_first_page_with_server_total() {
    let mut mock = MockGateway::<Ticket>::new();
    mock.expect_fetch()
        .return_ok(Some(Page::new(vec![ticket(1, "todo"), ticket(2, "done")], 40)));

    let harness = start(mock.gateway(), MockTranslator::new(), None, None);
    assert_eq!(harness.handle.snapshot().phase, ListPhase::Idle);

    let ticket_sent = harness.handle.initialize().await.unwrap();
    assert_eq!(ticket_sent.seq, 1);
    assert_eq!(ticket_sent.descriptor.pageable.page_size, 8);
    assert_eq!(ticket_sent.descriptor.pageable.page_number, 0);

    let snapshot = harness.handle.settled().await.unwrap();
    assert_eq!(snapshot.phase, ListPhase::Loaded);
    assert_eq!(snapshot.rows.len(), 2);
    assert_eq!(snapshot.total_count, Some(40));
    assert!(snapshot.last_error.is_none());

    mock.verify();
    drop(harness.handle);
    harness.task.await.unwrap();
}

#[tokio::test]
async fn test_clear_filters_rewinds_to_first_page() {
    let mut mock = MockGateway::<Ticket>::new();
    for _ in 0..3 {
        mock.expect_fetch().return_ok(Some(Page::new(vec![ticket(1, "todo")], 30)));
    }

    let harness = start(mock.gateway(), MockTranslator::new(), None, None);
    harness
        .handle
        .apply_filters(FilterSet::new().set("title", FilterValue::text("printer")))
        .await
        .unwrap();
    harness
        .handle
        .page(PageEvent {
            page_index: 3,
            page_size: 8,
        })
        .await
        .unwrap();
    assert_eq!(harness.handle.snapshot().pageable.page_number, 3);

    let cleared = harness.handle.clear_filters().await.unwrap();
    assert_eq!(cleared.descriptor.pageable.page_number, 0);
    assert!(cleared.descriptor.filters.is_empty());

    let snapshot = harness.handle.settled().await.unwrap();
    assert_eq!(snapshot.pageable.page_number, 0);
    assert!(snapshot.filters.is_unconstrained());

    let requests = mock.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].pageable.page_number, 3);
    assert_eq!(
        requests[1].filters.get("title"),
        Some(&FilterValue::text("printer"))
    );
    assert_eq!(requests[2].pageable.page_number, 0);
}

#[tokio::test]
async fn test_filters_rewind_page_and_sort_keeps_page() {
    let mut mock = MockGateway::<Ticket>::new();
    for _ in 0..3 {
        mock.expect_fetch().return_ok(None);
    }
    let harness = start(mock.gateway(), MockTranslator::new(), None, None);

    harness
        .handle
        .page(PageEvent {
            page_index: 2,
            page_size: 16,
        })
        .await
        .unwrap();
    let sorted = harness
        .handle
        .sort(SortEvent::new("id", Some(SortDirection::Desc)))
        .await
        .unwrap();
    assert_eq!(sorted.descriptor.pageable.page_number, 2);
    assert_eq!(sorted.descriptor.pageable.sort.len(), 1);

    let filtered = harness
        .handle
        .apply_filters(FilterSet::new().set("title", FilterValue::text("jam")))
        .await
        .unwrap();
    assert_eq!(filtered.descriptor.pageable.page_number, 0);
    assert_eq!(filtered.descriptor.pageable.page_size, 16);
    assert_eq!(filtered.descriptor.pageable.sort.len(), 1);

    let snapshot = harness.handle.settled().await.unwrap();
    assert_eq!(snapshot.total_count, Some(0));
    assert!(snapshot.rows.is_empty());
    assert_eq!(snapshot.filters.get("title"), Some(&FilterValue::text("jam")));
    assert_eq!(snapshot.filters.get("opened"), None);
    mock.verify();
}

#[tokio::test]
async fn test_rejected_transitions_leave_state_untouched() {
    let mut mock = MockGateway::<Ticket>::new();
    mock.expect_fetch().return_ok(Some(Page::new(vec![ticket(1, "todo")], 1)));
    let harness = start(mock.gateway(), MockTranslator::new(), None, None);

    harness.handle.initialize().await.unwrap();
    let before = harness.handle.settled().await.unwrap();

    let result = harness
        .handle
        .page(PageEvent {
            page_index: 1,
            page_size: 10,
        })
        .await;
    assert_eq!(
        result,
        Err(ControllerError::Query(QueryError::PageSizeNotAllowed(10)))
    );

    let result = harness
        .handle
        .apply_filters(FilterSet::new().set("assignee", FilterValue::text("kim")))
        .await;
    assert_eq!(
        result,
        Err(ControllerError::Query(QueryError::UnknownFilter(
            "assignee".to_string()
        )))
    );

    let after = harness.handle.snapshot();
    assert_eq!(after.pageable, before.pageable);
    assert_eq!(after.filters, before.filters);
    assert_eq!(after.seq, 1);
    mock.verify();
}

#[tokio::test]
async fn test_superseded_page_is_discarded() {
    let (gateway, mut calls) = create_mock_gateway::<Ticket>(8);
    let harness = start(gateway, MockTranslator::new(), None, None);

    let older = harness
        .handle
        .page(PageEvent {
            page_index: 1,
            page_size: 8,
        })
        .await
        .unwrap();
    let newer = harness
        .handle
        .page(PageEvent {
            page_index: 2,
            page_size: 8,
        })
        .await
        .unwrap();
    assert!(newer.seq > older.seq);

    let (first, page_two) = expect_fetch(&mut calls).await.unwrap();
    let (second, page_three) = expect_fetch(&mut calls).await.unwrap();
    assert_eq!(first.pageable.page_number, 1);
    assert_eq!(second.pageable.page_number, 2);

    // The newer request resolves first; the older one must not overwrite it.
    page_three
        .send(Ok(Some(Page::new(vec![ticket(3, "todo")], 24))))
        .unwrap();
    let snapshot = harness.handle.settled().await.unwrap();
    assert_eq!(snapshot.rows, vec![ticket(3, "todo")]);

    page_two
        .send(Ok(Some(Page::new(vec![ticket(2, "todo")], 24))))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let snapshot = harness.handle.snapshot();
    assert_eq!(snapshot.rows, vec![ticket(3, "todo")]);
    assert_eq!(snapshot.pageable.page_number, 2);
    assert_eq!(snapshot.seq, newer.seq);
}

#[tokio::test]
async fn test_failure_empties_rows_and_keeps_stale_total() {
    let mut mock = MockGateway::<Ticket>::new();
    mock.expect_fetch()
        .return_ok(Some(Page::new(vec![ticket(1, "todo"), ticket(2, "todo")], 17)));
    mock.expect_fetch().return_err(ListError::Server {
        status: 503,
        message: "unavailable".to_string(),
    });
    mock.expect_fetch().return_ok(Some(Page::new(vec![ticket(9, "todo")], 18)));

    let harness = start(mock.gateway(), MockTranslator::new(), None, None);
    harness.handle.initialize().await.unwrap();
    assert_eq!(harness.handle.settled().await.unwrap().total_count, Some(17));

    harness
        .handle
        .page(PageEvent {
            page_index: 1,
            page_size: 8,
        })
        .await
        .unwrap();
    let failed = harness.handle.settled().await.unwrap();
    assert_eq!(failed.phase, ListPhase::Failed);
    assert!(failed.rows.is_empty());
    assert_eq!(failed.total_count, Some(17));
    assert!(matches!(
        failed.last_error,
        Some(ListError::Server { status: 503, .. })
    ));

    // Manual retry re-issues the same query.
    let retry = harness.handle.reload().await.unwrap();
    assert_eq!(retry.descriptor.pageable.page_number, 1);
    let recovered = harness.handle.settled().await.unwrap();
    assert_eq!(recovered.phase, ListPhase::Loaded);
    assert_eq!(recovered.total_count, Some(18));
    assert!(recovered.last_error.is_none());
    mock.verify();
}

#[tokio::test]
async fn test_scope_narrows_rows_and_counts_retained_rows() {
    let mut mock = MockGateway::<Ticket>::new();
    let page = || {
        Some(Page::new(
            vec![ticket(1, "todo"), ticket(2, "done"), ticket(3, "todo")],
            3,
        ))
    };
    mock.expect_fetch().return_ok(page());
    mock.expect_fetch().return_ok(page());

    let harness = start(mock.gateway(), MockTranslator::new(), None, Some("done"));
    harness.handle.initialize().await.unwrap();
    let narrowed = harness.handle.settled().await.unwrap();
    assert_eq!(narrowed.rows, vec![ticket(2, "done")]);
    assert_eq!(narrowed.total_count, Some(1));

    let ticket_sent = harness.handle.set_scope(None).await.unwrap();
    assert_eq!(ticket_sent.descriptor.pageable.page_number, 0);
    let everything = harness.handle.settled().await.unwrap();
    assert_eq!(everything.rows.len(), 3);
    assert_eq!(everything.total_count, Some(3));
}

#[tokio::test]
async fn test_refetch_action_reissues_query_and_notifies() {
    let mut mock = MockGateway::<Ticket>::new();
    mock.expect_fetch().return_ok(Some(Page::new(vec![ticket(42, "todo")], 1)));
    mock.expect_fetch().return_ok(Some(Page::new(vec![], 0)));

    let translator = MockTranslator::new().with_bundle("en", "board.alerts", &[("closed", "Ticket closed")]);
    let bus = LocaleBus::new(Locale::new("en"));
    let harness = start(mock.gateway(), translator, Some(&bus), None);

    harness
        .handle
        .page(PageEvent {
            page_index: 0,
            page_size: 16,
        })
        .await
        .unwrap();
    harness.handle.settled().await.unwrap();

    let mut state = harness.handle.subscribe();
    state
        .wait_for(|snapshot| snapshot.locale.is_some())
        .await
        .unwrap();

    let outcome = harness
        .handle
        .perform_action(TicketAction::Close(42))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        ActionOutcome::Refetch {
            notice: Some("closed".to_string())
        }
    );
    assert_eq!(*harness.closed.lock().unwrap(), vec![42]);

    let snapshot = harness.handle.settled().await.unwrap();
    assert!(snapshot.rows.is_empty());

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);

    let notices = harness.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Ticket closed");
    assert_eq!(notices[0].duration, NOTICE_DURATION);
    assert_eq!(NOTICE_DURATION, Duration::from_millis(5000));
    mock.verify();
}

#[tokio::test]
async fn test_failed_action_moves_to_failed_phase() {
    let (gateway, mut calls) = create_mock_gateway::<Ticket>(8);
    let harness = start(gateway, MockTranslator::new(), None, None);

    harness.handle.initialize().await.unwrap();
    let (_, pending) = expect_fetch(&mut calls).await.unwrap();

    let outcome = harness.handle.perform_action(TicketAction::Jam).await.unwrap();
    assert!(matches!(outcome, ActionOutcome::Failed(ListError::Server { status: 500, .. })));

    // The fetch issued before the failure resolves late and is ignored.
    pending
        .send(Ok(Some(Page::new(vec![ticket(1, "todo")], 1))))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let snapshot = harness.handle.snapshot();
    assert_eq!(snapshot.phase, ListPhase::Failed);
    assert!(snapshot.rows.is_empty());
    let notices = harness.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert_eq!(notices[0].message, "Server error (500): jammed");

    let outcome = harness.handle.perform_action(TicketAction::Peek).await.unwrap();
    assert_eq!(outcome, ActionOutcome::Unchanged);
}

#[tokio::test]
async fn test_locale_change_rebuilds_labels_without_fetch() {
    let mock = MockGateway::<Ticket>::new();
    let translator = MockTranslator::new()
        .with_bundle("en", "board.columns", &[("idH", "Number"), ("laneH", "Lane")])
        .with_bundle("de", "board.columns", &[("idH", "Nummer"), ("laneH", "Spalte")]);
    let bus = LocaleBus::new(Locale::new("en"));
    let harness = start(mock.gateway(), translator.clone(), Some(&bus), None);

    let mut state = harness.handle.subscribe();
    let english = state
        .wait_for(|snapshot| snapshot.locale == Some(Locale::new("en")))
        .await
        .unwrap()
        .clone();
    assert_eq!(english.labels.columns[0].label, "Number");

    bus.publish(Locale::new("de"));
    let german = state
        .wait_for(|snapshot| snapshot.locale == Some(Locale::new("de")))
        .await
        .unwrap()
        .clone();
    assert_eq!(
        german.labels.columns,
        vec![ColumnSpec::new("id", "Nummer"), ColumnSpec::new("lane", "Spalte")]
    );
    assert_eq!(german.phase, ListPhase::Idle);

    assert!(mock.requests().is_empty());
    assert_eq!(translator.calls().len(), 4);
    mock.verify();
}

#[tokio::test]
async fn test_slow_translation_for_earlier_locale_is_discarded() {
    let translator = MockTranslator::new()
        .with_bundle("en", "board.columns", &[("idH", "Number")])
        .with_bundle("de", "board.columns", &[("idH", "Nummer")])
        .delay_for("en", Duration::from_millis(100));
    let bus = LocaleBus::new(Locale::new("en"));
    let harness = start(MockGateway::<Ticket>::new().gateway(), translator, Some(&bus), None);
    bus.publish(Locale::new("de"));

    let mut state = harness.handle.subscribe();
    state
        .wait_for(|snapshot| snapshot.locale == Some(Locale::new("de")))
        .await
        .unwrap();

    // Both English lookups finish well within this window.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let snapshot = harness.handle.snapshot();
    assert_eq!(snapshot.locale, Some(Locale::new("de")));
    assert_eq!(snapshot.labels.columns[0].label, "Nummer");
}

#[tokio::test]
async fn test_failed_translation_keeps_previous_labels() {
    let translator = MockTranslator::new()
        .with_bundle("en", "board.columns", &[("idH", "Number")])
        .fail_for("de");
    let bus = LocaleBus::new(Locale::new("en"));
    let harness = start(MockGateway::<Ticket>::new().gateway(), translator.clone(), Some(&bus), None);

    let mut state = harness.handle.subscribe();
    state
        .wait_for(|snapshot| snapshot.locale == Some(Locale::new("en")))
        .await
        .unwrap();

    bus.publish(Locale::new("de"));
    tokio::time::timeout(Duration::from_secs(1), async {
        while !translator.calls().iter().any(|(locale, _)| locale == "de") {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("German labels were never requested");
    tokio::time::sleep(Duration::from_millis(20)).await;

    let snapshot = harness.handle.snapshot();
    assert_eq!(snapshot.locale, Some(Locale::new("en")));
    assert_eq!(snapshot.labels.columns[0].label, "Number");
    assert_eq!(snapshot.phase, ListPhase::Idle);
}

#[tokio::test]
async fn test_action_in_flight_does_not_block_the_mailbox() {
    let mut mock = MockGateway::<Ticket>::new();
    mock.expect_fetch().return_ok(Some(Page::new(vec![ticket(1, "todo")], 1)));
    let harness = start(mock.gateway(), MockTranslator::new(), None, None);

    let stuck = harness.handle.clone();
    let action = tokio::spawn(async move { stuck.perform_action(TicketAction::Stall).await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    tokio::time::timeout(Duration::from_secs(1), harness.handle.initialize())
        .await
        .expect("mailbox blocked by a pending action")
        .unwrap();
    let snapshot = harness.handle.settled().await.unwrap();
    assert_eq!(snapshot.rows, vec![ticket(1, "todo")]);

    // Shutdown aborts the action; its caller sees the reply dropped.
    harness.handle.shutdown().await.unwrap();
    harness.task.await.unwrap();
    assert_eq!(action.await.unwrap(), Err(ControllerError::Dropped));
    mock.verify();
}

#[tokio::test]
async fn test_missing_translations_fall_back_to_keys() {
    let translator = MockTranslator::new();
    let bus = LocaleBus::new(Locale::new("pl"));
    let harness = start(MockGateway::<Ticket>::new().gateway(), translator, Some(&bus), None);

    let mut state = harness.handle.subscribe();
    let snapshot = state
        .wait_for(|snapshot| snapshot.locale.is_some())
        .await
        .unwrap()
        .clone();
    assert_eq!(snapshot.labels.columns[1].label, "board.columns.laneH");
}

#[tokio::test]
async fn test_dropping_handles_stops_controller_with_fetch_in_flight() {
    let (gateway, mut calls) = create_mock_gateway::<Ticket>(8);
    let bus = LocaleBus::new(Locale::new("en"));
    let harness = start(gateway, MockTranslator::new(), Some(&bus), None);

    harness.handle.initialize().await.unwrap();
    let (_, mut pending) = expect_fetch(&mut calls).await.unwrap();

    drop(harness.handle);
    tokio::time::timeout(Duration::from_secs(1), harness.task)
        .await
        .expect("controller did not stop")
        .unwrap();

    // The aborted fetch task drops its end of the reply channel.
    tokio::time::timeout(Duration::from_secs(1), pending.closed())
        .await
        .expect("fetch was not aborted");
}

#[tokio::test]
async fn test_explicit_shutdown_closes_other_handles() {
    let harness = start(MockGateway::<Ticket>::new().gateway(), MockTranslator::new(), None, None);
    let other = harness.handle.clone();

    harness.handle.shutdown().await.unwrap();
    harness.task.await.unwrap();

    assert_eq!(other.initialize().await, Err(ControllerError::Closed));
    assert_eq!(other.snapshot().phase, ListPhase::Idle);
}
