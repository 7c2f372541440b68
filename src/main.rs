//! # Cockpit Demo
//!
//! Runs both cockpit screens against an in-memory backend:
//! 1. Pages, sorts and filters the order archive.
//! 2. Switches the locale and shows the rebuilt column labels.
//! 3. Narrows the user list by role, deletes a user and tries the password stubs.

use chrono::{Duration as ChronoDuration, NaiveDate};
use cockpit::backend::InMemoryBackend;
use cockpit::catalog::StaticCatalog;
use cockpit::dialog::ChannelDialogHost;
use cockpit::lifecycle::{setup_tracing, CockpitSystem, Collaborators};
use cockpit::model::{OrderRecord, OrderState, RoleId, UserRecord};
use cockpit::settings::CockpitSettings;
use list_framework::{
    FilterSet, FilterValue, ListClient, Locale, PageEvent, SortDirection, SortEvent, TracingNotifier,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let settings = CockpitSettings::load()?;
    info!(?settings, "Starting cockpit demo");

    let backend = Arc::new(InMemoryBackend::new(seed_users(), seed_orders()).with_latency(Duration::from_millis(15)));
    let (dialogs, mut opened) = ChannelDialogHost::new();
    tokio::spawn(async move {
        while let Some(request) = opened.recv().await {
            info!(kind = ?request.kind, width = %request.size.width, "Dialog opened");
        }
    });

    let collaborators = Collaborators::in_memory(
        backend,
        Arc::new(StaticCatalog::embedded()?),
        Arc::new(TracingNotifier),
        Arc::new(dialogs),
    );
    let system = CockpitSystem::start(&settings, collaborators);

    // Order archive
    async {
        let archive = &system.order_archive;
        archive.initialize().await?;
        let first = archive.settled().await?;
        info!(rows = first.rows.len(), total = ?first.total_count, "Archive loaded");

        let page_size = settings.default_page_size;
        archive.page(PageEvent { page_index: 1, page_size }).await?;
        archive
            .sort(SortEvent::new("booking.bookingDate", Some(SortDirection::Desc)))
            .await?;
        archive
            .apply_filters(FilterSet::new().set("email", FilterValue::text("@example.com")))
            .await?;
        let filtered = archive.settled().await?;
        for row in &filtered.rows {
            let locale = filtered.locale.clone().unwrap_or_else(|| settings.locale());
            info!(order_id = %row.order_id, date = %row.display_date(&locale), state = row.state.key(), "Archived order");
        }

        archive.clear_filters().await?;
        let cleared = archive.settled().await?;
        if let Some(row) = cleared.rows.first() {
            archive.open_order_detail(row).await?;
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(tracing::info_span!("order_archive"))
    .await?;

    // Locale switch
    system.locales.publish(Locale::new("de"));
    let mut labels = system.order_archive.handle().subscribe();
    let relabeled = labels
        .wait_for(|snapshot| snapshot.locale.as_ref().map(Locale::code) == Some("de"))
        .await?
        .clone();
    for column in &relabeled.labels.columns {
        info!(key = %column.key, label = %column.label, "Column");
    }

    // Admin user list
    async {
        let users = &system.admin_users;
        users.initialize().await?;
        let everybody = users.settled().await?;
        info!(rows = everybody.rows.len(), total = ?everybody.total_count, "Users loaded");

        users.filter_by_role(Some(RoleId::WAITER)).await?;
        let waiters = users.settled().await?;
        info!(rows = waiters.rows.len(), total = ?waiters.total_count, "Waiters only");

        users.filter_by_role(None).await?;
        let everybody = users.settled().await?;
        if let Some(row) = everybody.rows.iter().find(|row| row.can_delete) {
            users.delete_user(row).await?;
            let after = users.settled().await?;
            info!(rows = after.rows.len(), "User deleted");

            let outcome = users.reset_password(row).await?;
            info!(?outcome, "Reset password");
        }
        users.open_create_user_dialog().await?;
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(tracing::info_span!("admin_users"))
    .await?;

    system.shutdown().await?;
    Ok(())
}

fn seed_users() -> Vec<UserRecord> {
    vec![
        UserRecord::new(1, "admin", "admin@mythaistar.com", RoleId::ADMIN),
        UserRecord::new(2, "manager", "manager@mythaistar.com", RoleId::MANAGER),
        UserRecord::new(3, "waiter", "waiter@mythaistar.com", RoleId::WAITER),
        UserRecord::new(4, "waiter2", "waiter2@mythaistar.com", RoleId::WAITER),
        UserRecord::new(5, "anna", "anna@example.com", RoleId::CUSTOMER),
        UserRecord::new(6, "bruno", "bruno@example.com", RoleId::CUSTOMER),
    ]
}

fn seed_orders() -> Vec<OrderRecord> {
    let base = NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|day| day.and_hms_opt(19, 0, 0))
        .unwrap_or_default();
    (0..20u64)
        .map(|i| {
            let state = OrderState::ALL[(i % 5) as usize];
            let email = if i % 2 == 0 {
                format!("guest{i}@example.com")
            } else {
                format!("guest{i}@mythaistar.com")
            };
            OrderRecord::new(
                i + 1,
                base + ChronoDuration::days(i as i64),
                email,
                format!("CB_202405{:02}_{i}", i + 1),
                state,
            )
        })
        .collect()
}
