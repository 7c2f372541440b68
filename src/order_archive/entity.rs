//! [`ListEntity`] implementation for the order archive.

use crate::dialog::{open_detached, DialogHost, DialogRequest};
use crate::model::{OrderRecord, OrderRow, OrderState};
use async_trait::async_trait;
use list_framework::{translated, ActionOutcome, ColumnSpec, Labels, ListEntity, ListError, Translations};
use std::sync::Arc;
use tracing::debug;

/// Marker type of the order archive.
#[derive(Debug)]
pub struct ArchivedOrder;

#[derive(Debug)]
pub enum OrderArchiveAction {
    OpenDetail(OrderRow),
}

pub const TABLE_SCOPE: &str = "cockpit.table";
pub const STATES_SCOPE: &str = "cockpit.states";

#[async_trait]
impl ListEntity for ArchivedOrder {
    type Record = OrderRecord;
    type Row = OrderRow;
    type Scope = ();
    type Action = OrderArchiveAction;
    type Context = Arc<dyn DialogHost>;

    const LABEL_KEYS: &'static [&'static str] = &[TABLE_SCOPE, STATES_SCOPE];
    const FILTER_FIELDS: &'static [&'static str] = &["bookingDate", "email", "bookingToken"];

    fn project(record: OrderRecord) -> OrderRow {
        OrderRow::from(record)
    }

    /// The backend returns every order; the archive only shows finished ones.
    fn narrows(_scope: &()) -> bool {
        true
    }

    fn retain(row: &OrderRow, _scope: &()) -> bool {
        row.state.is_archived()
    }

    fn labels(translations: &Translations) -> Labels {
        let columns = [
            ("booking.bookingDate", "reservationDateH"),
            ("booking.email", "emailH"),
            ("booking.bookingToken", "bookingTokenH"),
            ("booking.state", "stateH"),
        ]
        .into_iter()
        .map(|(key, label)| ColumnSpec::new(key, translated(translations, TABLE_SCOPE, label)))
        .collect();

        let values = OrderState::ALL
            .into_iter()
            .map(|state| {
                let label = format!("{}H", state.key());
                ColumnSpec::new(state.key(), translated(translations, STATES_SCOPE, &label))
            })
            .collect();

        Labels {
            columns,
            values,
            alerts: Default::default(),
        }
    }

    async fn handle_action(
        action: OrderArchiveAction,
        dialogs: &Arc<dyn DialogHost>,
    ) -> Result<ActionOutcome, ListError> {
        match action {
            OrderArchiveAction::OpenDetail(row) => {
                debug!(order_id = %row.order_id, "Opening order detail");
                open_detached(dialogs, DialogRequest::order_detail(row));
                Ok(ActionOutcome::Unchanged)
            }
        }
    }
}
