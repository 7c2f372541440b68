use chrono::NaiveDateTime;
use list_framework::Locale;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderState {
    OrderTaken,
    DeliveringOrder,
    OrderDelivered,
    OrderPaid,
    Canceled,
}

impl OrderState {
    pub const ALL: [OrderState; 5] = [
        Self::OrderTaken,
        Self::DeliveringOrder,
        Self::OrderDelivered,
        Self::OrderPaid,
        Self::Canceled,
    ];

    /// Name used by the backend and as the state column's value key.
    pub fn key(self) -> &'static str {
        match self {
            Self::OrderTaken => "orderTaken",
            Self::DeliveringOrder => "deliveringOrder",
            Self::OrderDelivered => "orderDelivered",
            Self::OrderPaid => "orderPaid",
            Self::Canceled => "canceled",
        }
    }

    /// Orders that reached one of these states belong to the archive.
    pub fn is_archived(self) -> bool {
        matches!(self, Self::OrderPaid | Self::Canceled)
    }
}

/// Booking half of an order search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInfo {
    pub booking_date: NaiveDateTime,
    pub email: String,
    pub booking_token: String,
}

/// Order half of an order search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInfo {
    pub id: OrderId,
    pub state: OrderState,
}

/// An order as returned by the order search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub booking: BookingInfo,
    pub order: OrderInfo,
}

impl OrderRecord {
    pub fn new(
        id: u64,
        booking_date: NaiveDateTime,
        email: impl Into<String>,
        booking_token: impl Into<String>,
        state: OrderState,
    ) -> Self {
        Self {
            booking: BookingInfo {
                booking_date,
                email: email.into(),
                booking_token: booking_token.into(),
            },
            order: OrderInfo {
                id: OrderId(id),
                state,
            },
        }
    }
}

/// One line of the order archive table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub order_id: OrderId,
    pub booking_date: NaiveDateTime,
    pub email: String,
    pub booking_token: String,
    pub state: OrderState,
}

impl OrderRow {
    pub fn display_date(&self, locale: &Locale) -> String {
        locale.format_date(self.booking_date)
    }
}

impl From<OrderRecord> for OrderRow {
    fn from(record: OrderRecord) -> Self {
        Self {
            order_id: record.order.id,
            booking_date: record.booking.booking_date,
            email: record.booking.email,
            booking_token: record.booking.booking_token,
            state: record.order.state,
        }
    }
}
