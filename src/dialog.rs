//! # Dialog Host Capability
//!
//! Create-user and order-detail dialogs are presented by an external host. Opening
//! one is fire-and-forget: the list neither waits for the dialog nor refreshes when
//! it closes.

use crate::model::OrderRow;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Which dialog to open, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    CreateUser,
    OrderDetail(OrderRow),
}

/// Fixed sizing passed to the host, in CSS units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeHint {
    pub width: String,
    pub height: Option<String>,
}

impl SizeHint {
    pub fn width(width: impl Into<String>) -> Self {
        Self {
            width: width.into(),
            height: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub kind: DialogKind,
    pub size: SizeHint,
}

impl DialogRequest {
    pub fn create_user() -> Self {
        Self {
            kind: DialogKind::CreateUser,
            size: SizeHint {
                width: "40%".to_string(),
                height: Some("auto".to_string()),
            },
        }
    }

    pub fn order_detail(row: OrderRow) -> Self {
        Self {
            kind: DialogKind::OrderDetail(row),
            size: SizeHint::width("80%"),
        }
    }
}

/// How the user left a dialog. Reported by the host, never acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Confirmed,
    Dismissed,
}

#[async_trait]
pub trait DialogHost: Send + Sync {
    async fn open(&self, request: DialogRequest) -> DialogOutcome;
}

/// Opens `request` on a separate task and returns immediately.
pub fn open_detached(host: &Arc<dyn DialogHost>, request: DialogRequest) {
    let host = Arc::clone(host);
    tokio::spawn(async move {
        let kind = format!("{:?}", request.kind);
        let outcome = host.open(request).await;
        debug!(%kind, ?outcome, "Dialog closed");
    });
}

/// Host that hands every request to a channel and reports it as dismissed.
pub struct ChannelDialogHost {
    sender: mpsc::UnboundedSender<DialogRequest>,
}

impl ChannelDialogHost {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DialogRequest>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl DialogHost for ChannelDialogHost {
    async fn open(&self, request: DialogRequest) -> DialogOutcome {
        let _ = self.sender.send(request);
        DialogOutcome::Dismissed
    }
}
