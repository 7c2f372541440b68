use crate::admin_users::{self, AdminUser, AdminUsersContext, UserScope};
use crate::backend::{InMemoryBackend, UserGateway};
use crate::clients::{AdminUsersClient, OrderArchiveClient};
use crate::dialog::DialogHost;
use crate::order_archive::{self, ArchivedOrder};
use crate::settings::CockpitSettings;
use list_framework::{ControllerContext, ListClient, ListGateway, LocaleBus, Notifier, Translator};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Controller task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

/// External capabilities both screens are wired to.
#[derive(Clone)]
pub struct Collaborators {
    pub users: Arc<dyn ListGateway<AdminUser>>,
    pub user_admin: Arc<dyn UserGateway>,
    pub orders: Arc<dyn ListGateway<ArchivedOrder>>,
    pub translator: Arc<dyn Translator>,
    pub notifier: Arc<dyn Notifier>,
    pub dialogs: Arc<dyn DialogHost>,
}

impl Collaborators {
    /// Every gateway served by one in-memory backend.
    pub fn in_memory(
        backend: Arc<InMemoryBackend>,
        translator: Arc<dyn Translator>,
        notifier: Arc<dyn Notifier>,
        dialogs: Arc<dyn DialogHost>,
    ) -> Self {
        Self {
            users: backend.clone(),
            user_admin: backend.clone(),
            orders: backend,
            translator,
            notifier,
            dialogs,
        }
    }
}

/// Runtime owner of the cockpit screens.
///
/// `CockpitSystem` is responsible for:
/// - **Lifecycle Management**: starting and stopping both list controllers
/// - **Dependency Wiring**: handing each controller its gateway, translator,
///   notifier, dialog host and its own locale subscription
///
/// # Example
///
/// ```ignore
/// let system = CockpitSystem::start(&settings, collaborators);
///
/// system.order_archive.initialize().await?;
/// system.locales.publish(Locale::new("de"));
///
/// system.shutdown().await?;
/// ```
pub struct CockpitSystem {
    pub admin_users: AdminUsersClient,
    pub order_archive: OrderArchiveClient,
    /// Publishing here relabels every screen.
    pub locales: LocaleBus,
    handles: Vec<JoinHandle<()>>,
}

impl CockpitSystem {
    /// Spawns both controllers. They stay `Idle` until a screen is mounted, which
    /// is the caller's `initialize()` on the matching client; labels for the
    /// default locale are loaded right away.
    pub fn start(settings: &CockpitSettings, collaborators: Collaborators) -> Self {
        let locales = LocaleBus::new(settings.locale());

        // 1. Create controllers (no collaborators yet)
        let (users_controller, admin_users) =
            admin_users::new(settings.controller(), UserScope::default());
        let (orders_controller, order_archive) = order_archive::new(settings.controller());

        // 2. Start them with injected context
        let users_handle = tokio::spawn(users_controller.run(ControllerContext {
            gateway: collaborators.users,
            translator: collaborators.translator.clone(),
            notifier: collaborators.notifier.clone(),
            locales: Some(locales.subscribe()),
            entity: AdminUsersContext {
                users: collaborators.user_admin,
                dialogs: collaborators.dialogs.clone(),
            },
        }));
        let orders_handle = tokio::spawn(orders_controller.run(ControllerContext {
            gateway: collaborators.orders,
            translator: collaborators.translator,
            notifier: collaborators.notifier,
            locales: Some(locales.subscribe()),
            entity: collaborators.dialogs,
        }));

        info!(locale = %locales.active(), "Cockpit started");
        Self {
            admin_users,
            order_archive,
            locales,
            handles: vec![users_handle, orders_handle],
        }
    }

    /// Stops both controllers and waits for them, even while client clones are
    /// still held elsewhere.
    pub async fn shutdown(self) -> Result<(), LifecycleError> {
        info!("Shutting down cockpit...");

        // A controller that is already gone answers `Closed`.
        if let Err(e) = self.admin_users.handle().shutdown().await {
            debug!(error = %e, "User list already stopped");
        }
        if let Err(e) = self.order_archive.handle().shutdown().await {
            debug!(error = %e, "Order archive already stopped");
        }

        drop(self.admin_users);
        drop(self.order_archive);
        drop(self.locales);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Controller task failed: {:?}", e);
                return Err(e.into());
            }
        }

        info!("Cockpit shutdown complete.");
        Ok(())
    }
}
