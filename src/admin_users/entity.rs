//! [`ListEntity`] implementation for the admin user list.

use crate::backend::UserGateway;
use crate::dialog::{open_detached, DialogHost, DialogRequest};
use crate::model::{RoleId, UserRecord, UserRow};
use async_trait::async_trait;
use list_framework::{translated, ActionOutcome, ColumnSpec, Labels, ListEntity, ListError, Translations};
use std::sync::Arc;
use tracing::{info, warn};

/// Marker type of the admin user list.
#[derive(Debug)]
pub struct AdminUser;

/// Client-side narrowing of the user list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserScope {
    /// Show only users with this role.
    pub role: Option<RoleId>,
}

#[derive(Debug)]
pub enum UserAction {
    Delete(UserRow),
    ResetPassword(UserRow),
    SendPasswordResetEmail(UserRow),
    OpenCreateDialog,
}

/// Dependencies of the user row actions.
pub struct AdminUsersContext {
    pub users: Arc<dyn UserGateway>,
    pub dialogs: Arc<dyn DialogHost>,
}

pub const USERS_SCOPE: &str = "cockpit.users";
pub const ALERTS_SCOPE: &str = "alerts.waiterCockpitAlerts";

/// Alert shown after a user was deleted.
pub const DELETE_SUCCESS: &str = "deleteSuccess";

#[async_trait]
impl ListEntity for AdminUser {
    type Record = UserRecord;
    type Row = UserRow;
    type Scope = UserScope;
    type Action = UserAction;
    type Context = AdminUsersContext;

    const LABEL_KEYS: &'static [&'static str] = &[USERS_SCOPE, ALERTS_SCOPE];
    const FILTER_FIELDS: &'static [&'static str] = &["username", "email"];

    fn project(record: UserRecord) -> UserRow {
        UserRow::from(record)
    }

    fn narrows(scope: &UserScope) -> bool {
        scope.role.is_some()
    }

    fn retain(row: &UserRow, scope: &UserScope) -> bool {
        scope.role.map_or(true, |role| row.role == role)
    }

    fn labels(translations: &Translations) -> Labels {
        let columns = [
            ("userView.email", "emailH"),
            ("userView.name", "nameH"),
            ("userView.role", "roleH"),
        ]
        .into_iter()
        .map(|(key, label)| ColumnSpec::new(key, translated(translations, USERS_SCOPE, label)))
        .collect();

        let values = [RoleId::CUSTOMER, RoleId::WAITER, RoleId::MANAGER, RoleId::ADMIN]
            .into_iter()
            .map(|role| {
                let key = role.label_key();
                ColumnSpec::new(key, translated(translations, USERS_SCOPE, key))
            })
            .collect();

        Labels {
            columns,
            values,
            alerts: translations.get(ALERTS_SCOPE).cloned().unwrap_or_default(),
        }
    }

    async fn handle_action(
        action: UserAction,
        ctx: &AdminUsersContext,
    ) -> Result<ActionOutcome, ListError> {
        match action {
            UserAction::Delete(row) => {
                if !row.can_delete {
                    warn!(user_id = %row.id, "Refusing to delete administrator");
                    return Ok(ActionOutcome::Unchanged);
                }
                ctx.users.delete_user(row.id).await?;
                info!(user_id = %row.id, "User deleted");
                Ok(ActionOutcome::Refetch {
                    notice: Some(DELETE_SUCCESS.to_string()),
                })
            }
            UserAction::ResetPassword(row) => {
                info!(user_id = %row.id, "Password reset is not implemented yet");
                Ok(ActionOutcome::NotImplemented("reset_password"))
            }
            UserAction::SendPasswordResetEmail(row) => {
                info!(user_id = %row.id, "Password reset email is not implemented yet");
                Ok(ActionOutcome::NotImplemented("send_password_reset_email"))
            }
            UserAction::OpenCreateDialog => {
                open_detached(&ctx.dialogs, DialogRequest::create_user());
                Ok(ActionOutcome::Unchanged)
            }
        }
    }
}
