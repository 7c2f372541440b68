//! # Admin Users Client
//!
//! Wraps a `ListHandle<AdminUser>` and exposes the user table's row actions next to
//! the paging operations inherited from [`ListClient`].
use crate::admin_users::{AdminUser, AdminUsersError, UserAction, UserScope};
use crate::model::{RoleId, UserRow};
use async_trait::async_trait;
use list_framework::{ActionOutcome, ControllerError, ListClient, ListHandle, RequestTicket};
use tracing::{debug, instrument};

/// Client for the admin user list controller.
#[derive(Clone)]
pub struct AdminUsersClient {
    handle: ListHandle<AdminUser>,
}

impl AdminUsersClient {
    pub fn new(handle: ListHandle<AdminUser>) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl ListClient<AdminUser> for AdminUsersClient {
    type Error = AdminUsersError;

    fn handle(&self) -> &ListHandle<AdminUser> {
        &self.handle
    }

    fn map_error(e: ControllerError) -> Self::Error {
        AdminUsersError::Controller(e)
    }
}

impl AdminUsersClient {
    /// Deletes the user, then the list is fetched again with the unchanged query.
    #[instrument(skip(self, row), fields(user_id = %row.id))]
    pub async fn delete_user(&self, row: &UserRow) -> Result<(), AdminUsersError> {
        debug!("Sending request");
        if !row.can_delete {
            return Err(AdminUsersError::NotOffered(row.email.clone()));
        }
        match self.action(UserAction::Delete(row.clone())).await? {
            ActionOutcome::Failed(e) => Err(AdminUsersError::Action(e)),
            _ => Ok(()),
        }
    }

    /// Placeholder; always answers [`ActionOutcome::NotImplemented`].
    #[instrument(skip(self, row), fields(user_id = %row.id))]
    pub async fn reset_password(&self, row: &UserRow) -> Result<ActionOutcome, AdminUsersError> {
        debug!("Sending request");
        self.action(UserAction::ResetPassword(row.clone())).await
    }

    /// Placeholder; always answers [`ActionOutcome::NotImplemented`].
    #[instrument(skip(self, row), fields(user_id = %row.id))]
    pub async fn send_password_reset_email(
        &self,
        row: &UserRow,
    ) -> Result<ActionOutcome, AdminUsersError> {
        debug!("Sending request");
        self.action(UserAction::SendPasswordResetEmail(row.clone()))
            .await
    }

    #[instrument(skip(self))]
    pub async fn open_create_user_dialog(&self) -> Result<(), AdminUsersError> {
        debug!("Sending request");
        self.action(UserAction::OpenCreateDialog).await.map(|_| ())
    }

    /// Shows only users with `role`, or everybody for `None`.
    #[instrument(skip(self))]
    pub async fn filter_by_role(&self, role: Option<RoleId>) -> Result<RequestTicket, AdminUsersError> {
        debug!("Sending request");
        self.handle
            .set_scope(UserScope { role })
            .await
            .map_err(Self::map_error)
    }

    async fn action(&self, action: UserAction) -> Result<ActionOutcome, AdminUsersError> {
        self.handle
            .perform_action(action)
            .await
            .map_err(Self::map_error)
    }
}
