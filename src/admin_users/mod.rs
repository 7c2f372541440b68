//! # Admin User List
//!
//! The administrator's table of registered users: paging, sorting, username/email
//! filters, an optional role narrowing and the row actions delete, reset password,
//! send reset email and create user.
//!
//! ## Structure
//!
//! - [`entity`] - [`ListEntity`](list_framework::ListEntity) implementation for [`AdminUser`]
//! - [`error`] - [`AdminUsersError`] type for the client
//! - [`new()`] - Factory function that creates the controller and client
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (controller, client) = admin_users::new(settings.controller(), UserScope::default());
//! tokio::spawn(controller.run(context));
//!
//! client.initialize().await?;
//! let users = client.settled().await?;
//! client.delete_user(&users.rows[0]).await?;
//! ```

pub mod entity;
pub mod error;

pub use entity::*;
pub use error::*;

use crate::clients::AdminUsersClient;
use list_framework::{ControllerSettings, ListController};

/// Creates a new admin user controller and its client.
pub fn new(settings: ControllerSettings, scope: UserScope) -> (ListController<AdminUser>, AdminUsersClient) {
    let (controller, handle) = ListController::new(settings, scope);
    (controller, AdminUsersClient::new(handle))
}
