//! Type-safe wrappers around [`ListHandle`](list_framework::ListHandle).

pub mod admin_users_client;
pub mod order_archive_client;

pub use admin_users_client::*;
pub use order_archive_client::*;
