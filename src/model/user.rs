use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user_{}", self.0)
    }
}

/// Role of a user, as the backend's `userRoleId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(pub u8);

impl RoleId {
    pub const CUSTOMER: RoleId = RoleId(0);
    pub const WAITER: RoleId = RoleId(1);
    pub const MANAGER: RoleId = RoleId(2);
    pub const ADMIN: RoleId = RoleId(3);

    /// Translation key of the role name inside `cockpit.users`.
    pub fn label_key(self) -> &'static str {
        match self {
            Self::CUSTOMER => "customerH",
            Self::WAITER => "waiterH",
            Self::MANAGER => "managerH",
            Self::ADMIN => "adminH",
            _ => "unknownRoleH",
        }
    }
}

/// A user as returned by the user search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub user_role_id: RoleId,
}

impl UserRecord {
    pub fn new(id: u64, username: impl Into<String>, email: impl Into<String>, role: RoleId) -> Self {
        Self {
            id: UserId(id),
            username: username.into(),
            email: email.into(),
            user_role_id: role,
        }
    }
}

/// One line of the admin user table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: RoleId,
    /// Whether the delete button is offered.
    pub can_delete: bool,
    /// Whether the password-reset buttons are offered.
    pub can_reset_password: bool,
}

impl From<UserRecord> for UserRow {
    fn from(record: UserRecord) -> Self {
        // Administrators cannot be managed from the list view.
        let manageable = record.user_role_id != RoleId::ADMIN;
        Self {
            id: record.id,
            email: record.email,
            name: record.username,
            role: record.user_role_id,
            can_delete: manageable,
            can_reset_password: manageable,
        }
    }
}
