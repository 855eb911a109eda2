use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Entity, EntityId};

/// A dashboard user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,

    /// Display name.
    pub name: String,

    pub email: String,

    /// Name of a role. Not checked against the role collection.
    pub role: String,

    pub status: UserStatus,
}

/// Input for creating or replacing a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: UserStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    pub const ALL: [UserStatus; 2] = [UserStatus::Active, UserStatus::Inactive];

    /// Label shown in the status select.
    pub fn label(self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
        }
    }

    pub fn is_active(self) -> bool {
        self == UserStatus::Active
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UserStatus {
    type Err = String;

    /// Accepts both the select label (`Active`) and the wire value (`active`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserStatus::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown status '{}'", s))
    }
}

impl Entity for User {
    const KIND: &'static str = "users";
    const LABEL: &'static str = "User";
    type Fields = UserFields;

    fn id(&self) -> EntityId {
        self.id
    }

    fn assemble(id: EntityId, fields: UserFields) -> Self {
        User {
            id,
            name: fields.name,
            email: fields.email,
            role: fields.role,
            status: fields.status,
        }
    }

    fn seed() -> Vec<Self> {
        vec![
            seed_user(1, "ram patil", "ram@example.com", "Admin", UserStatus::Active),
            seed_user(2, "sita rao", "sita@example.com", "Editor", UserStatus::Active),
            seed_user(3, "lakhan mane", "lakhan@example.com", "Viewer", UserStatus::Inactive),
        ]
    }
}

fn seed_user(id: i64, name: &str, email: &str, role: &str, status: UserStatus) -> User {
    User {
        id: EntityId(id),
        name: name.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        status,
    }
}
