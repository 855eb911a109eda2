use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Entity, EntityId};

/// A named set of permissions.
///
/// Duplicate permissions are not rejected; the form never produces them
/// but a direct caller may.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: EntityId,
    pub name: String,
    pub permissions: Vec<Permission>,
}

/// Input for creating or replacing a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleFields {
    pub name: String,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Delete,
}

impl Permission {
    /// Checkbox order on the role form.
    pub const ALL: [Permission; 3] = [Permission::Read, Permission::Write, Permission::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Delete => "delete",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown permission '{}'", s))
    }
}

impl Role {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Comma-joined permission list, as rendered in the roles table.
    pub fn permission_summary(&self) -> String {
        self.permissions
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Entity for Role {
    const KIND: &'static str = "roles";
    const LABEL: &'static str = "Role";
    type Fields = RoleFields;

    fn id(&self) -> EntityId {
        self.id
    }

    fn assemble(id: EntityId, fields: RoleFields) -> Self {
        Role {
            id,
            name: fields.name,
            permissions: fields.permissions,
        }
    }

    fn seed() -> Vec<Self> {
        use Permission::*;
        vec![
            Role { id: EntityId(1), name: "Admin".into(), permissions: vec![Read, Write, Delete] },
            Role { id: EntityId(2), name: "Editor".into(), permissions: vec![Read, Write] },
            Role { id: EntityId(3), name: "Viewer".into(), permissions: vec![Read] },
        ]
    }
}
