//! Request payloads and paths.
//!
//! Every entity type answers the same set of requests under its own
//! prefix: `users/load`, `users/submit`, `roles/delete`, ...

use std::fmt;

use crate::form::FormData;
use crate::model::{Entity, EntityId};

/// What a request asks a manager to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Initial list fetch.
    Load,
    /// Refetch and overwrite the cached list.
    Refresh,
    /// Open the form in create mode.
    Add,
    /// Open the form on a cached record ([`EditReq`]).
    Edit,
    /// Close the form.
    Dismiss,
    /// Submit form values ([`SubmitReq`]).
    Submit,
    /// Delete a record ([`DeleteReq`]).
    Delete,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Load,
        Action::Refresh,
        Action::Add,
        Action::Edit,
        Action::Dismiss,
        Action::Submit,
        Action::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Load => "load",
            Action::Refresh => "refresh",
            Action::Add => "add",
            Action::Edit => "edit",
            Action::Dismiss => "dismiss",
            Action::Submit => "submit",
            Action::Delete => "delete",
        }
    }

    /// Request path for entity type `E`, e.g. `users/submit`.
    pub fn path<E: Entity>(self) -> String {
        format!("{}/{}", E::KIND, self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of `{kind}/edit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditReq {
    pub id: EntityId,
}

/// Payload of `{kind}/delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteReq {
    pub id: EntityId,
}

/// Payload of `{kind}/submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReq {
    pub fields: FormData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, User};

    #[test]
    fn paths_are_prefixed_by_kind() {
        assert_eq!(Action::Submit.path::<User>(), "users/submit");
        assert_eq!(Action::Delete.path::<Role>(), "roles/delete");
        let all: Vec<_> = Action::ALL.iter().map(|a| a.as_str()).collect();
        assert_eq!(all, ["load", "refresh", "add", "edit", "dismiss", "submit", "delete"]);
    }
}
