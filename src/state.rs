//! View-level state kept next to the entity lists.

use serde::Serialize;

use crate::cache::QueryCache;
use crate::error::AdminError;
use crate::model::{Role, User};

/// Non-blocking notification, stored at `app/notice`.
///
/// Raised for NotFound and Transport failures; validation problems are
/// shown inline on the form instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub code: String,
    pub message: String,
}

impl Notice {
    pub const PATH: &'static str = "app/notice";

    pub fn from_error(err: &AdminError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Counts shown on the root view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub users: usize,
    pub active_users: usize,
    pub roles: usize,
}

impl Summary {
    /// Computed from cached lists; an unloaded list counts as empty.
    pub fn from_cache(cache: &QueryCache) -> Self {
        let users = cache.list::<User>();
        Self {
            users: users.len(),
            active_users: users.iter().filter(|u| u.status.is_active()).count(),
            roles: cache.list::<Role>().len(),
        }
    }
}

/// The three views the routing layer mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Users,
    Roles,
}

impl View {
    pub const ALL: [View; 3] = [View::Home, View::Users, View::Roles];

    pub fn path(self) -> &'static str {
        match self {
            View::Home => "/",
            View::Users => "/users",
            View::Roles => "/roles",
        }
    }

    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            View::Home => "Dashboard",
            View::Users => "Users",
            View::Roles => "Roles",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        View::ALL.into_iter().find(|v| v.path() == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entity, EntityId, UserStatus};

    #[test]
    fn notice_carries_code_and_message() {
        let notice = Notice::from_error(&AdminError::not_found("User", EntityId(5)));
        assert_eq!(notice.code, "NOT_FOUND");
        assert_eq!(notice.message, "User '5' not found");
    }

    #[test]
    fn summary_counts_cached_lists() {
        let cache = QueryCache::new();
        assert_eq!(Summary::from_cache(&cache), Summary::default());

        cache.set_list(User::seed());
        cache.set_list(Role::seed());
        let summary = Summary::from_cache(&cache);
        assert_eq!(summary, Summary { users: 3, active_users: 2, roles: 3 });

        let mut lakhan = cache.list::<User>()[2].clone();
        lakhan.status = UserStatus::Active;
        cache.apply_updated(lakhan);
        assert_eq!(Summary::from_cache(&cache).active_users, 3);
    }

    #[test]
    fn views_resolve_from_paths() {
        assert_eq!(View::from_path("/"), Some(View::Home));
        assert_eq!(View::from_path("/users/"), Some(View::Users));
        assert_eq!(View::from_path("/roles"), Some(View::Roles));
        assert_eq!(View::from_path("/settings"), None);
        assert_eq!(View::Home.label(), "Dashboard");
    }
}
