//! End-to-end flows through the dashboard: request in, cache out.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use openerp_admin::error::error_code;
use openerp_admin::*;

fn ada() -> FormData {
    FormData::new()
        .field("name", "Ada")
        .field("email", "ada@x.com")
        .field("role", "Admin")
        .field("status", "Active")
}

async fn mounted() -> Dashboard {
    let dashboard = Dashboard::default();
    dashboard.mount(View::Home).await;
    dashboard
}

/// Facade whose mutations always fail at the transport level.
struct Offline {
    inner: MockApi<User>,
}

#[async_trait]
impl EntityApi<User> for Offline {
    async fn list(&self) -> Result<Vec<User>, AdminError> {
        self.inner.list().await
    }

    async fn create(&self, _fields: UserFields) -> Result<User, AdminError> {
        Err(AdminError::transport("connection refused"))
    }

    async fn update(&self, _entity: User) -> Result<User, AdminError> {
        Err(AdminError::transport("connection refused"))
    }

    async fn delete(&self, _id: EntityId) -> Result<EntityId, AdminError> {
        Err(AdminError::transport("connection refused"))
    }
}

#[tokio::test]
async fn user_create_edit_delete() {
    let dashboard = mounted().await;
    let seeded = dashboard.list::<User>();

    dashboard.add::<User>().await;
    assert!(dashboard.form::<User>().open);
    dashboard.submit::<User>(ada()).await;

    let users = dashboard.list::<User>();
    assert_eq!(users.len(), 4);
    assert_eq!(&users[..3], &seeded[..]);
    let created = users[3].clone();
    assert_eq!(created.name, "Ada");
    assert_eq!(created.status, UserStatus::Active);
    assert!(!seeded.iter().any(|u| u.id == created.id));
    assert!(!dashboard.form::<User>().open);

    dashboard.edit::<User>(created.id).await;
    assert_eq!(dashboard.form::<User>().title(), "Edit User");
    let values = dashboard.form_values::<User>().field("status", "Inactive");
    dashboard.submit::<User>(values).await;

    let users = dashboard.list::<User>();
    assert_eq!(users.len(), 4);
    assert_eq!(users[3].id, created.id);
    assert_eq!(users[3].status, UserStatus::Inactive);
    assert_eq!(users[3].email, "ada@x.com");
    assert_eq!(&users[..3], &seeded[..]);
    assert_eq!(dashboard.form::<User>().mode, FormMode::Creating);

    dashboard.delete::<User>(created.id).await;
    assert_eq!(dashboard.list::<User>(), seeded);
    assert!(dashboard.notice().is_none());
}

#[tokio::test]
async fn role_with_partial_permissions() {
    let dashboard = mounted().await;

    dashboard.add::<Role>().await;
    dashboard
        .submit::<Role>(FormData::new().field("name", "Auditor").check("read"))
        .await;

    let roles = dashboard.list::<Role>();
    assert_eq!(roles.len(), 4);
    assert_eq!(roles[3].name, "Auditor");
    assert_eq!(roles[3].permissions, vec![Permission::Read]);
    assert_eq!(roles[3].permission_summary(), "read");
}

#[tokio::test]
async fn role_with_no_permissions_is_accepted() {
    let dashboard = mounted().await;

    dashboard.add::<Role>().await;
    dashboard.submit::<Role>(FormData::new().field("name", "Guest")).await;

    let roles = dashboard.list::<Role>();
    assert_eq!(roles.len(), 4);
    assert!(roles[3].permissions.is_empty());
}

#[tokio::test]
async fn editing_a_role_replaces_it_in_place() {
    let dashboard = mounted().await;

    dashboard.edit::<Role>(EntityId(2)).await;
    let values = dashboard.form_values::<Role>().check("delete");
    dashboard.submit::<Role>(values).await;

    let roles = dashboard.list::<Role>();
    let names: Vec<_> = roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Admin", "Editor", "Viewer"]);
    assert!(roles[1].has_permission(Permission::Delete));
    assert_eq!(roles[0].permissions.len(), 3);
    assert_eq!(roles[2].permissions, vec![Permission::Read]);
}

#[tokio::test]
async fn rapid_creates_get_distinct_ids() {
    let dashboard = mounted().await;

    for i in 0..20 {
        dashboard.add::<User>().await;
        let form = ada().field("email", format!("ada{i}@x.com"));
        dashboard.submit::<User>(form).await;
    }

    let users = dashboard.list::<User>();
    assert_eq!(users.len(), 23);
    let ids: HashSet<_> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids.len(), 23);
}

#[tokio::test]
async fn validation_failure_stays_on_the_form() {
    let dashboard = mounted().await;
    let before = dashboard.list::<User>();

    dashboard.add::<User>().await;
    dashboard.submit::<User>(ada().field("email", "not-an-email")).await;

    let form = dashboard.form::<User>();
    assert!(form.open);
    assert!(!form.busy);
    assert_eq!(form.error.as_ref().map(|e| e.field.as_str()), Some("email"));
    assert_eq!(dashboard.list::<User>(), before);
    assert!(dashboard.notice().is_none());

    dashboard.submit::<User>(ada()).await;
    assert_eq!(dashboard.list::<User>().len(), 4);
    assert!(dashboard.form::<User>().error.is_none());
}

#[tokio::test]
async fn unknown_role_option_is_rejected() {
    let dashboard = mounted().await;
    dashboard.add::<User>().await;
    dashboard.submit::<User>(ada().field("role", "Superuser")).await;

    let form = dashboard.form::<User>();
    assert_eq!(form.error.map(|e| e.field), Some("role".to_string()));
    assert_eq!(dashboard.list::<User>().len(), 3);
}

#[tokio::test]
async fn deleting_a_missing_record_raises_a_notice() {
    let dashboard = mounted().await;
    let before = dashboard.list::<User>();

    dashboard.delete::<User>(EntityId(999)).await;

    assert_eq!(dashboard.list::<User>(), before);
    let notice = dashboard.clear_notice().expect("notice");
    assert_eq!(notice.code, error_code::NOT_FOUND);
    assert!(notice.message.contains("999"));
    assert!(dashboard.notice().is_none());
}

#[tokio::test]
async fn editing_an_uncached_record_raises_a_notice() {
    let dashboard = mounted().await;

    dashboard.edit::<Role>(EntityId(42)).await;

    assert!(!dashboard.form::<Role>().open);
    assert_eq!(dashboard.notice().map(|n| n.code), Some(error_code::NOT_FOUND.to_string()));
}

#[tokio::test]
async fn transport_failure_leaves_cache_untouched() {
    let users = Arc::new(Offline { inner: MockApi::seeded() });
    let dashboard = Dashboard::with_apis(users, Arc::new(MockApi::<Role>::seeded()), FormOptions::default());
    dashboard.mount(View::Users).await;
    let before = dashboard.list::<User>();

    dashboard.add::<User>().await;
    dashboard.submit::<User>(ada()).await;

    assert_eq!(dashboard.list::<User>(), before);
    let form = dashboard.form::<User>();
    assert!(form.open);
    assert!(!form.busy);
    assert!(form.error.is_none());
    assert_eq!(dashboard.notice().map(|n| n.code), Some(error_code::TRANSPORT.to_string()));

    dashboard.delete::<User>(EntityId(1)).await;
    assert_eq!(dashboard.list::<User>(), before);
}

#[tokio::test]
async fn refresh_reconciles_with_the_store() {
    let users = Arc::new(MockApi::<User>::seeded());
    let dashboard = Dashboard::with_apis(users.clone(), Arc::new(MockApi::<Role>::seeded()), FormOptions::default());
    dashboard.mount(View::Users).await;

    users.store().create(UserFields {
        name: "Grace".into(),
        email: "grace@x.com".into(),
        role: "Viewer".into(),
        status: UserStatus::Inactive,
    });
    users.store().delete(EntityId(1)).unwrap();
    assert_eq!(dashboard.list::<User>().len(), 3);

    dashboard.mount(View::Users).await;
    assert_eq!(dashboard.list::<User>()[0].id, EntityId(1));

    dashboard.refresh::<User>().await;
    let names: Vec<_> = dashboard.list::<User>().into_iter().map(|u| u.name).collect();
    assert_eq!(names, ["sita rao", "lakhan mane", "Grace"]);
}

#[tokio::test]
async fn subscribers_see_list_and_form_writes() {
    let dashboard = Dashboard::default();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let s = seen.clone();
    let id = dashboard.subscribe("users/#", move |path, _| {
        s.lock().unwrap().push(path.to_string());
    });

    dashboard.mount(View::Home).await;
    dashboard.add::<User>().await;
    dashboard.submit::<User>(ada()).await;

    let paths = seen.lock().unwrap().clone();
    assert_eq!(paths.first().map(String::as_str), Some("users"));
    assert!(paths.iter().any(|p| p == "users/form"));
    assert!(!paths.iter().any(|p| p.starts_with("roles")));

    assert!(dashboard.unsubscribe("users/#", id));
    let count = seen.lock().unwrap().len();
    dashboard.delete::<User>(EntityId(2)).await;
    assert_eq!(seen.lock().unwrap().len(), count);
}

#[tokio::test]
async fn summary_tracks_status_changes() {
    let dashboard = mounted().await;
    assert_eq!(dashboard.summary().active_users, 2);

    dashboard.edit::<User>(EntityId(1)).await;
    let values = dashboard.form_values::<User>().field("status", "Inactive");
    dashboard.submit::<User>(values).await;

    assert_eq!(dashboard.summary(), Summary { users: 3, active_users: 1, roles: 3 });
}

#[tokio::test]
async fn delete_before_load_does_not_hide_the_store() {
    let dashboard = Dashboard::default();

    dashboard.delete::<User>(EntityId(1)).await;
    assert!(!dashboard.contains("users"));

    dashboard.mount(View::Users).await;
    let ids: Vec<_> = dashboard.list::<User>().into_iter().map(|u| u.id).collect();
    assert_eq!(ids, [EntityId(2), EntityId(3)]);
}

#[tokio::test]
async fn create_before_load_is_fetched_with_the_rest() {
    let dashboard = Dashboard::default();

    dashboard.add::<Role>().await;
    dashboard
        .submit::<Role>(FormData::new().field("name", "Auditor").check("read"))
        .await;
    assert!(!dashboard.contains("roles"));
    assert!(!dashboard.form::<Role>().open);

    dashboard.mount(View::Roles).await;
    let names: Vec<_> = dashboard.list::<Role>().into_iter().map(|r| r.name).collect();
    assert_eq!(names, ["Admin", "Editor", "Viewer", "Auditor"]);
}

#[tokio::test]
async fn missed_delete_does_not_notify_list_subscribers() {
    let dashboard = mounted().await;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    dashboard.subscribe("users", move |path, _| {
        s.lock().unwrap().push(path.to_string());
    });

    dashboard.delete::<User>(EntityId(999)).await;
    assert!(seen.lock().unwrap().is_empty());

    dashboard.delete::<User>(EntityId(3)).await;
    assert_eq!(*seen.lock().unwrap(), ["users"]);
}
