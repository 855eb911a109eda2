use std::any::Any;
use std::sync::Arc;

use tracing::info;

use crate::api::{EntityApi, MockApi};
use crate::cache::{QueryCache, StateValue, SubscriptionId};
use crate::config::AdminConfig;
use crate::form::{FormController, FormData, FormEntity, FormOptions};
use crate::handlers;
use crate::model::{Entity, EntityId, Role, User};
use crate::request::{Action, DeleteReq, EditReq, SubmitReq};
use crate::router::Router;
use crate::state::{Notice, Summary, View};

/// The admin dashboard: one owned cache plus the request router.
///
/// The cache lives as long as the dashboard. Presentation reads it with
/// `get` / `list` / `form`, reacts to `subscribe`, and drives it with
/// `emit` (or the typed shortcuts such as [`Dashboard::submit`]).
///
/// # Examples
///
/// ```ignore
/// let dashboard = Dashboard::new(&AdminConfig::default());
/// dashboard.mount(View::Users).await;
///
/// dashboard.add::<User>().await;
/// dashboard
///     .submit::<User>(FormData::new()
///         .field("name", "Ada")
///         .field("email", "ada@x.com")
///         .field("role", "Admin")
///         .field("status", "Active"))
///     .await;
///
/// assert_eq!(dashboard.list::<User>().len(), 4);
/// ```
pub struct Dashboard {
    cache: Arc<QueryCache>,
    router: Router,
    options: Arc<FormOptions>,
}

impl Dashboard {
    /// Dashboard over mock facades, seeded according to `config`.
    pub fn new(config: &AdminConfig) -> Self {
        let (users, roles) = if config.seed {
            (MockApi::<User>::seeded(), MockApi::<Role>::seeded())
        } else {
            (MockApi::<User>::empty(), MockApi::<Role>::empty())
        };
        Self::with_apis(Arc::new(users), Arc::new(roles), config.form_options())
    }

    /// Dashboard over caller-supplied facades.
    pub fn with_apis(
        users: Arc<dyn EntityApi<User>>,
        roles: Arc<dyn EntityApi<Role>>,
        options: FormOptions,
    ) -> Self {
        let router = Router::new();
        let options = Arc::new(options);
        handlers::register::<User>(&router, users, options.clone());
        handlers::register::<Role>(&router, roles, options.clone());
        Self {
            cache: Arc::new(QueryCache::new()),
            router,
            options,
        }
    }

    // ====================================================================
    // State
    // ====================================================================

    pub fn get(&self, path: &str) -> Option<StateValue> {
        self.cache.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.cache.contains(path)
    }

    /// Cached list for `E`, empty until loaded.
    pub fn list<E: Entity>(&self) -> Vec<E> {
        self.cache.list::<E>()
    }

    /// Current form state for `E`.
    pub fn form<E: FormEntity>(&self) -> FormController<E> {
        self.cache
            .get_as::<FormController<E>>(&FormController::<E>::path())
            .unwrap_or_default()
    }

    /// Values the open form's inputs start with.
    pub fn form_values<E: FormEntity>(&self) -> FormData {
        self.form::<E>().initial_values(&self.options)
    }

    /// Last raised notification, if any.
    pub fn notice(&self) -> Option<Notice> {
        self.cache.get_as::<Notice>(Notice::PATH)
    }

    /// Acknowledge the current notification.
    pub fn clear_notice(&self) -> Option<Notice> {
        self.cache
            .remove(Notice::PATH)
            .and_then(|v| v.downcast_ref::<Notice>().cloned())
    }

    pub fn summary(&self) -> Summary {
        Summary::from_cache(&self.cache)
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// JSON view of lists, forms and the pending notice.
    pub fn export(&self) -> serde_json::Value {
        serde_json::json!({
            "summary": self.summary(),
            "users": self.list::<User>(),
            "roles": self.list::<Role>(),
            "forms": {
                "users": self.form::<User>(),
                "roles": self.form::<Role>(),
            },
            "notice": self.notice(),
        })
    }

    // ====================================================================
    // Requests
    // ====================================================================

    /// Route a request to its handlers and wait for them.
    ///
    /// A path nobody handles is a silent no-op.
    pub async fn emit<T: Any + Send + Sync>(&self, path: &str, payload: T) {
        self.router
            .dispatch(path, Arc::new(payload), Arc::clone(&self.cache))
            .await;
    }

    pub fn has_handler(&self, path: &str) -> bool {
        self.router.matches(path)
    }

    /// Mount a view: fetch whichever lists it shows that are not cached yet.
    pub async fn mount(&self, view: View) {
        info!(view = view.path(), "mount");
        match view {
            View::Home => {
                self.ensure_loaded::<User>().await;
                self.ensure_loaded::<Role>().await;
            }
            View::Users => self.ensure_loaded::<User>().await,
            View::Roles => self.ensure_loaded::<Role>().await,
        }
    }

    async fn ensure_loaded<E: FormEntity>(&self) {
        if !self.cache.is_loaded::<E>() {
            self.load::<E>().await;
        }
    }

    pub async fn load<E: FormEntity>(&self) {
        self.emit(&Action::Load.path::<E>(), ()).await;
    }

    pub async fn refresh<E: FormEntity>(&self) {
        self.emit(&Action::Refresh.path::<E>(), ()).await;
    }

    pub async fn add<E: FormEntity>(&self) {
        self.emit(&Action::Add.path::<E>(), ()).await;
    }

    pub async fn edit<E: FormEntity>(&self, id: EntityId) {
        self.emit(&Action::Edit.path::<E>(), EditReq { id }).await;
    }

    pub async fn dismiss<E: FormEntity>(&self) {
        self.emit(&Action::Dismiss.path::<E>(), ()).await;
    }

    pub async fn submit<E: FormEntity>(&self, fields: FormData) {
        self.emit(&Action::Submit.path::<E>(), SubmitReq { fields }).await;
    }

    pub async fn delete<E: FormEntity>(&self, id: EntityId) {
        self.emit(&Action::Delete.path::<E>(), DeleteReq { id }).await;
    }

    // ====================================================================
    // Subscriptions
    // ====================================================================

    /// Observe cache writes matching `pattern` (`+` and `#` allowed).
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        self.cache.subscribe(pattern, handler)
    }

    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) -> bool {
        self.cache.unsubscribe(pattern, id)
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(&AdminConfig::default())
    }
}
