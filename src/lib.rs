//! OpenERP admin: users and roles management core.
//!
//! The non-visual half of an admin dashboard: Rust owns the records, the
//! list cache and the form state; a UI layer only renders them and emits
//! requests.
//!
//! # Layers
//!
//! - [`store`]: in-memory collections seeded with sample data
//! - [`api`]: async facade ([`EntityApi`]) over a collection
//! - [`cache`]: path-keyed list cache, rewritten after each mutation
//! - [`form`]: create/edit form controller
//! - [`handlers`]: facade call followed by the cache rewrite
//! - [`app`]: [`Dashboard`], which owns the cache and routes requests
//!
//! # Paths
//!
//! | Path | Holds |
//! |------|-------|
//! | `users`, `roles` | cached lists |
//! | `users/form`, `roles/form` | [`FormController`] |
//! | `app/notice` | last [`Notice`] |
//!
//! Requests use the same prefixes: `users/load`, `roles/submit`, ...
//! (see [`Action`]).

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod model;
pub mod request;
pub mod router;
pub mod state;
pub mod store;
pub mod trie;

pub use api::{EntityApi, MockApi};
pub use app::Dashboard;
pub use cache::{QueryCache, StateValue, SubscriptionId};
pub use config::AdminConfig;
pub use error::AdminError;
pub use form::{FormController, FormData, FormEntity, FormMode, FormOptions, Submission};
pub use model::{Entity, EntityId, Permission, Role, RoleFields, User, UserFields, UserStatus};
pub use request::Action;
pub use state::{Notice, Summary, View};
pub use store::MemoryStore;
