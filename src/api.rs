//! Async facade over an entity collection.
//!
//! Managers only talk to [`EntityApi`]. [`MockApi`] resolves every call
//! against a [`MemoryStore`] without I/O or latency; a remote client can
//! implement the same trait and report [`AdminError::Transport`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AdminError;
use crate::model::{Entity, EntityId};
use crate::store::MemoryStore;

/// Request/response shape of a collection:
/// list (→ records), create (fields → record), update (record → record),
/// delete (id → id).
#[async_trait]
pub trait EntityApi<E: Entity>: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<E>, AdminError>;

    async fn create(&self, fields: E::Fields) -> Result<E, AdminError>;

    async fn update(&self, entity: E) -> Result<E, AdminError>;

    async fn delete(&self, id: EntityId) -> Result<EntityId, AdminError>;
}

/// Always-available facade backed by an in-process store.
pub struct MockApi<E: Entity> {
    store: Arc<MemoryStore<E>>,
}

impl<E: Entity> MockApi<E> {
    pub fn new(store: Arc<MemoryStore<E>>) -> Self {
        Self { store }
    }

    /// Facade over a store holding `E::seed()`.
    pub fn seeded() -> Self {
        Self::new(Arc::new(MemoryStore::seeded()))
    }

    /// Facade over an empty store.
    pub fn empty() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn store(&self) -> &Arc<MemoryStore<E>> {
        &self.store
    }
}

#[async_trait]
impl<E: Entity> EntityApi<E> for MockApi<E> {
    async fn list(&self) -> Result<Vec<E>, AdminError> {
        Ok(self.store.list())
    }

    async fn create(&self, fields: E::Fields) -> Result<E, AdminError> {
        Ok(self.store.create(fields))
    }

    async fn update(&self, entity: E) -> Result<E, AdminError> {
        self.store.update(entity)
    }

    async fn delete(&self, id: EntityId) -> Result<EntityId, AdminError> {
        self.store.delete(id)
    }
}
