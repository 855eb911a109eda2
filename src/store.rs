//! In-memory entity store backing the mock facade.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::error::AdminError;
use crate::model::{Entity, EntityId};

/// Hands out timestamp-derived ids.
///
/// Ids are the current Unix time in milliseconds, bumped past the last
/// issued id so that two creates in the same millisecond stay distinct.
#[derive(Debug, Default)]
pub struct IdClock {
    last: AtomicI64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> EntityId {
        let now = chrono::Utc::now().timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return EntityId(candidate),
                Err(actual) => last = actual,
            }
        }
    }
}

/// Ordered, process-lifetime collection of one entity type.
///
/// List order is insertion order; `create` appends.
pub struct MemoryStore<E: Entity> {
    items: RwLock<Vec<E>>,
    ids: IdClock,
}

impl<E: Entity> MemoryStore<E> {
    /// An empty store.
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// A store holding `E::seed()`.
    pub fn seeded() -> Self {
        Self::with_items(E::seed())
    }

    pub fn with_items(items: Vec<E>) -> Self {
        Self {
            items: RwLock::new(items),
            ids: IdClock::new(),
        }
    }

    pub fn list(&self) -> Vec<E> {
        self.items.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Assign a fresh id and append. Field values are not checked for duplicates.
    pub fn create(&self, fields: E::Fields) -> E {
        let entity = E::assemble(self.ids.next(), fields);
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.push(entity.clone());
        debug!(kind = E::KIND, id = %entity.id(), "store: created");
        entity
    }

    /// Replace the record carrying `entity`'s id, keeping its position.
    pub fn update(&self, entity: E) -> Result<E, AdminError> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let slot = items
            .iter_mut()
            .find(|e| e.id() == entity.id())
            .ok_or_else(|| AdminError::not_found(E::LABEL, entity.id()))?;
        *slot = entity.clone();
        debug!(kind = E::KIND, id = %entity.id(), "store: updated");
        Ok(entity)
    }

    /// Remove the record with `id` and echo the id back.
    pub fn delete(&self, id: EntityId) -> Result<EntityId, AdminError> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let pos = items
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| AdminError::not_found(E::LABEL, id))?;
        items.remove(pos);
        debug!(kind = E::KIND, %id, "store: deleted");
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Entity> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Permission, Role, RoleFields, User, UserFields, UserStatus};
    use std::collections::HashSet;

    fn ada() -> UserFields {
        UserFields {
            name: "Ada".into(),
            email: "ada@x.com".into(),
            role: "Admin".into(),
            status: UserStatus::Active,
        }
    }

    #[test]
    fn id_clock_is_strictly_increasing() {
        let clock = IdClock::new();
        let ids: Vec<_> = (0..1000).map(|_| clock.next()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn seeded_store_lists_in_order() {
        let store = MemoryStore::<User>::seeded();
        let names: Vec<_> = store.list().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["ram patil", "sita rao", "lakhan mane"]);
    }

    #[test]
    fn create_appends_with_unique_ids() {
        let store = MemoryStore::<User>::seeded();
        let mut seen = HashSet::new();
        for _ in 0..50 {
            let user = store.create(ada());
            assert!(seen.insert(user.id));
        }
        assert_eq!(store.len(), 53);
        assert_eq!(store.list().last().unwrap().name, "Ada");
    }

    #[test]
    fn update_replaces_in_place() {
        let store = MemoryStore::<Role>::seeded();
        let mut editor = store.list()[1].clone();
        editor.permissions = vec![Permission::Read];
        let updated = store.update(editor.clone()).unwrap();
        assert_eq!(updated, editor);

        let roles = store.list();
        assert_eq!(roles[1], editor);
        assert_eq!(roles[0], Role::seed()[0]);
        assert_eq!(roles[2], Role::seed()[2]);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let store = MemoryStore::<Role>::seeded();
        let ghost = Role::assemble(EntityId(404), RoleFields { name: "Ghost".into(), permissions: vec![] });
        let err = store.update(ghost).unwrap_err();
        assert_eq!(err, AdminError::not_found("Role", EntityId(404)));
        assert_eq!(store.list(), Role::seed());
    }

    #[test]
    fn delete_echoes_id() {
        let store = MemoryStore::<User>::seeded();
        assert_eq!(store.delete(EntityId(2)), Ok(EntityId(2)));
        assert_eq!(store.len(), 2);
        assert!(store.delete(EntityId(2)).is_err());
        assert_eq!(store.len(), 2);
    }
}
