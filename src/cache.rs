use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::model::{Entity, EntityId};
use crate::trie::Trie;

/// A type-erased cache value.
///
/// Clones share one allocation, so subscribers and readers see the exact
/// list that was written.
#[derive(Clone)]
pub struct StateValue(Arc<dyn Any + Send + Sync>);

impl StateValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Returns `None` if the stored type is not `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    pub fn type_id(&self) -> TypeId {
        (*self.0).type_id()
    }
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateValue").field(&self.type_id()).finish()
    }
}

/// Handle returned by [`QueryCache::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback type for cache change notifications.
pub type ChangeHandler = Arc<dyn Fn(&str, &StateValue) + Send + Sync>;

/// Path-keyed query cache with pattern subscriptions.
///
/// Entity lists are stored as `Vec<E>` under `E::KIND` (`users`, `roles`).
/// Once the initial load lands, the cache is the only source the view
/// reads; mutations rewrite the cached list rather than refetching:
///
/// - created  → append
/// - updated  → replace the element with the same id
/// - deleted  → drop the element with that id
///
/// Every write notifies subscribers whose pattern matches the path. Each
/// rewrite is atomic under the write lock; two rewrites racing on the same
/// path resolve last-writer-wins.
pub struct QueryCache {
    values: RwLock<BTreeMap<String, StateValue>>,
    handlers: Trie<HandlerEntry>,
    next_id: AtomicU64,
}

#[derive(Clone)]
struct HandlerEntry {
    id: SubscriptionId,
    handler: ChangeHandler,
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            handlers: Trie::new(),
            next_id: AtomicU64::new(1),
        }
    }

    // ====================================================================
    // Raw paths
    // ====================================================================

    /// Store a value at `path` and notify matching subscribers.
    pub fn set<T: Any + Send + Sync>(&self, path: &str, value: T) {
        self.set_value(path, StateValue::new(value));
    }

    pub fn set_value(&self, path: &str, value: StateValue) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), value.clone());
        self.notify(path, &value);
    }

    pub fn get(&self, path: &str) -> Option<StateValue> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    /// Typed read. `None` when the path is unset or holds another type.
    pub fn get_as<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.get(path).and_then(|v| v.downcast_ref::<T>().cloned())
    }

    /// Remove the value at `path`. Subscribers are not notified.
    pub fn remove(&self, path: &str) -> Option<StateValue> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.values.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All paths and values, ordered by path.
    pub fn snapshot(&self) -> Vec<(String, StateValue)> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Read-modify-write of a typed value.
    ///
    /// `f` sees the current value (or `T::default()` when the path is unset
    /// or holds another type) and returns the replacement. The read and the
    /// write happen under one lock; subscribers run after it is released.
    pub fn modify<T, F>(&self, path: &str, f: F) -> T
    where
        T: Any + Clone + Default + Send + Sync,
        F: FnOnce(T) -> T,
    {
        let (next, value) = {
            let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
            let current = values
                .get(path)
                .and_then(|v| v.downcast_ref::<T>().cloned())
                .unwrap_or_default();
            let next = f(current);
            let value = StateValue::new(next.clone());
            values.insert(path.to_string(), value.clone());
            (next, value)
        };
        self.notify(path, &value);
        next
    }

    // ====================================================================
    // Entity lists
    // ====================================================================

    /// Whether the initial list for `E` has been stored.
    pub fn is_loaded<E: Entity>(&self) -> bool {
        self.get(E::KIND).is_some_and(|v| v.is::<Vec<E>>())
    }

    /// Cached list for `E`, empty until loaded.
    pub fn list<E: Entity>(&self) -> Vec<E> {
        self.get_as::<Vec<E>>(E::KIND).unwrap_or_default()
    }

    /// Cached record for `id`, if any.
    pub fn find<E: Entity>(&self, id: EntityId) -> Option<E> {
        self.get(E::KIND)
            .and_then(|v| v.downcast_ref::<Vec<E>>().and_then(|items| {
                items.iter().find(|e| e.id() == id).cloned()
            }))
    }

    /// Replace the whole cached list (initial load and refetch).
    pub fn set_list<E: Entity>(&self, items: Vec<E>) {
        debug!(kind = E::KIND, len = items.len(), "cache: list stored");
        self.set(E::KIND, items);
    }

    /// Append a freshly created record.
    ///
    /// Returns `false` without writing when the list has not been loaded;
    /// the next mount fetches it, record included.
    pub fn apply_created<E: Entity>(&self, entity: E) -> bool {
        let id = entity.id();
        let appended = self.rewrite::<E, _>(|items| {
            items.push(entity);
            true
        });
        debug!(kind = E::KIND, %id, appended, "cache: appended");
        appended
    }

    /// Replace the record whose id matches. Returns `false` when none did.
    pub fn apply_updated<E: Entity>(&self, entity: E) -> bool {
        let id = entity.id();
        let replaced = self.rewrite::<E, _>(|items| match items.iter_mut().find(|e| e.id() == id) {
            Some(slot) => {
                *slot = entity;
                true
            }
            None => false,
        });
        debug!(kind = E::KIND, %id, replaced, "cache: replaced");
        replaced
    }

    /// Drop the record with `id`. Returns `false` when it was not cached.
    pub fn apply_deleted<E: Entity>(&self, id: EntityId) -> bool {
        let removed = self.rewrite::<E, _>(|items| {
            let before = items.len();
            items.retain(|e| e.id() != id);
            items.len() < before
        });
        debug!(kind = E::KIND, %id, removed, "cache: removed");
        removed
    }

    /// Edit a copy of the loaded list for `E` and store it if `f` reports a
    /// change. An unloaded list is left absent and nobody is notified.
    fn rewrite<E, F>(&self, f: F) -> bool
    where
        E: Entity,
        F: FnOnce(&mut Vec<E>) -> bool,
    {
        let value = {
            let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
            let Some(mut items) = values
                .get(E::KIND)
                .and_then(|v| v.downcast_ref::<Vec<E>>().cloned())
            else {
                return false;
            };
            if !f(&mut items) {
                return false;
            }
            let value = StateValue::new(items);
            values.insert(E::KIND.to_string(), value.clone());
            value
        };
        self.notify(E::KIND, &value);
        true
    }

    // ====================================================================
    // Subscriptions
    // ====================================================================

    /// Subscribe to writes on paths matching `pattern` (`+` and `#` allowed).
    ///
    /// The handler runs synchronously on the writing thread.
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.insert(
            pattern,
            HandlerEntry {
                id,
                handler: Arc::new(handler),
            },
        );
        id
    }

    /// Returns `true` if a subscription was removed.
    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) -> bool {
        self.handlers.remove(pattern, |entry| entry.id == id)
    }

    fn notify(&self, path: &str, value: &StateValue) {
        for entry in self.handlers.match_topic(path) {
            (entry.handler)(path, value);
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
