use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use crate::cache::QueryCache;
use crate::trie::Trie;

/// A boxed, `Send`-able future returned by request handlers.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Type-erased request payload.
pub type Payload = Arc<dyn Any + Send + Sync>;

type ErasedHandler = Arc<dyn Fn(String, Payload, Arc<QueryCache>) -> BoxFuture + Send + Sync>;

/// Maps request path patterns to async handlers.
///
/// Several handlers may match one path (through `+` / `#`); they run one
/// after another in match order. A path with no handler is a no-op.
pub struct Router {
    trie: Trie<ErasedHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self { trie: Trie::new() }
    }

    /// Register `handler` for `pattern`.
    ///
    /// The handler receives the concrete request path, the payload (to be
    /// downcast by the handler) and the cache it may rewrite.
    pub fn on<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(String, Payload, Arc<QueryCache>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: ErasedHandler = Arc::new(
            move |path: String, payload: Payload, cache: Arc<QueryCache>| -> BoxFuture {
                Box::pin(handler(path, payload, cache))
            },
        );
        self.trie.insert(pattern, handler);
    }

    /// Run every handler matching `path`, awaiting each in turn.
    pub async fn dispatch(&self, path: &str, payload: Payload, cache: Arc<QueryCache>) {
        let handlers = self.trie.match_topic(path);
        if handlers.is_empty() {
            debug!(path, "router: no handler");
            return;
        }
        for handler in handlers {
            handler(path.to_string(), Arc::clone(&payload), Arc::clone(&cache)).await;
        }
    }

    /// Whether any handler would run for `path`.
    pub fn matches(&self, path: &str) -> bool {
        !self.trie.match_topic(path).is_empty()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
