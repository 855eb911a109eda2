use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Topic trie used by both the request router and cache subscriptions.
///
/// Levels are separated by `/`. In a pattern, `+` matches exactly one
/// level and `#` (last level only) matches zero or more remaining levels,
/// so `users/#` matches `users` as well as `users/form`.
pub struct Trie<T> {
    root: RwLock<Node<T>>,
}

struct Node<T> {
    children: HashMap<String, Node<T>>,
    /// Child for a `+` level.
    single: Option<Box<Node<T>>>,
    /// Values registered with a trailing `#` at this level.
    rest: Vec<T>,
    /// Values whose pattern ends exactly here.
    values: Vec<T>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            single: None,
            rest: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T: Clone> Trie<T> {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Node::default()),
        }
    }

    pub fn insert(&self, pattern: &str, value: T) {
        let mut root = self.root.write().unwrap_or_else(PoisonError::into_inner);
        let mut node = &mut *root;
        for level in levels(pattern) {
            match level {
                "#" => {
                    node.rest.push(value);
                    return;
                }
                "+" => node = &mut **node.single.get_or_insert_with(Default::default),
                exact => node = node.children.entry(exact.to_string()).or_default(),
            }
        }
        node.values.push(value);
    }

    /// All values whose pattern matches the concrete `topic`, in
    /// registration order per node (exact before `+` before `#`).
    pub fn match_topic(&self, topic: &str) -> Vec<T> {
        let root = self.root.read().unwrap_or_else(PoisonError::into_inner);
        let topic: Vec<&str> = levels(topic).collect();
        let mut out = Vec::new();
        root.collect(&topic, &mut out);
        out
    }

    /// Remove values at `pattern` for which `predicate` holds.
    /// Returns `true` if anything was removed.
    pub fn remove<F>(&self, pattern: &str, predicate: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        let mut root = self.root.write().unwrap_or_else(PoisonError::into_inner);
        let mut node = &mut *root;
        for level in levels(pattern) {
            let next = match level {
                "#" => return retain_not(&mut node.rest, &predicate),
                "+" => node.single.as_deref_mut(),
                exact => node.children.get_mut(exact),
            };
            match next {
                Some(child) => node = child,
                None => return false,
            }
        }
        retain_not(&mut node.values, &predicate)
    }
}

impl<T: Clone> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Node<T> {
    fn collect(&self, topic: &[&str], out: &mut Vec<T>) {
        let Some((first, rest)) = topic.split_first() else {
            out.extend(self.values.iter().cloned());
            out.extend(self.rest.iter().cloned());
            return;
        };
        if let Some(child) = self.children.get(*first) {
            child.collect(rest, out);
        }
        if let Some(single) = &self.single {
            single.collect(rest, out);
        }
        out.extend(self.rest.iter().cloned());
    }
}

fn levels(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|level| !level.is_empty())
}

fn retain_not<T, F: Fn(&T) -> bool>(values: &mut Vec<T>, predicate: &F) -> bool {
    let before = values.len();
    values.retain(|v| !predicate(v));
    values.len() < before
}
