mod role;
mod user;

pub use role::*;
pub use user::*;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity identifier. Seeded records use small integers; records created
/// at runtime get a millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record managed by the dashboard (a [`User`] or a [`Role`]).
///
/// `KIND` doubles as the cache key and the request path prefix:
/// the user list lives at `users`, its form at `users/form`, and
/// requests go to `users/load`, `users/submit`, ...
pub trait Entity: Clone + Send + Sync + 'static {
    /// Cache key and request prefix, e.g. `"users"`.
    const KIND: &'static str;

    /// Singular, human-readable name, e.g. `"User"`.
    const LABEL: &'static str;

    /// Everything except the identifier.
    type Fields: Clone + Send + Sync + 'static;

    fn id(&self) -> EntityId;

    /// Build a record from an id and its fields.
    fn assemble(id: EntityId, fields: Self::Fields) -> Self;

    /// Fixed sample records the mock store starts with.
    fn seed() -> Vec<Self>;
}
