//! Layer registry: the declared prefix → rank table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordering key of a layer. Lower ranks are more inner.
///
/// A rank of `0` marks a prefix that belongs to no layer; see
/// [`Rank::is_unranked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rank(pub i64);

impl Rank {
    /// Returns `true` for the zero rank, which opts a prefix out of layering.
    #[must_use]
    pub const fn is_unranked(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Rank {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Mapping from layer prefix to rank.
///
/// Built once from configuration and read-only afterwards. Registering the
/// same prefix twice overwrites the earlier rank (last write wins). Values
/// are not validated: zero and negative ranks are stored as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerRegistry {
    layers: HashMap<String, Rank>,
}

impl LayerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or overwrites the rank for `prefix`.
    ///
    /// Returns the rank previously registered for the prefix, if any.
    pub fn register(&mut self, prefix: impl Into<String>, rank: i64) -> Option<Rank> {
        self.layers.insert(prefix.into(), Rank(rank))
    }

    /// Exact-key lookup of a registered prefix.
    #[must_use]
    pub fn lookup(&self, prefix: &str) -> Option<Rank> {
        self.layers.get(prefix).copied()
    }

    /// Number of registered prefixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if no prefix is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Iterates over `(prefix, rank)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Rank)> {
        self.layers.iter().map(|(p, r)| (p.as_str(), *r))
    }

    /// Layers ordered from innermost to outermost, ties broken by prefix.
    #[must_use]
    pub fn by_rank(&self) -> Vec<(&str, Rank)> {
        let mut layers: Vec<_> = self.iter().collect();
        layers.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        layers
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for LayerRegistry {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (prefix, rank) in iter {
            registry.register(prefix, rank);
        }
        registry
    }
}
