//! Layer resolution: maps package and import paths to declared layers.

use serde::Serialize;

use crate::registry::{LayerRegistry, Rank};

/// A declared layer a path resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedLayer<'a> {
    /// The registered prefix that matched.
    pub prefix: &'a str,
    /// Rank of that prefix.
    pub rank: Rank,
}

/// Resolves path-like strings to layer ranks.
///
/// A prefix matches when the candidate starts with it byte-for-byte
/// (case-sensitive, no segment boundary required). When several prefixes
/// match, the longest one wins; prefixes are unique, so the result is
/// deterministic.
#[derive(Debug, Clone)]
pub struct LayerResolver {
    /// (prefix, rank) sorted by prefix length descending.
    map: Vec<(String, Rank)>,
}

impl LayerResolver {
    /// Build a resolver from a registry.
    #[must_use]
    pub fn new(registry: &LayerRegistry) -> Self {
        let mut map: Vec<(String, Rank)> = registry
            .iter()
            .map(|(prefix, rank)| (prefix.to_owned(), rank))
            .collect();
        // Longest prefix first; ties cannot match the same candidate, the
        // secondary key only keeps the table stable.
        map.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { map }
    }

    /// Which layer does this path belong to?
    ///
    /// Returns `None` (unranked) for the empty string, for paths matching no
    /// prefix, and for paths whose longest match carries rank `0`.
    #[must_use]
    pub fn resolve(&self, candidate: &str) -> Option<ResolvedLayer<'_>> {
        if candidate.is_empty() {
            return None;
        }
        let (prefix, rank) = self
            .map
            .iter()
            .find(|(prefix, _)| candidate.starts_with(prefix.as_str()))?;
        if rank.is_unranked() {
            return None;
        }
        Some(ResolvedLayer {
            prefix: prefix.as_str(),
            rank: *rank,
        })
    }

    /// Rank of the layer this path belongs to, if any.
    #[must_use]
    pub fn rank(&self, candidate: &str) -> Option<Rank> {
        self.resolve(candidate).map(|l| l.rank)
    }
}
