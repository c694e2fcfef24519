use std::collections::HashMap;
use std::sync::Arc;

use super::Link;

/// Per-category link cache.
///
/// A plain memoization map from category name to the last fetched link
/// list. No TTL, no size bound, no eviction, no invalidation on
/// external writes: once a category has been fetched, its panel is
/// served from here for the life of the dashboard instance. Stale
/// reads after an admin edits links elsewhere are accepted behavior,
/// resolved only by restart.
///
/// Entries hold `Arc<Vec<Link>>` so serving a hit is a reference-count
/// bump, not a list clone.
#[derive(Debug, Default)]
pub struct LinkCache {
    entries: HashMap<String, Arc<Vec<Link>>>,
}

impl LinkCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached links for a category, if any fetch has completed for it.
    pub fn get(&self, name: &str) -> Option<Arc<Vec<Link>>> {
        self.entries.get(name).cloned()
    }

    /// Memoize a fetched link list. Replaces any previous entry for the
    /// same name (only reachable if two fetches for one category raced;
    /// last writer wins).
    pub fn put(&mut self, name: impl Into<String>, links: Vec<Link>) {
        self.entries.insert(name.into(), Arc::new(links));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
