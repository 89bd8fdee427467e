use std::collections::HashMap;

use crate::node::NodeId;

/// Identity-keyed table of per-node results.
///
/// Keys are [`NodeId`]s, never structural hashes: two handles to the same node always share
/// one entry. Besides the table itself, the memoization keeps two counters used to check
/// sharing behavior: `dispatches` (results computed and inserted) and `hits` (lookups answered
/// from the table instead of revisiting a node).
#[derive(Debug, Clone)]
pub struct Memoization<T> {
    table: HashMap<NodeId, T>,
    hits: usize,
    dispatches: usize,
}

impl<T> Default for Memoization<T> {
    fn default() -> Self {
        Self {
            table: HashMap::new(),
            hits: 0,
            dispatches: 0,
        }
    }
}

impl<T> Memoization<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result for `id`, if any.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.table.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.table.contains_key(&id)
    }

    /// Store the result computed for `id`. Counts as one dispatch.
    pub fn insert(&mut self, id: NodeId, value: T) {
        self.dispatches += 1;
        self.table.insert(id, value);
    }

    /// Number of memoized nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of visits answered from the table.
    #[inline]
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of results computed and inserted.
    #[inline]
    pub fn dispatches(&self) -> usize {
        self.dispatches
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Iterate over `(id, result)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> {
        self.table.iter().map(|(id, value)| (*id, value))
    }
}
