use std::fmt;
use std::hash::Hash;

use hashbrown::HashMap;

use super::history::UndoQueue;

/// Holds the undo history of owners that are not connected. Entries stay
/// until [`invalidate`](Self::invalidate) removes them.
pub struct OfflineUndoHandler<K> {
    parked: HashMap<K, UndoQueue>,
}

impl<K> Default for OfflineUndoHandler<K> {
    fn default() -> Self {
        Self {
            parked: HashMap::new(),
        }
    }
}

impl<K> OfflineUndoHandler<K>
where
    K: Eq + Hash + fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `history` under `key`, replacing anything parked there before.
    pub fn register(&mut self, key: K, history: UndoQueue) {
        log::info!(
            "parking undo history for {:?} ({} undoable)",
            key,
            history.undo_len()
        );
        if self.parked.insert(key, history).is_some() {
            log::debug!("replaced previously parked history");
        }
    }

    pub fn get(&self, key: &K) -> Option<&UndoQueue> {
        self.parked.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut UndoQueue> {
        self.parked.get_mut(key)
    }

    /// Removes and returns the parked history.
    pub fn invalidate(&mut self, key: &K) -> Option<UndoQueue> {
        let out = self.parked.remove(key);
        if out.is_some() {
            log::info!("reclaimed undo history for {:?}", key);
        }
        out
    }

    pub fn contains(&self, key: &K) -> bool {
        self.parked.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.parked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parked.is_empty()
    }
}
