use std::collections::VecDeque;

use super::queue::ChangeQueue;
use super::world::VoxelWorld;

#[derive(Debug)]
struct HistoryEntry {
    undo: Box<dyn ChangeQueue>,
    // Captured lazily on the first undo unless supplied up front.
    redo: Option<Box<dyn ChangeQueue>>,
}

/// Bounded undo/redo ring for one owner.
///
/// Entries `[0, split)` can be undone (newest last); entries `[split, len)`
/// have been undone and can be redone. Recording a new change discards the
/// redoable tail. Past `capacity` the oldest entry is dropped for good.
#[derive(Debug)]
pub struct UndoQueue {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
    split: usize,
}

impl UndoQueue {
    /// # Panics
    /// If `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "undo history capacity must be positive");
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            split: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries available to [`undo_history`](Self::undo_history).
    #[inline]
    pub fn undo_len(&self) -> usize {
        self.split
    }

    /// Entries available to [`redo_history`](Self::redo_history).
    #[inline]
    pub fn redo_len(&self) -> usize {
        self.entries.len() - self.split
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.split = 0;
    }

    /// Records the inverse of a change just made.
    pub fn add_history(&mut self, undo: Box<dyn ChangeQueue>) {
        self.push(HistoryEntry { undo, redo: None });
    }

    /// Records an inverse together with the forward change that replays it.
    pub fn add_history_pair(&mut self, undo: Box<dyn ChangeQueue>, redo: Box<dyn ChangeQueue>) {
        self.push(HistoryEntry {
            undo,
            redo: Some(redo),
        });
    }

    fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.split);
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
            log::debug!("undo history full ({}); evicted oldest entry", self.capacity);
        }
        self.split = self.entries.len();
    }

    /// Undoes up to `n` of the newest changes and returns how many were
    /// undone. Stops early if a redo snapshot cannot be captured; that entry
    /// stays undoable.
    pub fn undo_history(&mut self, world: &mut dyn VoxelWorld, n: usize) -> usize {
        let mut done = 0;
        while done < n && self.split > 0 {
            let entry = &mut self.entries[self.split - 1];
            if entry.redo.is_none() {
                match entry.undo.capture_inverse(&*world) {
                    Ok(redo) => entry.redo = Some(redo),
                    Err(e) => {
                        log::warn!("cannot capture redo state, stopping undo: {}", e);
                        break;
                    }
                }
            }
            entry.undo.reset();
            entry.undo.flush(world);
            self.split -= 1;
            done += 1;
        }
        done
    }

    /// Replays up to `n` undone changes, oldest undo first, and returns how
    /// many were replayed.
    pub fn redo_history(&mut self, world: &mut dyn VoxelWorld, n: usize) -> usize {
        let mut done = 0;
        while done < n && self.split < self.entries.len() {
            let Some(redo) = self.entries[self.split].redo.as_mut() else {
                break;
            };
            redo.reset();
            redo.flush(world);
            self.split += 1;
            done += 1;
        }
        done
    }
}
