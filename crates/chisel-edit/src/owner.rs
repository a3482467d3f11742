use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;

use super::history::UndoQueue;
use super::material_shape::MaterialShape;
use super::offline::OfflineUndoHandler;
use super::queue::{ChangeQueue, MaterialShapeChangeQueue};
use super::world::VoxelWorld;
use super::{EditError, Location};

/// FIFO entry. A recorded edit reads its inverse from the world right before
/// its first write, so it sees every earlier edit of the same owner.
#[derive(Debug)]
struct PendingChange {
    forward: Box<dyn ChangeQueue>,
    record: bool,
    inverse: Option<Box<dyn ChangeQueue>>,
    capture_failed: bool,
}

impl PendingChange {
    fn new(mut forward: Box<dyn ChangeQueue>, record: bool) -> Self {
        forward.reset();
        Self {
            forward,
            record,
            inverse: None,
            capture_failed: false,
        }
    }
}

impl ChangeQueue for PendingChange {
    fn origin(&self) -> Location {
        self.forward.origin()
    }

    /// Writes nothing until the inverse has been captured; a region that
    /// cannot be read yet stalls the edit instead of losing its undo.
    fn perform(&mut self, world: &mut dyn VoxelWorld, allocation: usize) -> usize {
        if self.record && self.inverse.is_none() {
            match self.forward.capture_inverse(&*world) {
                Ok(inverse) => self.inverse = Some(inverse),
                Err(e) => {
                    if !self.capture_failed {
                        log::warn!(
                            "edit at {} waiting for its region: {}",
                            self.forward.origin(),
                            e
                        );
                        self.capture_failed = true;
                    }
                    return 0;
                }
            }
        }
        self.forward.perform(world, allocation)
    }

    fn is_finished(&self) -> bool {
        self.forward.is_finished() && (!self.record || self.inverse.is_some())
    }

    // The inverse already describes the world before the first write.
    fn reset(&mut self) {
        self.forward.reset();
    }

    fn remaining(&self) -> usize {
        self.forward.remaining()
    }

    fn skipped_writes(&self) -> usize {
        self.forward.skipped_writes()
    }

    fn capture_inverse(&self, world: &dyn VoxelWorld) -> Result<Box<dyn ChangeQueue>, EditError> {
        self.forward.capture_inverse(world)
    }
}

/// Outbound channel to whoever drives an owner; only used for undo/redo
/// reports.
pub trait Messenger {
    fn send(&self, message: &str);
}

/// Messenger that writes to the `log` facade.
pub struct LogMessenger {
    name: String,
}

impl LogMessenger {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Messenger for LogMessenger {
    fn send(&self, message: &str) {
        log::info!(target: "owner", "[{}] {}", self.name, message);
    }
}

/// Editing session: undo history plus a FIFO of edits still being applied.
///
/// Only the head of the pending FIFO is ever handed out, and it is only
/// removed once finished, so two edits from one owner never interleave.
/// Submitted edits enter history when they leave the FIFO.
pub struct ChangeQueueOwner<K> {
    key: K,
    history: UndoQueue,
    pending: VecDeque<PendingChange>,
    messenger: Box<dyn Messenger>,
}

impl<K> fmt::Debug for ChangeQueueOwner<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeQueueOwner")
            .field("key", &self.key)
            .field("undo", &self.history.undo_len())
            .field("redo", &self.history.redo_len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<K> ChangeQueueOwner<K>
where
    K: Clone + Eq + Hash + fmt::Debug,
{
    pub fn new(key: K, history_capacity: usize, messenger: Box<dyn Messenger>) -> Self {
        Self::with_history(key, UndoQueue::new(history_capacity), messenger)
    }

    pub fn with_history(key: K, history: UndoQueue, messenger: Box<dyn Messenger>) -> Self {
        Self {
            key,
            history,
            pending: VecDeque::new(),
            messenger,
        }
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn history(&self) -> &UndoQueue {
        &self.history
    }

    /// Undoes up to `n` changes and reports the actual count. Refused with a
    /// count of 0 while edits are pending.
    pub fn undo(&mut self, world: &mut dyn VoxelWorld, n: usize) -> usize {
        if self.refuse_while_pending("undo") {
            return 0;
        }
        let done = self.history.undo_history(world, n);
        self.messenger.send(&format!("Undid {} of {} requested change(s)", done, n));
        done
    }

    pub fn redo(&mut self, world: &mut dyn VoxelWorld, n: usize) -> usize {
        if self.refuse_while_pending("redo") {
            return 0;
        }
        let done = self.history.redo_history(world, n);
        self.messenger.send(&format!("Redid {} of {} requested change(s)", done, n));
        done
    }

    fn refuse_while_pending(&self, what: &str) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        log::warn!(
            "owner {:?}: {} refused, {} edit(s) still pending",
            self.key,
            what,
            self.pending.len()
        );
        self.messenger.send(&format!(
            "Cannot {} while {} change(s) are still being applied",
            what,
            self.pending.len()
        ));
        true
    }

    /// Queues `queue` behind any edit still running, without recording it in
    /// history. The queue is rewound first.
    pub fn add_pending(&mut self, queue: Box<dyn ChangeQueue>) {
        self.pending.push_back(PendingChange::new(queue, false));
    }

    #[inline]
    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn next_pending_change(&mut self) -> Option<&mut (dyn ChangeQueue + 'static)> {
        self.pending
            .front_mut()
            .map(|q| q as &mut (dyn ChangeQueue + 'static))
    }

    /// Drops the head of the FIFO if it has finished, moving its inverse into
    /// history. Returns whether it did.
    pub fn clear_next_pending(&mut self) -> bool {
        if !self.pending.front().is_some_and(|q| q.is_finished()) {
            return false;
        }
        if let Some(inverse) = self.pending.pop_front().and_then(|q| q.inverse) {
            self.history.add_history(inverse);
        }
        true
    }

    /// Queues `forward` as pending. Its inverse is read from the world just
    /// before its first write and recorded in history once it finishes.
    pub fn submit(&mut self, forward: Box<dyn ChangeQueue>) {
        log::debug!(
            "owner {:?}: queued {} voxel edit at {}",
            self.key,
            forward.remaining(),
            forward.origin()
        );
        self.pending.push_back(PendingChange::new(forward, true));
    }

    /// [`submit`](Self::submit) for a material shape anchored at `location`.
    pub fn submit_shape(&mut self, shape: MaterialShape, location: Location) {
        self.submit(Box::new(MaterialShapeChangeQueue::new(shape, location)));
    }

    /// Parks the history in `handler`. Unfinished pending edits are dropped;
    /// whatever they already wrote stays in the world, and an edit that has
    /// started writing keeps its undo entry.
    pub fn disconnect(mut self, handler: &mut OfflineUndoHandler<K>) {
        let unfinished = self.pending.iter().filter(|q| !q.is_finished()).count();
        for q in self.pending.drain(..) {
            if let Some(inverse) = q.inverse {
                self.history.add_history(inverse);
            }
        }
        if unfinished > 0 {
            log::warn!(
                "owner {:?} disconnected with {} unfinished edit(s)",
                self.key,
                unfinished
            );
        }
        handler.register(self.key, self.history);
    }

    /// Rebuilds an owner, reclaiming parked history if there is any.
    pub fn reconnect(
        key: K,
        handler: &mut OfflineUndoHandler<K>,
        history_capacity: usize,
        messenger: Box<dyn Messenger>,
    ) -> Self {
        let history = handler
            .invalidate(&key)
            .unwrap_or_else(|| UndoQueue::new(history_capacity));
        Self::with_history(key, history, messenger)
    }
}
