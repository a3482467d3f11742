use super::ChangeQueue;
use crate::world::VoxelWorld;
use crate::{EditError, Location};

/// Drains a list of queues in order, as one queue. A multi-stroke edit can
/// be queued and recorded in history as a single change.
#[derive(Debug)]
pub struct CombinedChangeQueue {
    origin: Location,
    queues: Vec<Box<dyn ChangeQueue>>,
    current: usize,
}

impl CombinedChangeQueue {
    pub fn new(origin: Location, queues: Vec<Box<dyn ChangeQueue>>) -> Self {
        let mut out = Self {
            origin,
            queues,
            current: 0,
        };
        out.skip_finished();
        out
    }

    fn skip_finished(&mut self) {
        while self
            .queues
            .get(self.current)
            .is_some_and(|q| q.is_finished())
        {
            self.current += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }
}

impl ChangeQueue for CombinedChangeQueue {
    fn origin(&self) -> Location {
        self.origin
    }

    fn perform(&mut self, world: &mut dyn VoxelWorld, allocation: usize) -> usize {
        let mut applied = 0;
        while applied < allocation && self.current < self.queues.len() {
            let q = &mut self.queues[self.current];
            let done = q.perform(world, allocation - applied);
            applied += done;
            if !q.is_finished() {
                break;
            }
            self.skip_finished();
        }
        applied
    }

    fn is_finished(&self) -> bool {
        self.current >= self.queues.len()
    }

    fn reset(&mut self) {
        self.queues.iter_mut().for_each(|q| q.reset());
        self.current = 0;
        self.skip_finished();
    }

    fn remaining(&self) -> usize {
        self.queues[self.current.min(self.queues.len())..]
            .iter()
            .map(|q| q.remaining())
            .sum()
    }

    fn skipped_writes(&self) -> usize {
        self.queues.iter().map(|q| q.skipped_writes()).sum()
    }

    /// Inverses are captured against the same world state and stored in
    /// reverse order, so overlapping parts restore to that state.
    fn capture_inverse(&self, world: &dyn VoxelWorld) -> Result<Box<dyn ChangeQueue>, EditError> {
        let inverses = self
            .queues
            .iter()
            .rev()
            .map(|q| q.capture_inverse(world))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Box::new(CombinedChangeQueue::new(self.origin, inverses)))
    }
}
