//! Resumable streams of single-voxel world writes.
//!
//! A queue walks its shape's box in linear index order, skipping cells the
//! shape does not cover. `perform(n)` writes at most `n` covered cells and
//! then returns; calling it again picks up where the last call stopped.
//! Lifecycle: created, running after the first `perform`, finished once the
//! last covered cell has been visited. `reset` rewinds to created.

mod combined;
mod fill;
mod material;

use core::fmt;

use super::world::{VoxelWorld, WorldError};
use super::{EditError, Location};

pub use combined::CombinedChangeQueue;
pub use fill::ShapeChangeQueue;
pub use material::MaterialShapeChangeQueue;

pub trait ChangeQueue: fmt::Debug {
    fn origin(&self) -> Location;

    /// Visits up to `allocation` covered voxels and returns how many were
    /// visited. Returns 0 once finished. Writes the world rejects still count
    /// as visited and show up in [`skipped_writes`](Self::skipped_writes).
    fn perform(&mut self, world: &mut dyn VoxelWorld, allocation: usize) -> usize;

    fn is_finished(&self) -> bool;

    /// Rewinds to the first voxel so the same writes can be replayed.
    fn reset(&mut self);

    /// Covered voxels not yet visited since the last reset.
    fn remaining(&self) -> usize;

    /// Writes rejected by the world since the last reset.
    fn skipped_writes(&self) -> usize;

    /// Queue that writes back what the world currently holds over this
    /// queue's footprint.
    fn capture_inverse(&self, world: &dyn VoxelWorld) -> Result<Box<dyn ChangeQueue>, EditError>;

    /// Runs to completion in one call.
    fn flush(&mut self, world: &mut dyn VoxelWorld) -> usize {
        let mut total = 0;
        while !self.is_finished() {
            let done = self.perform(world, self.remaining().max(1));
            if done == 0 {
                break;
            }
            total += done;
        }
        total
    }
}

/// Position in a linear box walk. `total` is the number of covered cells, so
/// the walk is finished as soon as that many have been visited and trailing
/// uncovered cells never cost an extra call.
#[derive(Clone, Debug)]
pub(crate) struct Cursor {
    pos: usize,
    len: usize,
    total: usize,
    visited: usize,
    skipped: usize,
    finished: bool,
}

impl Cursor {
    pub(crate) fn new(len: usize, total: usize) -> Self {
        Self {
            pos: 0,
            len,
            total,
            visited: 0,
            skipped: 0,
            finished: total == 0,
        }
    }

    pub(crate) fn run(
        &mut self,
        allocation: usize,
        mut covered: impl FnMut(usize) -> bool,
        mut write: impl FnMut(usize) -> Result<(), WorldError>,
    ) -> usize {
        if self.finished {
            return 0;
        }
        let mut applied = 0;
        let mut failed = 0;
        let mut first_err = None;
        while applied < allocation && self.pos < self.len {
            let idx = self.pos;
            self.pos += 1;
            if !covered(idx) {
                continue;
            }
            if let Err(e) = write(idx) {
                failed += 1;
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
            applied += 1;
        }
        self.visited += applied;
        self.skipped += failed;
        if self.visited >= self.total || self.pos >= self.len {
            self.pos = self.len;
            self.finished = true;
        }
        if let Some(e) = first_err {
            log::warn!("skipped {} of {} voxel writes: {}", failed, applied, e);
        }
        applied
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.len, self.total);
    }

    #[inline]
    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.total - self.visited
    }

    #[inline]
    pub(crate) fn skipped(&self) -> usize {
        self.skipped
    }
}
