//! Cooperative tick scheduler over change queue owners.

use std::fmt;
use std::hash::Hash;

use chisel_edit::{ChangeQueueOwner, VoxelWorld};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Voxels visited this tick across all owners.
    pub applied: usize,
    /// Queues that finished and were removed this tick.
    pub finished: usize,
    /// Owners that had pending work at the start of the tick.
    pub active: usize,
}

/// Splits a fixed per-tick voxel budget between owners with pending work.
/// Each owner spends its share on the head of its FIFO, moving on to the next
/// queue when the head finishes.
pub struct TickDriver {
    budget: usize,
    ticks: u64,
}

impl TickDriver {
    pub fn new(budget: usize) -> Self {
        Self {
            budget: budget.max(1),
            ticks: 0,
        }
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick<K>(
        &mut self,
        world: &mut dyn VoxelWorld,
        owners: &mut [ChangeQueueOwner<K>],
    ) -> TickReport
    where
        K: Clone + Eq + Hash + fmt::Debug,
    {
        self.ticks += 1;
        let active = owners.iter().filter(|o| o.has_pending_changes()).count();
        let mut report = TickReport {
            active,
            ..Default::default()
        };
        if active == 0 {
            return report;
        }
        let share = self.budget / active;
        let mut extra = self.budget % active;
        for owner in owners.iter_mut().filter(|o| o.has_pending_changes()) {
            let mut left = share;
            if extra > 0 {
                left += 1;
                extra -= 1;
            }
            while left > 0 {
                let Some(q) = owner.next_pending_change() else {
                    break;
                };
                let done = q.perform(world, left);
                left -= done.min(left);
                report.applied += done;
                if !owner.clear_next_pending() {
                    break;
                }
                report.finished += 1;
            }
        }
        log::trace!(
            "tick {}: {} voxels, {} queue(s) finished, {} owner(s) active",
            self.ticks,
            report.applied,
            report.finished,
            report.active
        );
        report
    }

    /// Ticks until no owner has pending work or `max_ticks` is reached.
    /// Returns the number of ticks run.
    pub fn run_until_idle<K>(
        &mut self,
        world: &mut dyn VoxelWorld,
        owners: &mut [ChangeQueueOwner<K>],
        max_ticks: u64,
    ) -> u64
    where
        K: Clone + Eq + Hash + fmt::Debug,
    {
        let mut ran = 0;
        while ran < max_ticks && owners.iter().any(|o| o.has_pending_changes()) {
            self.tick(world, owners);
            ran += 1;
        }
        if owners.iter().any(|o| o.has_pending_changes()) {
            log::warn!("stopped after {} ticks with edits still pending", ran);
        }
        ran
    }
}
