//! Interruptible, undoable voxel edits.
//!
//! A [`MaterialShape`] pairs a shape with dictionary-encoded materials; a
//! [`ChangeQueue`] turns one into a resumable stream of world writes; an
//! owner keeps a FIFO of in-flight queues plus an [`UndoQueue`] of inverses.
#![forbid(unsafe_code)]

pub mod dictionary;
pub mod history;
pub mod material_shape;
pub mod offline;
pub mod owner;
pub mod queue;
pub mod world;

use core::fmt;

use chisel_geom::Vector3i;
use chisel_shape::ShapeError;
use thiserror::Error;

pub use dictionary::{MAX_MATERIAL_ID, MaterialDictionary};
pub use history::UndoQueue;
pub use material_shape::MaterialShape;
pub use offline::OfflineUndoHandler;
pub use owner::{ChangeQueueOwner, LogMessenger, Messenger};
pub use queue::{ChangeQueue, CombinedChangeQueue, MaterialShapeChangeQueue, ShapeChangeQueue};
pub use world::{MemoryWorld, VoxelWorld, WorldError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldId(pub u32);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "world#{}", self.0)
    }
}

/// Anchor of a change queue. The shape's relative frame origin lands on `pos`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Location {
    pub world: WorldId,
    pub pos: Vector3i,
}

impl Location {
    #[inline]
    pub const fn new(world: WorldId, pos: Vector3i) -> Self {
        Self { world, pos }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.world, self.pos)
    }
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error("material dictionary is full ({} distinct overrides)", MAX_MATERIAL_ID)]
    DictionaryFull,
    #[error("local position {pos} is outside a material buffer of size {size}")]
    OutOfBounds { pos: Vector3i, size: Vector3i },
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    World(#[from] WorldError),
}
