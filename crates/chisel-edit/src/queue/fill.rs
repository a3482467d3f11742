use chisel_blocks::Block;
use chisel_shape::Shape;

use super::{ChangeQueue, Cursor, MaterialShapeChangeQueue};
use crate::world::VoxelWorld;
use crate::{EditError, Location};

/// Writes one material over every covered voxel of a shape. Needs no
/// per-voxel buffer, so large fills and clears stay at the size of the shape.
#[derive(Clone, Debug)]
pub struct ShapeChangeQueue {
    origin: Location,
    shape: Shape,
    material: Block,
    cursor: Cursor,
}

impl ShapeChangeQueue {
    pub fn new(shape: Shape, material: Block, origin: Location) -> Self {
        let cursor = Cursor::new(shape.box_len(), shape.volume() as usize);
        Self {
            origin,
            shape,
            material,
            cursor,
        }
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn material(&self) -> Block {
        self.material
    }
}

impl ChangeQueue for ShapeChangeQueue {
    fn origin(&self) -> Location {
        self.origin
    }

    fn perform(&mut self, world: &mut dyn VoxelWorld, allocation: usize) -> usize {
        let Self {
            origin,
            shape,
            material,
            cursor,
        } = self;
        let base = origin.pos + shape.origin();
        cursor.run(
            allocation,
            |idx| shape.contains_local(shape.position_of(idx)),
            |idx| {
                let w = base + shape.position_of(idx);
                world.set_block_at(origin.world, w.x, w.y, w.z, *material)
            },
        )
    }

    fn is_finished(&self) -> bool {
        self.cursor.is_finished()
    }

    fn reset(&mut self) {
        self.cursor.reset();
    }

    fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    fn skipped_writes(&self) -> usize {
        self.cursor.skipped()
    }

    fn capture_inverse(&self, world: &dyn VoxelWorld) -> Result<Box<dyn ChangeQueue>, EditError> {
        // Whatever the fill overwrote is most likely air, so that stays unencoded.
        let inverse =
            MaterialShapeChangeQueue::capture(self.shape.clone(), world, self.origin, Block::AIR)?;
        Ok(Box::new(inverse))
    }
}
