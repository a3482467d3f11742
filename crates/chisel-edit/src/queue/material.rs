use chisel_blocks::Block;
use chisel_shape::Shape;

use super::{ChangeQueue, Cursor};
use crate::material_shape::MaterialShape;
use crate::world::VoxelWorld;
use crate::{EditError, Location};

/// Writes each covered voxel's own material from a [`MaterialShape`].
#[derive(Clone, Debug)]
pub struct MaterialShapeChangeQueue {
    origin: Location,
    source: MaterialShape,
    cursor: Cursor,
}

impl MaterialShapeChangeQueue {
    pub fn new(source: MaterialShape, origin: Location) -> Self {
        let shape = source.shape();
        let cursor = Cursor::new(shape.box_len(), shape.volume() as usize);
        Self {
            origin,
            source,
            cursor,
        }
    }

    /// Queue restoring whatever `world` holds under `shape` at `origin`.
    pub fn capture(
        shape: Shape,
        world: &dyn VoxelWorld,
        origin: Location,
        default_material: Block,
    ) -> Result<Self, EditError> {
        let source = MaterialShape::capture(shape, world, origin, default_material)?;
        Ok(Self::new(source, origin))
    }

    #[inline]
    pub fn source(&self) -> &MaterialShape {
        &self.source
    }

    pub fn into_source(self) -> MaterialShape {
        self.source
    }
}

impl ChangeQueue for MaterialShapeChangeQueue {
    fn origin(&self) -> Location {
        self.origin
    }

    fn perform(&mut self, world: &mut dyn VoxelWorld, allocation: usize) -> usize {
        let Self {
            origin,
            source,
            cursor,
        } = self;
        let shape = source.shape();
        let base = origin.pos + shape.origin();
        cursor.run(
            allocation,
            |idx| shape.contains_local(shape.position_of(idx)),
            |idx| {
                let w = base + shape.position_of(idx);
                world.set_block_at(origin.world, w.x, w.y, w.z, source.material_at_index(idx))
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
        let inverse = Self::capture(
            self.source.shape().clone(),
            world,
            self.origin,
            self.source.default_material(),
        )?;
        Ok(Box::new(inverse))
    }
}
