use hashbrown::HashMap;

use chisel_blocks::Block;
use chisel_edit::{
    ChangeQueue, CombinedChangeQueue, Location, MaterialShape, MaterialShapeChangeQueue,
    MemoryWorld, ShapeChangeQueue, VoxelWorld, WorldError, WorldId,
};
use chisel_geom::Vector3i;
use chisel_shape::Shape;

const W: WorldId = WorldId(1);

/// Wraps a world and counts writes per position.
struct CountingWorld {
    inner: MemoryWorld,
    writes: HashMap<(i32, i32, i32), u32>,
}

impl CountingWorld {
    fn new() -> Self {
        Self {
            inner: MemoryWorld::new(8, 8, 8),
            writes: HashMap::new(),
        }
    }
}

impl VoxelWorld for CountingWorld {
    fn block_at(&self, world: WorldId, x: i32, y: i32, z: i32) -> Result<Block, WorldError> {
        self.inner.block_at(world, x, y, z)
    }

    fn set_block_at(
        &mut self,
        world: WorldId,
        x: i32,
        y: i32,
        z: i32,
        block: Block,
    ) -> Result<(), WorldError> {
        *self.writes.entry((x, y, z)).or_insert(0) += 1;
        self.inner.set_block_at(world, x, y, z, block)
    }
}

fn stone() -> Block {
    Block::new(1, 0)
}

#[test]
fn perform_is_amortized_and_writes_each_voxel_once() {
    let mut world = CountingWorld::new();
    let loc = Location::new(W, Vector3i::new(10, 0, -3));
    let mut q = ShapeChangeQueue::new(Shape::cuboid(5, 5, 5).unwrap(), stone(), loc);
    let mut calls = Vec::new();
    while !q.is_finished() {
        calls.push(q.perform(&mut world, 10));
    }
    assert_eq!(calls.len(), 13);
    assert_eq!(calls.last(), Some(&5));
    assert_eq!(calls.iter().sum::<usize>(), 125);
    assert_eq!(world.writes.len(), 125);
    assert!(world.writes.values().all(|&n| n == 1));
    assert_eq!(q.perform(&mut world, 10), 0);
    assert_eq!(world.inner.block_at(W, 14, 4, 1).unwrap(), stone());
    assert_eq!(world.inner.block_at(W, 15, 0, 0).unwrap(), Block::AIR);
}

#[test]
fn reset_replays_the_same_writes() {
    let mut world = CountingWorld::new();
    let loc = Location::new(W, Vector3i::ZERO);
    let mut q = ShapeChangeQueue::new(Shape::cuboid(2, 2, 2).unwrap(), stone(), loc);
    assert_eq!(q.flush(&mut world), 8);
    q.reset();
    assert!(!q.is_finished());
    assert_eq!(q.remaining(), 8);
    assert_eq!(q.flush(&mut world), 8);
    assert!(world.writes.values().all(|&n| n == 2));
}

#[test]
fn uncovered_cells_are_not_written() {
    let mut world = CountingWorld::new();
    let sphere = Shape::sphere(2.0).unwrap();
    let expect = sphere.volume() as usize;
    let mut q = ShapeChangeQueue::new(sphere.clone(), stone(), Location::new(W, Vector3i::ZERO));
    assert_eq!(q.flush(&mut world), expect);
    assert_eq!(world.writes.len(), expect);
    // sphere is centred on the anchor
    assert_eq!(world.inner.block_at(W, 0, 0, 0).unwrap(), stone());
    assert_eq!(world.inner.block_at(W, 2, 2, 2).unwrap(), Block::AIR);
}

#[test]
fn material_queue_writes_each_cells_own_material() {
    let mut world = MemoryWorld::new(4, 4, 4);
    let mut ms = MaterialShape::new(Shape::cuboid(3, 1, 1).unwrap(), stone());
    ms.set_material(1, 0, 0, false, Block::new(7, 2)).unwrap();
    let mut q = MaterialShapeChangeQueue::new(ms, Location::new(W, Vector3i::new(0, 5, 0)));
    assert_eq!(q.perform(&mut world, 100), 3);
    assert!(q.is_finished());
    assert_eq!(world.block_at(W, 0, 5, 0).unwrap(), stone());
    assert_eq!(world.block_at(W, 1, 5, 0).unwrap(), Block::new(7, 2));
    assert_eq!(world.block_at(W, 2, 5, 0).unwrap(), stone());
    assert_eq!(q.into_source().get_material(1, 0, 0, false), Some(Block::new(7, 2)));
}

#[test]
fn rejected_writes_are_skipped_and_counted() {
    let mut world = MemoryWorld::new(4, 4, 4);
    world.unload_chunk_at(W, 4, 0, 0);
    let mut q = ShapeChangeQueue::new(
        Shape::cuboid(8, 1, 1).unwrap(),
        stone(),
        Location::new(W, Vector3i::ZERO),
    );
    assert_eq!(q.flush(&mut world), 8);
    assert!(q.is_finished());
    assert_eq!(q.skipped_writes(), 4);
    assert_eq!(world.block_at(W, 3, 0, 0).unwrap(), stone());
    world.load_chunk_at(W, 4, 0, 0);
    assert_eq!(world.block_at(W, 4, 0, 0).unwrap(), Block::AIR);
}

#[test]
fn empty_shape_is_finished_immediately() {
    let mut world = MemoryWorld::new(4, 4, 4);
    let mut q = ShapeChangeQueue::new(
        Shape::freeform(3, 3, 3).unwrap(),
        stone(),
        Location::new(W, Vector3i::ZERO),
    );
    assert!(q.is_finished());
    assert_eq!(q.perform(&mut world, 10), 0);
}

#[test]
fn combined_queue_drains_parts_in_order() {
    let mut world = CountingWorld::new();
    let a = ShapeChangeQueue::new(
        Shape::cuboid(2, 1, 1).unwrap(),
        stone(),
        Location::new(W, Vector3i::ZERO),
    );
    let b = ShapeChangeQueue::new(
        Shape::cuboid(3, 1, 1).unwrap(),
        Block::new(2, 0),
        Location::new(W, Vector3i::new(1, 0, 0)),
    );
    let parts: Vec<Box<dyn ChangeQueue>> = vec![Box::new(a), Box::new(b)];
    let mut q = CombinedChangeQueue::new(Location::new(W, Vector3i::ZERO), parts);
    assert_eq!(q.remaining(), 5);
    assert_eq!(q.perform(&mut world, 3), 3);
    assert!(!q.is_finished());
    assert_eq!(q.perform(&mut world, 3), 2);
    assert!(q.is_finished());
    // second part overwrote the overlap
    assert_eq!(world.inner.block_at(W, 1, 0, 0).unwrap(), Block::new(2, 0));
    assert_eq!(world.inner.block_at(W, 0, 0, 0).unwrap(), stone());
}

#[test]
fn combined_inverse_restores_overlapping_parts() {
    let mut world = MemoryWorld::new(4, 4, 4);
    world.set_block_at(W, 1, 0, 0, Block::new(9, 0)).unwrap();
    let before = world.snapshot(W);
    let parts: Vec<Box<dyn ChangeQueue>> = vec![
        Box::new(ShapeChangeQueue::new(
            Shape::cuboid(2, 1, 1).unwrap(),
            stone(),
            Location::new(W, Vector3i::ZERO),
        )),
        Box::new(ShapeChangeQueue::new(
            Shape::cuboid(2, 1, 1).unwrap(),
            Block::new(2, 0),
            Location::new(W, Vector3i::new(1, 0, 0)),
        )),
    ];
    let mut q = CombinedChangeQueue::new(Location::new(W, Vector3i::ZERO), parts);
    let mut inverse = q.capture_inverse(&world).unwrap();
    q.flush(&mut world);
    assert_ne!(world.snapshot(W), before);
    inverse.flush(&mut world);
    assert_eq!(world.snapshot(W), before);
}
