use chisel_blocks::Block;
use chisel_edit::{EditError, Location, MaterialShape, MemoryWorld, VoxelWorld, WorldId};
use chisel_geom::Vector3i;
use chisel_shape::Shape;
use proptest::prelude::*;

fn dim() -> impl Strategy<Value = i32> {
    1i32..=6
}

fn block() -> impl Strategy<Value = Block> {
    (0u16..40, 0u16..3).prop_map(|(id, state)| Block::new(id, state))
}

fn edits() -> impl Strategy<Value = (i32, i32, i32, Vec<(i32, i32, i32, Block)>)> {
    (dim(), dim(), dim()).prop_flat_map(|(w, h, l)| {
        let cell = (0..w, 0..h, 0..l, block()).prop_map(|(x, y, z, b)| (x, y, z, b));
        (Just(w), Just(h), Just(l), prop::collection::vec(cell, 0..40))
    })
}

proptest! {
    // last write to a cell wins; untouched cells read the default
    #[test]
    fn materials_round_trip((w, h, l, writes) in edits(), default in block()) {
        let mut ms = MaterialShape::new(Shape::cuboid(w, h, l).unwrap(), default);
        let mut expect = vec![default; (w * h * l) as usize];
        for &(x, y, z, b) in &writes {
            ms.set_material(x, y, z, false, b).unwrap();
            expect[((y * l + z) * w + x) as usize] = b;
        }
        for y in 0..h { for z in 0..l { for x in 0..w {
            prop_assert_eq!(ms.get_material(x, y, z, false), Some(expect[((y * l + z) * w + x) as usize]));
        }}}
        prop_assert_eq!(ms.materials().count(), (w * h * l) as usize);
    }

    // reset restores the default everywhere
    #[test]
    fn reset_restores_default((w, h, l, writes) in edits(), default in block()) {
        let mut ms = MaterialShape::new(Shape::cuboid(w, h, l).unwrap(), default);
        for &(x, y, z, b) in &writes {
            ms.set_material(x, y, z, false, b).unwrap();
        }
        ms.reset();
        prop_assert!(ms.materials().all(|(_, b)| b == default));
        prop_assert!(!ms.has_extra_data());
    }

    // capture reproduces what the world holds under the shape
    #[test]
    fn capture_matches_world((w, h, l, writes) in edits(), px in -20i32..20, pz in -20i32..20) {
        let world_id = WorldId(3);
        let mut world = MemoryWorld::new(4, 4, 4);
        for &(x, y, z, b) in &writes {
            world.set_block_at(world_id, px + x, y, pz + z, b).unwrap();
        }
        let loc = Location::new(world_id, Vector3i::new(px, 0, pz));
        let ms = MaterialShape::capture(Shape::cuboid(w, h, l).unwrap(), &world, loc, Block::AIR).unwrap();
        for (p, b) in ms.materials() {
            prop_assert_eq!(world.block_at(world_id, px + p.x, p.y, pz + p.z).unwrap(), b);
        }
    }
}

#[test]
fn more_than_255_materials_use_upper_plane() {
    let mut ms = MaterialShape::new(Shape::cuboid(16, 2, 16).unwrap(), Block::AIR);
    for i in 0..256u16 {
        let x = (i % 16) as i32;
        let z = (i / 16) as i32;
        ms.set_material(x, 0, z, false, Block::new(i + 1, 0)).unwrap();
    }
    assert!(ms.has_extra_data());
    assert_eq!(ms.max_material_id(), 256);
    assert_eq!(ms.upper_material_data().len(), ms.lower_material_data().len());
    assert!(ms.upper_material_data().iter().any(|&b| b != 0));
    for i in 0..256u16 {
        let x = (i % 16) as i32;
        let z = (i / 16) as i32;
        assert_eq!(ms.get_material(x, 0, z, false), Some(Block::new(i + 1, 0)));
    }
    assert_eq!(ms.get_material(0, 1, 0, false), Some(Block::AIR));
}

#[test]
fn writes_outside_the_box_are_rejected() {
    let mut ms = MaterialShape::new(Shape::cuboid(2, 2, 2).unwrap(), Block::AIR);
    let err = ms.set_material(2, 0, 0, false, Block::new(1, 0)).unwrap_err();
    assert!(matches!(err, EditError::OutOfBounds { .. }));
    assert_eq!(ms.get_material(-1, 0, 0, false), None);
}

#[test]
fn capture_fails_on_unavailable_region() {
    let w = WorldId(0);
    let mut world = MemoryWorld::new(4, 4, 4);
    world.unload_chunk_at(w, 0, 0, 0);
    let loc = Location::new(w, Vector3i::ZERO);
    let res = MaterialShape::capture(Shape::cuboid(2, 2, 2).unwrap(), &world, loc, Block::AIR);
    assert!(matches!(res, Err(EditError::World(_))));
}
