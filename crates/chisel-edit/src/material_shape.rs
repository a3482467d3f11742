//! Per-voxel materials over a shape's box, dictionary encoded.
//!
//! Memory grows with the box (one byte per cell, two once more than 255
//! distinct overrides exist) plus one dictionary entry per distinct material,
//! never with one full material handle per cell.

use chisel_blocks::Block;
use chisel_geom::Vector3i;
use chisel_shape::Shape;

use super::dictionary::MaterialDictionary;
use super::world::VoxelWorld;
use super::{EditError, Location};

#[derive(Clone, Debug)]
pub struct MaterialShape {
    shape: Shape,
    default_material: Block,
    dictionary: MaterialDictionary,
    lower: Vec<u8>,
    upper: Option<Vec<u8>>,
}

impl MaterialShape {
    pub fn new(shape: Shape, default_material: Block) -> Self {
        let len = shape.box_len();
        Self {
            shape,
            default_material,
            dictionary: MaterialDictionary::new(),
            lower: vec![0; len],
            upper: None,
        }
    }

    /// Snapshot of what the world holds under `shape` placed at `location`.
    /// Cells that match `default_material` stay unencoded.
    pub fn capture(
        shape: Shape,
        world: &dyn VoxelWorld,
        location: Location,
        default_material: Block,
    ) -> Result<Self, EditError> {
        let mut out = Self::new(shape, default_material);
        let base = location.pos + out.shape.origin();
        for idx in 0..out.lower.len() {
            let p = out.shape.position_of(idx);
            if !out.shape.contains_local(p) {
                continue;
            }
            let w = base + p;
            let block = world.block_at(location.world, w.x, w.y, w.z)?;
            out.set_local(p, block)?;
        }
        log::debug!(
            "captured {} voxels at {} ({} distinct materials)",
            out.shape.volume(),
            location,
            out.dictionary.len()
        );
        Ok(out)
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn default_material(&self) -> Block {
        self.default_material
    }

    #[inline]
    pub fn dictionary(&self) -> &MaterialDictionary {
        &self.dictionary
    }

    #[inline]
    fn to_local(&self, x: i32, y: i32, z: i32, relative: bool) -> Option<Vector3i> {
        let p = Vector3i::new(x, y, z);
        if relative { p.checked_sub(self.shape.origin()) } else { Some(p) }
    }

    pub fn get_material(&self, x: i32, y: i32, z: i32, relative: bool) -> Option<Block> {
        let p = self.to_local(x, y, z, relative)?;
        if !self.shape.contains_local(p) {
            return None;
        }
        self.shape.index_of(p).map(|i| self.material_at_index(i))
    }

    /// Material stored at a linear box index, ignoring coverage.
    #[inline]
    pub fn material_at_index(&self, idx: usize) -> Block {
        let hi = self.upper.as_ref().map_or(0, |u| u[idx]);
        let id = (hi as u16) << 8 | self.lower[idx] as u16;
        if id == 0 {
            return self.default_material;
        }
        self.dictionary.get(id).unwrap_or(self.default_material)
    }

    pub fn set_material(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        relative: bool,
        material: Block,
    ) -> Result<(), EditError> {
        let p = self
            .to_local(x, y, z, relative)
            .ok_or(EditError::OutOfBounds {
                pos: Vector3i::new(x, y, z),
                size: self.shape.size(),
            })?;
        self.set_local(p, material)
    }

    fn set_local(&mut self, p: Vector3i, material: Block) -> Result<(), EditError> {
        let idx = self.shape.index_of(p).ok_or(EditError::OutOfBounds {
            pos: p,
            size: self.shape.size(),
        })?;
        let id = if material == self.default_material {
            0
        } else {
            self.dictionary.get_or_insert(material)?
        };
        self.lower[idx] = (id & 0xff) as u8;
        let hi = (id >> 8) as u8;
        match self.upper.as_mut() {
            Some(upper) => upper[idx] = hi,
            None if hi != 0 => {
                log::debug!(
                    "material shape promoted to two-byte ids ({} materials)",
                    self.dictionary.len()
                );
                let mut upper = vec![0; self.lower.len()];
                upper[idx] = hi;
                self.upper = Some(upper);
            }
            None => {}
        }
        Ok(())
    }

    /// New default material; all overrides are cleared.
    pub fn flood(&mut self, material: Block) {
        self.default_material = material;
        self.reset();
    }

    /// Clears all overrides. Dictionary ids stay assigned.
    pub fn reset(&mut self) {
        self.lower.iter_mut().for_each(|b| *b = 0);
        self.upper = None;
    }

    #[inline]
    pub fn has_extra_data(&self) -> bool {
        self.upper.is_some()
    }

    /// Low byte of every cell's id, in linear box order.
    #[inline]
    pub fn lower_material_data(&self) -> &[u8] {
        &self.lower
    }

    /// High byte plane; empty unless [`has_extra_data`](Self::has_extra_data).
    #[inline]
    pub fn upper_material_data(&self) -> &[u8] {
        self.upper.as_deref().unwrap_or(&[])
    }

    #[inline]
    pub fn max_material_id(&self) -> u16 {
        self.dictionary.max_id()
    }

    /// Covered cells with their materials, in linear box order.
    pub fn materials(&self) -> impl Iterator<Item = (Vector3i, Block)> + '_ {
        self.shape.covered().map(|p| {
            let idx = chisel_geom::linear_index(self.shape.size(), p);
            (p, self.material_at_index(idx))
        })
    }
}
