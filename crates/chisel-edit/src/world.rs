//! World access seam and a chunked in-memory store.

use chisel_blocks::Block;
use hashbrown::{HashMap, HashSet};
use thiserror::Error;

use super::WorldId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("region around ({x}, {y}, {z}) in {world} is not available")]
    RegionUnavailable { world: WorldId, x: i32, y: i32, z: i32 },
}

/// Single-voxel reads and writes against persistent world storage.
pub trait VoxelWorld {
    fn block_at(&self, world: WorldId, x: i32, y: i32, z: i32) -> Result<Block, WorldError>;

    fn set_block_at(
        &mut self,
        world: WorldId,
        x: i32,
        y: i32,
        z: i32,
        block: Block,
    ) -> Result<(), WorldError>;
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryWorldStats {
    pub chunk_entries: usize,
    pub stored_blocks: usize,
    pub unavailable_chunks: usize,
    pub writes: u64,
}

type ChunkKey = (WorldId, (i32, i32, i32));

/// Sparse chunk-partitioned store. Positions never written read as air;
/// writing air drops the entry again. Chunks can be marked unavailable to
/// model storage that is not loaded.
pub struct MemoryWorld {
    sx: i32,
    sy: i32,
    sz: i32,
    inner: HashMap<ChunkKey, HashMap<(i32, i32, i32), Block>>,
    unavailable: HashSet<ChunkKey>,
    writes: u64,
}

impl MemoryWorld {
    pub fn new(sx: i32, sy: i32, sz: i32) -> Self {
        assert!(sx > 0 && sy > 0 && sz > 0, "chunk size must be positive");
        Self {
            sx,
            sy,
            sz,
            inner: HashMap::new(),
            unavailable: HashSet::new(),
            writes: 0,
        }
    }

    pub fn stats(&self) -> MemoryWorldStats {
        MemoryWorldStats {
            chunk_entries: self.inner.len(),
            stored_blocks: self.inner.values().map(|m| m.len()).sum(),
            unavailable_chunks: self.unavailable.len(),
            writes: self.writes,
        }
    }

    #[inline]
    fn chunk_key(&self, world: WorldId, wx: i32, wy: i32, wz: i32) -> ChunkKey {
        (
            world,
            (
                wx.div_euclid(self.sx),
                wy.div_euclid(self.sy),
                wz.div_euclid(self.sz),
            ),
        )
    }

    /// Makes the chunk containing the position reject reads and writes.
    pub fn unload_chunk_at(&mut self, world: WorldId, wx: i32, wy: i32, wz: i32) {
        let k = self.chunk_key(world, wx, wy, wz);
        self.unavailable.insert(k);
    }

    pub fn load_chunk_at(&mut self, world: WorldId, wx: i32, wy: i32, wz: i32) {
        let k = self.chunk_key(world, wx, wy, wz);
        self.unavailable.remove(&k);
    }

    fn check(&self, k: &ChunkKey, wx: i32, wy: i32, wz: i32) -> Result<(), WorldError> {
        if self.unavailable.contains(k) {
            return Err(WorldError::RegionUnavailable {
                world: k.0,
                x: wx,
                y: wy,
                z: wz,
            });
        }
        Ok(())
    }

    /// Every stored non-air block of `world`, sorted by position.
    pub fn snapshot(&self, world: WorldId) -> Vec<((i32, i32, i32), Block)> {
        let mut out: Vec<_> = self
            .inner
            .iter()
            .filter(|(k, _)| k.0 == world)
            .flat_map(|(_, m)| m.iter().map(|(p, b)| (*p, *b)))
            .collect();
        out.sort_unstable_by_key(|(p, _)| *p);
        out
    }
}

impl VoxelWorld for MemoryWorld {
    fn block_at(&self, world: WorldId, x: i32, y: i32, z: i32) -> Result<Block, WorldError> {
        let k = self.chunk_key(world, x, y, z);
        self.check(&k, x, y, z)?;
        Ok(self
            .inner
            .get(&k)
            .and_then(|m| m.get(&(x, y, z)).copied())
            .unwrap_or(Block::AIR))
    }

    fn set_block_at(
        &mut self,
        world: WorldId,
        x: i32,
        y: i32,
        z: i32,
        block: Block,
    ) -> Result<(), WorldError> {
        let k = self.chunk_key(world, x, y, z);
        self.check(&k, x, y, z)?;
        if block == Block::AIR {
            if let Some(m) = self.inner.get_mut(&k) {
                m.remove(&(x, y, z));
                if m.is_empty() {
                    self.inner.remove(&k);
                }
            }
        } else {
            self.inner.entry(k).or_default().insert((x, y, z), block);
        }
        self.writes += 1;
        Ok(())
    }
}
