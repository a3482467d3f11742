use chisel_blocks::Block;
use hashbrown::HashMap;

use super::EditError;

/// Largest id a dictionary hands out. Ids are stored as a low byte plus an
/// optional high byte, so this is the ceiling of the two-byte encoding.
pub const MAX_MATERIAL_ID: u16 = u16::MAX;

/// Append-only mapping between override materials and small ids.
///
/// Id 0 is reserved for "use the default material"; the first distinct
/// material gets id 1. Ids are never reassigned.
#[derive(Clone, Debug, Default)]
pub struct MaterialDictionary {
    entries: Vec<Block>,
    ids: HashMap<Block, u16>,
}

impl MaterialDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn id_of(&self, block: Block) -> Option<u16> {
        self.ids.get(&block).copied()
    }

    /// Existing id for `block`, or the next free one.
    pub fn get_or_insert(&mut self, block: Block) -> Result<u16, EditError> {
        if let Some(id) = self.id_of(block) {
            return Ok(id);
        }
        if self.entries.len() >= MAX_MATERIAL_ID as usize {
            log::warn!(
                "material dictionary full; refusing new material {:?}",
                block
            );
            return Err(EditError::DictionaryFull);
        }
        self.entries.push(block);
        let id = self.entries.len() as u16;
        self.ids.insert(block, id);
        Ok(id)
    }

    /// Material for a nonzero id.
    #[inline]
    pub fn get(&self, id: u16) -> Option<Block> {
        id.checked_sub(1)
            .and_then(|i| self.entries.get(i as usize).copied())
    }

    /// Largest id handed out so far, 0 when empty.
    #[inline]
    pub fn max_id(&self) -> u16 {
        self.entries.len() as u16
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Materials in id order, starting at id 1.
    pub fn materials(&self) -> &[Block] {
        &self.entries
    }
}
