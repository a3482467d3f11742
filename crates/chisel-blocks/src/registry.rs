use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{BlockDef, BlocksConfig};
use super::types::{Block, BlockId, BlockState};

pub const AIR_NAME: &str = "air";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub states: u16,
}

/// Resolves block names to handles and supplies the canonical empty block.
///
/// Id 0 is always `air`; a config that tries to assign id 0 to anything else
/// is rejected.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    blocks: HashMap<BlockId, BlockType>,
    by_name: HashMap<String, BlockId>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    /// Registry containing only `air`.
    pub fn new() -> Self {
        let mut reg = Self {
            blocks: HashMap::new(),
            by_name: HashMap::new(),
        };
        reg.insert(BlockType {
            id: Block::AIR.id,
            name: AIR_NAME.to_string(),
            states: 1,
        });
        reg
    }

    fn insert(&mut self, ty: BlockType) {
        self.by_name.insert(ty.name.clone(), ty.id);
        self.blocks.insert(ty.id, ty);
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry::new();
        let mut next_id: BlockId = 1;
        for BlockDef { name, id, states } in cfg.blocks {
            if name == AIR_NAME {
                if id.is_some_and(|id| id != Block::AIR.id) {
                    return Err(format!("`{AIR_NAME}` must keep id 0").into());
                }
                continue;
            }
            let id = match id {
                Some(0) => return Err(format!("block `{name}` cannot use id 0").into()),
                Some(id) => id,
                None => {
                    while reg.blocks.contains_key(&next_id) {
                        next_id = next_id
                            .checked_add(1)
                            .ok_or("block id space exhausted")?;
                    }
                    next_id
                }
            };
            if reg.by_name.contains_key(&name) {
                return Err(format!("duplicate block name `{name}`").into());
            }
            if let Some(prev) = reg.blocks.get(&id) {
                return Err(format!("block `{name}` reuses id {id} of `{}`", prev.name).into());
            }
            reg.insert(BlockType {
                id,
                name,
                states: states.unwrap_or(1).max(1),
            });
        }
        log::debug!("block registry loaded with {} block types", reg.len());
        Ok(reg)
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(&id)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: BlockId) -> Option<&str> {
        self.blocks.get(&id).map(|t| t.name.as_str())
    }

    /// Handle for `name` in `state`, or `None` if either is unknown.
    pub fn block(&self, name: &str, state: BlockState) -> Option<Block> {
        let id = self.id_by_name(name)?;
        let ty = self.get(id)?;
        (state < ty.states).then_some(Block::new(id, state))
    }

    #[inline]
    pub fn default_block(&self) -> Block {
        Block::AIR
    }

    pub fn is_valid(&self, block: Block) -> bool {
        self.get(block.id).is_some_and(|t| block.state < t.states)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_is_always_present() {
        let reg = BlockRegistry::new();
        assert_eq!(reg.id_by_name("air"), Some(0));
        assert_eq!(reg.default_block(), Block::AIR);
    }

    #[test]
    fn rejects_id_zero_for_other_blocks() {
        let err = BlockRegistry::from_toml_str(
            r#"
            [[blocks]]
            name = "stone"
            id = 0
        "#,
        );
        assert!(err.is_err());
    }
}
