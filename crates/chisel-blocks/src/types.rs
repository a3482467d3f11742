use serde::{Deserialize, Serialize};

/// Compact material handle. Identity is value equality; names and any
/// per-block metadata live in the [`BlockRegistry`](crate::BlockRegistry).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub state: BlockState,
}

pub type BlockId = u16;
pub type BlockState = u16;

impl Block {
    pub const AIR: Block = Block { id: 0, state: 0 };

    #[inline]
    pub const fn new(id: BlockId, state: BlockState) -> Self {
        Self { id, state }
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self.id == Self::AIR.id
    }
}
