use crate::models::BlockId;

/// What a command did to the block list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Unknown id or boundary no-op; nothing changed
    Unchanged,
    /// A new block was inserted
    Inserted(BlockId),
    /// A block was removed; `neighbor` is the block that should take focus
    Removed { id: BlockId, neighbor: BlockId },
    /// Delete was rejected because `id` is the only block left
    KeptSole(BlockId),
    /// Content, type or indent changed in place
    Updated(BlockId),
    /// Block swapped places with a neighbour
    Moved(BlockId),
}

impl Effect {
    /// Whether the block list differs from before the command
    pub fn is_change(&self) -> bool {
        !matches!(self, Effect::Unchanged | Effect::KeptSole(_))
    }
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub effect: Effect,
    pub version: u64,
}

impl Patch {
    pub fn is_change(&self) -> bool {
        self.effect.is_change()
    }

    /// Id of the block created by this command
    pub fn inserted(&self) -> Option<BlockId> {
        match self.effect {
            Effect::Inserted(id) => Some(id),
            _ => None,
        }
    }
}
