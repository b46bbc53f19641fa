use crate::models::{BlockId, BlockType};

/// Commands that can be applied to the document
///
/// Every command is total: a command naming an id that is no longer in the
/// document compiles to [`Effect::Unchanged`](crate::editing::Effect).
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Insert an empty block after `after`, or append when `after` is `None`
    AddBlock {
        kind: BlockType,
        after: Option<BlockId>,
    },
    DeleteBlock {
        id: BlockId,
    },
    UpdateContent {
        id: BlockId,
        text: String,
    },
    UpdateType {
        id: BlockId,
        kind: BlockType,
    },
    MoveUp {
        id: BlockId,
    },
    MoveDown {
        id: BlockId,
    },
    Indent {
        id: BlockId,
    },
    Outdent {
        id: BlockId,
    },
}

impl Cmd {
    /// The block this command addresses, if any
    pub fn target(&self) -> Option<BlockId> {
        match self {
            Cmd::AddBlock { after, .. } => *after,
            Cmd::DeleteBlock { id }
            | Cmd::UpdateContent { id, .. }
            | Cmd::UpdateType { id, .. }
            | Cmd::MoveUp { id }
            | Cmd::MoveDown { id }
            | Cmd::Indent { id }
            | Cmd::Outdent { id } => Some(*id),
        }
    }
}
