use std::collections::HashSet;

use crate::editing::{Cmd, Effect, Patch};
use crate::models::{Block, BlockId, BlockType};

/// Ordered block list: the single source of truth for document content
///
/// Order is positional, so insertion order is rendering order. The list is
/// never empty: construction mounts a default paragraph and deleting the last
/// remaining block is rejected.
///
/// ## Usage Pattern
///
/// ```rust
/// # use blockpad_engine::editing::{Cmd, Document};
/// # use blockpad_engine::models::BlockType;
/// let mut doc = Document::new();
/// let first = doc.blocks()[0].id;
///
/// let patch = doc.apply(Cmd::AddBlock { kind: BlockType::Todo, after: Some(first) });
/// let todo = patch.inserted().unwrap();
///
/// doc.apply(Cmd::Indent { id: todo });
/// assert_eq!(doc.get(todo).unwrap().indent, 1);
/// assert_eq!(doc.version(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) blocks: Vec<Block>,
    /// Incremented on every command that changes the list
    pub(crate) version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Mount a document holding one empty paragraph
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::new(BlockType::Paragraph)],
            version: 0,
        }
    }

    /// Mount a document from previously stored blocks
    ///
    /// An empty input mounts a single empty paragraph. Repeated ids get fresh
    /// ones so every id in the document is unique.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            return Self::new();
        }

        let mut seen = HashSet::with_capacity(blocks.len());
        let blocks = blocks
            .into_iter()
            .map(|mut block| {
                if !seen.insert(block.id) {
                    let fresh = BlockId::new();
                    log::debug!("duplicate block id {} replaced with {fresh}", block.id);
                    block.id = fresh;
                    seen.insert(fresh);
                }
                block
            })
            .collect();

        Self { blocks, version: 0 }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false once mounted; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.position(id).is_some()
    }

    pub fn first(&self) -> Option<&Block> {
        self.blocks.first()
    }

    pub fn last(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Apply command to document
    ///
    /// Commands addressing an unknown id are ignored rather than reported:
    /// events delivered after a deletion routinely carry stale ids.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let target = cmd.target();
        let effect = match cmd {
            Cmd::AddBlock { kind, after } => self.insert_block(kind, after),
            Cmd::DeleteBlock { id } => self.remove_block(id),
            Cmd::UpdateContent { id, text } => self.edit_block(id, |block| block.content = text),
            Cmd::UpdateType { id, kind } => self.edit_block(id, |block| {
                if kind == BlockType::Divider {
                    block.content.clear();
                }
                block.kind = kind;
            }),
            Cmd::MoveUp { id } => self.swap_with(id, Direction::Up),
            Cmd::MoveDown { id } => self.swap_with(id, Direction::Down),
            Cmd::Indent { id } => {
                self.edit_block(id, |block| block.indent = block.indent.saturating_add(1))
            }
            Cmd::Outdent { id } => self.outdent_block(id),
        };

        if effect.is_change() {
            self.version += 1;
            log::debug!("applied {effect:?} at version {}", self.version);
        } else if let Some(id) = target
            && !self.contains(id)
        {
            log::trace!("ignored command for unknown block {id}");
        }

        Patch {
            effect,
            version: self.version,
        }
    }

    fn insert_block(&mut self, kind: BlockType, after: Option<BlockId>) -> Effect {
        let (index, indent) = match after {
            Some(after) => match self.position(after) {
                Some(pos) => (pos + 1, self.blocks[pos].indent),
                None => return Effect::Unchanged,
            },
            None => (self.blocks.len(), 0),
        };

        let block = Block::new(kind).with_indent(indent);
        let id = block.id;
        self.blocks.insert(index, block);
        Effect::Inserted(id)
    }

    fn remove_block(&mut self, id: BlockId) -> Effect {
        let Some(pos) = self.position(id) else {
            return Effect::Unchanged;
        };
        if self.blocks.len() == 1 {
            return Effect::KeptSole(id);
        }

        self.blocks.remove(pos);
        // Previous block takes over, unless the first block went away
        let neighbor = self.blocks[pos.saturating_sub(1)].id;
        Effect::Removed { id, neighbor }
    }

    fn edit_block(&mut self, id: BlockId, edit: impl FnOnce(&mut Block)) -> Effect {
        match self.blocks.iter_mut().find(|block| block.id == id) {
            Some(block) => {
                edit(block);
                Effect::Updated(id)
            }
            None => Effect::Unchanged,
        }
    }

    fn outdent_block(&mut self, id: BlockId) -> Effect {
        match self.blocks.iter_mut().find(|block| block.id == id) {
            Some(block) if block.indent > 0 => {
                block.indent -= 1;
                Effect::Updated(id)
            }
            _ => Effect::Unchanged,
        }
    }

    fn swap_with(&mut self, id: BlockId, direction: Direction) -> Effect {
        let Some(pos) = self.position(id) else {
            return Effect::Unchanged;
        };
        let other = match direction {
            Direction::Up if pos > 0 => pos - 1,
            Direction::Down if pos + 1 < self.blocks.len() => pos + 1,
            _ => return Effect::Unchanged,
        };

        // Indent stays with the block; neighbours are not renormalised
        self.blocks.swap(pos, other);
        Effect::Moved(id)
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Up,
    Down,
}
