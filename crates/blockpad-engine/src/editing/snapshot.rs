use crate::editing::{CommandMenu, Document, FocusController, MenuPosition};
use crate::models::{BlockId, BlockType};

/// Immutable view of editor state for rendering
///
/// Hosts render from snapshots and never mutate blocks directly; every change
/// goes back through the [`Editor`](crate::editing::Editor) operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Document version for change detection
    pub version: u64,
    pub blocks: Vec<RenderBlock>,
    pub focused: Option<BlockId>,
    /// Present only while the command menu is open
    pub menu: Option<MenuView>,
}

/// UI-ready block
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBlock {
    pub id: BlockId,
    pub kind: BlockType,
    pub content: String,
    pub indent: usize,
    /// Item number for numbered list blocks
    pub ordinal: Option<usize>,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuView {
    pub position: MenuPosition,
    pub query: String,
    pub target: Option<BlockId>,
    pub items: Vec<MenuItem>,
    pub highlighted: Option<BlockType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub kind: BlockType,
    pub label: &'static str,
    pub description: &'static str,
}

impl From<BlockType> for MenuItem {
    fn from(kind: BlockType) -> Self {
        Self {
            kind,
            label: kind.label(),
            description: kind.description(),
        }
    }
}

pub(crate) fn create_snapshot(
    doc: &Document,
    focus: &FocusController,
    menu: &CommandMenu,
) -> Snapshot {
    let ordinals = numbered_ordinals(doc);
    let blocks = doc
        .blocks()
        .iter()
        .zip(ordinals)
        .map(|(block, ordinal)| RenderBlock {
            id: block.id,
            kind: block.kind,
            content: block.text().to_string(),
            indent: block.indent,
            ordinal,
            focused: focus.is_focused(block.id),
        })
        .collect();

    let menu = menu.is_open().then(|| MenuView {
        position: menu.position(),
        query: menu.query().to_string(),
        target: menu.target(),
        items: menu.candidates().into_iter().map(MenuItem::from).collect(),
        highlighted: menu.highlighted(),
    });

    Snapshot {
        version: doc.version(),
        blocks,
        focused: focus.focused(),
        menu,
    }
}

/// Number consecutive numbered-list blocks per indent level
///
/// Deeper blocks in between continue the run of the shallower list; any other
/// block at the same or a shallower indent restarts it.
fn numbered_ordinals(doc: &Document) -> Vec<Option<usize>> {
    // Open runs as (depth, last number), strictly increasing in depth
    let mut runs: Vec<(usize, usize)> = Vec::new();

    doc.blocks()
        .iter()
        .map(|block| {
            let depth = block.indent;
            while runs.last().is_some_and(|&(open, _)| open > depth) {
                runs.pop();
            }
            let current = runs.last_mut().filter(|(open, _)| *open == depth);
            match (block.kind, current) {
                (BlockType::NumberedList, Some((_, count))) => {
                    *count += 1;
                    Some(*count)
                }
                (BlockType::NumberedList, None) => {
                    runs.push((depth, 1));
                    Some(1)
                }
                (_, Some(_)) => {
                    runs.pop();
                    None
                }
                (_, None) => None,
            }
        })
        .collect()
}
