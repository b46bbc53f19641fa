use crate::editing::Document;
use crate::models::{Block, BlockId};

/// Host capability for moving the native caret
///
/// The engine never touches host selection state itself; it only asks for
/// the caret to be put at the end of a block's content.
pub trait CaretPlacer {
    fn place_caret_at_end(&mut self, block: &Block);
}

/// Headless hosts have no caret to move
impl CaretPlacer for () {
    fn place_caret_at_end(&mut self, _block: &Block) {}
}

/// Tracks which block is focused
///
/// Blur never clears the focused id. It stays set so menu and control logic
/// can still refer to the block that was last edited, until the host clears
/// it explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusController {
    focused: Option<BlockId>,
}

impl FocusController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<BlockId> {
        self.focused
    }

    pub fn is_focused(&self, id: BlockId) -> bool {
        self.focused == Some(id)
    }

    /// Host-reported focus change; no caret request is made
    ///
    /// Ids that are not in `doc` are ignored so the focused id always names a
    /// live block.
    pub fn set_focused(&mut self, doc: &Document, id: Option<BlockId>) {
        match id {
            Some(id) if !doc.contains(id) => {
                log::trace!("ignored focus on unknown block {id}");
            }
            _ => self.focused = id,
        }
    }

    pub fn clear(&mut self) {
        self.focused = None;
    }

    /// Focus change caused by an engine operation
    ///
    /// Moves focus to `id` and asks the host to put the caret at the end of
    /// its content.
    pub fn refocus(&mut self, doc: &Document, id: BlockId, caret: &mut impl CaretPlacer) {
        let Some(block) = doc.get(id) else {
            return;
        };
        self.focused = Some(id);
        caret.place_caret_at_end(block);
        log::debug!("focus moved to {id}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Cmd;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder(Vec<(BlockId, usize)>);

    impl CaretPlacer for Recorder {
        fn place_caret_at_end(&mut self, block: &Block) {
            self.0.push((block.id, block.content.len()));
        }
    }

    #[test]
    fn test_set_focused_accepts_known_and_none() {
        let doc = Document::new();
        let id = doc.blocks()[0].id;
        let mut focus = FocusController::new();

        focus.set_focused(&doc, Some(id));
        assert!(focus.is_focused(id));

        focus.set_focused(&doc, None);
        assert_eq!(focus.focused(), None);
    }

    #[test]
    fn test_set_focused_ignores_unknown_id() {
        let doc = Document::new();
        let id = doc.blocks()[0].id;
        let mut focus = FocusController::new();
        focus.set_focused(&doc, Some(id));

        focus.set_focused(&doc, Some(BlockId::new()));

        assert_eq!(focus.focused(), Some(id));
    }

    #[test]
    fn test_refocus_requests_caret_at_content_end() {
        let mut doc = Document::new();
        let id = doc.blocks()[0].id;
        doc.apply(Cmd::UpdateContent {
            id,
            text: "hello".to_string(),
        });
        let mut focus = FocusController::new();
        let mut caret = Recorder::default();

        focus.refocus(&doc, id, &mut caret);

        assert_eq!(focus.focused(), Some(id));
        assert_eq!(caret.0, vec![(id, 5)]);
    }

    #[test]
    fn test_refocus_on_missing_block_does_nothing() {
        let doc = Document::new();
        let mut focus = FocusController::new();
        let mut caret = Recorder::default();

        focus.refocus(&doc, BlockId::new(), &mut caret);

        assert_eq!(focus.focused(), None);
        assert!(caret.0.is_empty());
    }
}
