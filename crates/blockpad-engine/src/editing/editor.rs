use crate::editing::keyboard::{
    self, CaretGeometry, FocusedBlock, Intent, Key, KeyEvent, KeyOutcome,
};
use crate::editing::snapshot::{self, Snapshot};
use crate::editing::{
    CaretPlacer, Cmd, CommandMenu, Document, Effect, FocusController, MenuPosition, MenuSelection,
    Patch,
};
use crate::models::{Block, BlockId, BlockType};

/// One editing session over one document
///
/// `Editor` owns the block list, the focus state and the command menu, and
/// is the only way a host changes any of them. `C` is the host's caret
/// capability; programmatic focus changes (insert, delete) are forwarded to
/// it so the native caret lands at the end of the newly focused block.
///
/// ```rust
/// # use blockpad_engine::editing::{Editor, Key, KeyEvent};
/// # use blockpad_engine::models::BlockType;
/// let mut editor = Editor::headless();
/// let first = editor.focused_block_id().unwrap();
/// editor.update_block_content(first, "Title");
/// editor.update_block_type(first, BlockType::Heading1);
///
/// // Enter always starts a fresh paragraph after the focused block
/// editor.handle_key(&KeyEvent::plain(Key::Enter), None);
/// assert_eq!(editor.blocks().len(), 2);
/// assert_eq!(editor.focused_block().unwrap().kind, BlockType::Paragraph);
/// ```
#[derive(Debug)]
pub struct Editor<C: CaretPlacer = ()> {
    document: Document,
    focus: FocusController,
    menu: CommandMenu,
    caret: C,
}

impl Editor<()> {
    /// Editor without a caret-placing host
    pub fn headless() -> Self {
        Self::new(())
    }
}

impl<C: CaretPlacer> Editor<C> {
    /// Mount a fresh document with one focused paragraph
    pub fn new(caret: C) -> Self {
        Self::with_document(Document::new(), caret)
    }

    /// Mount an existing document, focusing its first block
    pub fn with_document(document: Document, caret: C) -> Self {
        let mut editor = Self {
            document,
            focus: FocusController::new(),
            menu: CommandMenu::new(),
            caret,
        };
        if let Some(first) = editor.document.first().map(|block| block.id) {
            editor.focus.refocus(&editor.document, first, &mut editor.caret);
        }
        editor
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn blocks(&self) -> &[Block] {
        self.document.blocks()
    }

    pub fn version(&self) -> u64 {
        self.document.version()
    }

    pub fn focused_block_id(&self) -> Option<BlockId> {
        self.focus.focused()
    }

    pub fn focused_block(&self) -> Option<&Block> {
        self.focus.focused().and_then(|id| self.document.get(id))
    }

    pub fn menu(&self) -> &CommandMenu {
        &self.menu
    }

    pub fn caret(&self) -> &C {
        &self.caret
    }

    pub fn caret_mut(&mut self) -> &mut C {
        &mut self.caret
    }

    pub fn snapshot(&self) -> Snapshot {
        snapshot::create_snapshot(&self.document, &self.focus, &self.menu)
    }

    // ============ Block operations ============

    /// Insert an empty block after `after` (or at the end) and focus it
    pub fn add_block(&mut self, kind: BlockType, after: Option<BlockId>) -> Option<BlockId> {
        self.apply(Cmd::AddBlock { kind, after }).inserted()
    }

    pub fn delete_block(&mut self, id: BlockId) {
        self.apply(Cmd::DeleteBlock { id });
    }

    pub fn update_block_content(&mut self, id: BlockId, text: impl Into<String>) {
        self.apply(Cmd::UpdateContent {
            id,
            text: text.into(),
        });
    }

    pub fn update_block_type(&mut self, id: BlockId, kind: BlockType) {
        self.apply(Cmd::UpdateType { id, kind });
    }

    pub fn move_block_up(&mut self, id: BlockId) {
        self.apply(Cmd::MoveUp { id });
    }

    pub fn move_block_down(&mut self, id: BlockId) {
        self.apply(Cmd::MoveDown { id });
    }

    pub fn indent_block(&mut self, id: BlockId) {
        self.apply(Cmd::Indent { id });
    }

    pub fn outdent_block(&mut self, id: BlockId) {
        self.apply(Cmd::Outdent { id });
    }

    /// Apply a command and carry out the focus changes it implies
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let patch = self.document.apply(cmd);
        match patch.effect {
            Effect::Inserted(id) | Effect::KeptSole(id) => {
                self.focus.refocus(&self.document, id, &mut self.caret);
            }
            Effect::Removed { id, neighbor } if self.focus.is_focused(id) => {
                self.focus.refocus(&self.document, neighbor, &mut self.caret);
            }
            Effect::Removed { .. } | Effect::Updated(_) | Effect::Moved(_) | Effect::Unchanged => {}
        }
        patch
    }

    // ============ Focus ============

    /// Host-reported focus; unknown ids are ignored
    pub fn set_focused_block_id(&mut self, id: Option<BlockId>) {
        self.focus.set_focused(&self.document, id);
    }

    /// Explicit "nothing is being edited" (e.g. a click outside all blocks)
    pub fn clear_focus(&mut self) {
        self.focus.clear();
    }

    // ============ Command menu ============

    pub fn open_menu(&mut self, position: MenuPosition, target: Option<BlockId>) {
        self.menu.open(position, target);
        log::debug!("menu opened for {target:?}");
    }

    pub fn close_menu(&mut self) {
        self.menu.close();
    }

    pub fn set_menu_query(&mut self, query: impl Into<String>) {
        self.menu.set_query(query);
    }

    /// Apply a menu choice: retype the target block, or append a new block
    ///
    /// Returns false when nothing was selected (menu closed or `kind`
    /// filtered out).
    pub fn select_type(&mut self, kind: BlockType) -> bool {
        let Some(selection) = self.menu.select(kind) else {
            return false;
        };
        match selection {
            MenuSelection::Retype { target, kind } => self.update_block_type(target, kind),
            MenuSelection::Append { kind } => {
                self.add_block(kind, None);
            }
        }
        true
    }

    // ============ Keyboard ============

    /// Dispatch a raw key event
    ///
    /// `caret` is the host's caret geometry at the time of the event; it is
    /// only consulted for `/`. While the menu is open it gets the key first.
    pub fn handle_key(&mut self, event: &KeyEvent, caret: Option<&CaretGeometry>) -> KeyOutcome {
        if self.menu.is_open() {
            return self.handle_menu_key(event);
        }

        let Some(block) = self.focused_block() else {
            return KeyOutcome::Ignored;
        };
        let Some(intent) = keyboard::interpret(event, &FocusedBlock::from(block), caret) else {
            return KeyOutcome::Ignored;
        };

        match intent {
            Intent::InsertParagraphAfter(id) => {
                self.add_block(BlockType::Paragraph, Some(id));
            }
            Intent::Delete(id) => self.delete_block(id),
            Intent::Indent(id) => self.indent_block(id),
            Intent::Outdent(id) => self.outdent_block(id),
            Intent::OpenMenu { position, target } => self.open_menu(position, Some(target)),
            Intent::Swallow => {}
        }
        KeyOutcome::Handled
    }

    fn handle_menu_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        match event.key {
            Key::Escape => self.close_menu(),
            Key::ArrowUp => self.menu.move_highlight(-1),
            Key::ArrowDown => self.menu.move_highlight(1),
            Key::Enter => {
                if let Some(kind) = self.menu.highlighted() {
                    self.select_type(kind);
                }
            }
            Key::Backspace => self.menu.pop_query(),
            Key::Char(c) if !event.modifiers.has_command() => self.menu.push_query(c),
            Key::Tab | Key::Char(_) | Key::Other => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }
}
