use anyhow::Result;
use blockpad_engine::editing::RenderBlock;
use blockpad_engine::{
    Block, BlockId, CaretGeometry, CaretPlacer, CaretRect, Editor, Key, KeyEvent, MenuPosition,
    Modifiers,
};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::Rect;
use std::path::PathBuf;

use crate::{store, ui};

/// Terminal caret: which block it sits in and at which character
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TerminalCaret {
    pub block: Option<BlockId>,
    pub col: usize,
}

impl CaretPlacer for TerminalCaret {
    fn place_caret_at_end(&mut self, block: &Block) {
        self.block = Some(block.id);
        self.col = block.text().chars().count();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub editor: Editor<TerminalCaret>,
    pub document_path: PathBuf,
    pub indent_width: u16,
    pub status: String,
    /// First block row shown in the viewport
    pub scroll: usize,
    /// Block area from the most recent draw
    pub viewport: Rect,
    saved_version: u64,
}

impl App {
    pub fn new(document_path: PathBuf, indent_width: u16) -> Result<Self> {
        let document = store::load_document(&document_path)?;
        Ok(Self {
            editor: Editor::with_document(document, TerminalCaret::default()),
            document_path,
            indent_width,
            status: "Ctrl+S save | Ctrl+Q quit | / or Ctrl+N for blocks".to_string(),
            scroll: 0,
            viewport: Rect::default(),
            saved_version: 0,
        })
    }

    pub fn is_dirty(&self) -> bool {
        self.editor.version() != self.saved_version
    }

    pub fn save(&mut self) {
        match store::save_document(&self.document_path, self.editor.document()) {
            Ok(()) => {
                self.saved_version = self.editor.version();
                self.status = format!("Saved {}", self.document_path.display());
            }
            Err(e) => {
                log::warn!("save failed: {e}");
                self.status = format!("Error: {e}");
            }
        }
    }

    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> Flow {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') if ctrl => return Flow::Quit,
            KeyCode::Char('s') if ctrl => {
                self.save();
                return Flow::Continue;
            }
            KeyCode::Char('n') if ctrl => {
                self.open_add_menu();
                return Flow::Continue;
            }
            KeyCode::Up if ctrl => {
                if let Some(id) = self.editor.focused_block_id() {
                    self.editor.move_block_up(id);
                }
                return Flow::Continue;
            }
            KeyCode::Down if ctrl => {
                if let Some(id) = self.editor.focused_block_id() {
                    self.editor.move_block_down(id);
                }
                return Flow::Continue;
            }
            _ => {}
        }

        let geometry = self.caret_geometry();
        let event = to_engine_key(&key);
        if self
            .editor
            .handle_key(&event, geometry.as_ref())
            .is_handled()
        {
            return Flow::Continue;
        }

        self.native_input(&key);
        Flow::Continue
    }

    /// Plain text editing for keys the engine leaves alone
    fn native_input(&mut self, key: &crossterm::event::KeyEvent) {
        let Some(block) = self.editor.focused_block() else {
            if key.code == KeyCode::Down || key.code == KeyCode::Up {
                self.focus_at(0);
            }
            return;
        };
        let (id, kind, text) = (block.id, block.kind, block.text().to_string());
        let col = self.caret_col(id, &text);
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        match key.code {
            KeyCode::Char(c) if plain => {
                if !kind.holds_text() {
                    return;
                }
                let mut text = text;
                text.insert(byte_index(&text, col), c);
                self.editor.update_block_content(id, text);
                self.set_caret(id, col + 1);
            }
            KeyCode::Backspace if col > 0 => {
                let mut text = text;
                text.remove(byte_index(&text, col - 1));
                self.editor.update_block_content(id, text);
                self.set_caret(id, col - 1);
            }
            KeyCode::Left => self.set_caret(id, col.saturating_sub(1)),
            KeyCode::Right => self.set_caret(id, (col + 1).min(text.chars().count())),
            KeyCode::Home => self.set_caret(id, 0),
            KeyCode::End => self.set_caret(id, text.chars().count()),
            KeyCode::Up => self.focus_relative(id, -1),
            KeyCode::Down => self.focus_relative(id, 1),
            KeyCode::Esc => self.editor.clear_focus(),
            _ => {}
        }
    }

    fn caret_col(&self, id: BlockId, text: &str) -> usize {
        let caret = self.editor.caret();
        if caret.block == Some(id) {
            caret.col.min(text.chars().count())
        } else {
            text.chars().count()
        }
    }

    fn set_caret(&mut self, id: BlockId, col: usize) {
        let caret = self.editor.caret_mut();
        caret.block = Some(id);
        caret.col = col;
    }

    fn focus_relative(&mut self, id: BlockId, delta: isize) {
        let Some(pos) = self.editor.document().position(id) else {
            return;
        };
        let target = pos as isize + delta;
        if target >= 0 {
            self.focus_at(target as usize);
        }
    }

    /// Host-side focus move, e.g. arrowing between blocks
    fn focus_at(&mut self, index: usize) {
        let Some(block) = self.editor.blocks().get(index) else {
            return;
        };
        let block = block.clone();
        self.editor.set_focused_block_id(Some(block.id));
        self.editor.caret_mut().place_caret_at_end(&block);
    }

    fn open_add_menu(&mut self) {
        let rows = self.editor.blocks().len();
        let position = MenuPosition {
            top: f64::from(self.viewport.y) + (rows + 1) as f64,
            left: f64::from(self.viewport.x),
        };
        self.editor.open_menu(position, None);
    }

    /// Caret rectangle in document coordinates for the focused block
    ///
    /// `rect` is `None` when the focused block is scrolled out of view.
    pub fn caret_geometry(&self) -> Option<CaretGeometry> {
        let id = self.editor.focused_block_id()?;
        let snapshot = self.editor.snapshot();
        let (index, block) = snapshot
            .blocks
            .iter()
            .enumerate()
            .find(|(_, block)| block.id == id)?;

        let mut geometry = CaretGeometry {
            rect: None,
            scroll_x: 0.0,
            scroll_y: self.scroll as f64,
        };
        if index < self.scroll || index >= self.scroll + usize::from(self.viewport.height) {
            return Some(geometry);
        }

        let row = f64::from(self.viewport.y) + (index - self.scroll) as f64;
        let col = self.caret_col(id, &block.content);
        let left = f64::from(self.viewport.x) + self.text_offset(block) as f64 + col as f64;
        geometry.rect = Some(CaretRect {
            top: row,
            left,
            bottom: row + 1.0,
            right: left + 1.0,
        });
        Some(geometry)
    }

    /// Columns between the block area's left edge and the first content character
    pub fn text_offset(&self, block: &RenderBlock) -> usize {
        self.indent_columns(block.indent) + ui::prefix(block).chars().count()
    }

    /// Leading columns for an indent level, clipped to the viewport width
    pub fn indent_columns(&self, indent: usize) -> usize {
        indent
            .saturating_mul(usize::from(self.indent_width))
            .min(usize::from(self.viewport.width))
    }
}

fn byte_index(text: &str, col: usize) -> usize {
    text.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

pub fn to_engine_key(key: &crossterm::event::KeyEvent) -> KeyEvent {
    let mut modifiers = Modifiers {
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        meta: key
            .modifiers
            .intersects(KeyModifiers::SUPER | KeyModifiers::META),
    };
    let key = match key.code {
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => {
            modifiers.shift = true;
            Key::Tab
        }
        KeyCode::Esc => Key::Escape,
        KeyCode::Up => Key::ArrowUp,
        KeyCode::Down => Key::ArrowDown,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    };
    KeyEvent::new(key, modifiers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpad_engine::BlockType;
    use crossterm::event::KeyEvent as TermKey;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(dir.path().join("doc.toml"), 2).unwrap();
        app.viewport = Rect::new(1, 1, 40, 10);
        (dir, app)
    }

    fn press(app: &mut App, code: KeyCode) -> Flow {
        app.handle_key(TermKey::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn contents(app: &App) -> Vec<String> {
        app.editor
            .blocks()
            .iter()
            .map(|block| block.content.clone())
            .collect()
    }

    #[test]
    fn test_backtab_maps_to_shift_tab() {
        let event = to_engine_key(&TermKey::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(event, KeyEvent::shifted(Key::Tab));
    }

    #[test]
    fn test_typing_inserts_at_caret() {
        let (_dir, mut app) = app();
        type_str(&mut app, "helo");
        press(&mut app, KeyCode::Left);
        type_str(&mut app, "l");

        assert_eq!(contents(&app), vec!["hello"]);
        assert_eq!(app.editor.caret().col, 4);
        assert!(app.is_dirty());
    }

    #[test]
    fn test_enter_then_backspace_round_trip() {
        let (_dir, mut app) = app();
        type_str(&mut app, "first");
        press(&mut app, KeyCode::Enter);
        assert_eq!(contents(&app), vec!["first", ""]);

        press(&mut app, KeyCode::Backspace);

        assert_eq!(contents(&app), vec!["first"]);
        assert_eq!(app.editor.caret().col, 5);
    }

    #[test]
    fn test_backspace_with_text_deletes_previous_char() {
        let (_dir, mut app) = app();
        type_str(&mut app, "héllo");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Backspace);

        assert_eq!(contents(&app), vec!["hllo"]);
    }

    #[test]
    fn test_slash_menu_retypes_focused_block() {
        let (_dir, mut app) = app();
        type_str(&mut app, "Title");
        press(&mut app, KeyCode::Char('/'));
        assert!(app.editor.menu().is_open());
        assert_eq!(
            app.editor.menu().position(),
            MenuPosition {
                top: 2.0,
                left: 6.0
            }
        );

        type_str(&mut app, "heading 2");
        press(&mut app, KeyCode::Enter);

        let block = &app.editor.blocks()[0];
        assert_eq!(block.kind, BlockType::Heading2);
        assert_eq!(block.content, "Title");
    }

    #[test]
    fn test_add_menu_appends_block() {
        let (_dir, mut app) = app();
        app.handle_key(TermKey::new(KeyCode::Char('n'), KeyModifiers::CONTROL));
        assert_eq!(app.editor.menu().target(), None);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.editor.blocks().len(), 2);
        assert_eq!(app.editor.blocks()[1].kind, BlockType::Heading1);
        assert_eq!(app.editor.focused_block_id(), Some(app.editor.blocks()[1].id));
    }

    #[test]
    fn test_arrows_move_focus_between_blocks() {
        let (_dir, mut app) = app();
        type_str(&mut app, "one");
        press(&mut app, KeyCode::Enter);
        let second = app.editor.focused_block_id();

        press(&mut app, KeyCode::Up);
        assert_eq!(app.editor.focused_block_id(), Some(app.editor.blocks()[0].id));
        assert_eq!(app.editor.caret().col, 3);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.editor.focused_block_id(), second);
    }

    #[test]
    fn test_ctrl_s_saves_and_clears_dirty_flag() {
        let (dir, mut app) = app();
        type_str(&mut app, "persist me");

        app.handle_key(TermKey::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

        assert!(!app.is_dirty());
        let reloaded = store::load_document(&dir.path().join("doc.toml")).unwrap();
        assert_eq!(reloaded.blocks()[0].content, "persist me");
    }

    #[test]
    fn test_ctrl_arrows_move_focused_block() {
        let (_dir, mut app) = app();
        type_str(&mut app, "one");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "two");
        press(&mut app, KeyCode::Tab);
        let moved = app.editor.focused_block_id().unwrap();

        app.handle_key(TermKey::new(KeyCode::Up, KeyModifiers::CONTROL));
        assert_eq!(contents(&app), vec!["two", "one"]);
        assert_eq!(app.editor.focused_block_id(), Some(moved));
        assert_eq!(app.editor.blocks()[0].indent, 1);

        // Already at the top
        app.handle_key(TermKey::new(KeyCode::Up, KeyModifiers::CONTROL));
        assert_eq!(contents(&app), vec!["two", "one"]);

        app.handle_key(TermKey::new(KeyCode::Down, KeyModifiers::CONTROL));
        assert_eq!(contents(&app), vec!["one", "two"]);
        assert_eq!(app.editor.focused_block_id(), Some(moved));
        assert_eq!(app.editor.blocks()[1].indent, 1);
    }

    #[test]
    fn test_escape_clears_focus() {
        let (_dir, mut app) = app();
        type_str(&mut app, "text");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.editor.focused_block_id(), None);
        assert_eq!(contents(&app), vec!["text"]);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.editor.focused_block_id(), Some(app.editor.blocks()[0].id));
    }

    #[test]
    fn test_indent_columns_are_clipped_to_viewport() {
        let (_dir, app) = app();

        assert_eq!(app.indent_columns(3), 6);
        assert_eq!(app.indent_columns(usize::MAX), 40);
    }

    #[test]
    fn test_ctrl_q_quits() {
        let (_dir, mut app) = app();
        let flow = app.handle_key(TermKey::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert_eq!(flow, Flow::Quit);
    }
}
