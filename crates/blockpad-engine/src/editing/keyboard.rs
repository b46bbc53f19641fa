//! Keyboard dispatch: raw key events to structural intents.
//!
//! [`interpret`] is pure. It looks at one key event and the focused block and
//! decides what the editor should do; [`Editor::handle_key`] applies the
//! result.
//!
//! [`Editor::handle_key`]: crate::editing::Editor::handle_key

use crate::editing::MenuPosition;
use crate::models::{Block, BlockId, BlockType};

/// Host-neutral key identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Tab,
    Escape,
    ArrowUp,
    ArrowDown,
    Char(char),
    /// Any key the engine never interprets
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// True when a command-style modifier is held
    pub fn has_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Raw key event as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn shifted(key: Key) -> Self {
        Self::new(key, Modifiers::SHIFT)
    }
}

/// Caret bounding box in viewport coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CaretRect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

/// Caret geometry reported alongside a key event
///
/// `rect` is `None` when the host could not resolve a caret range from the
/// current selection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CaretGeometry {
    pub rect: Option<CaretRect>,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl CaretGeometry {
    pub fn at(rect: CaretRect) -> Self {
        Self {
            rect: Some(rect),
            ..Self::default()
        }
    }

    pub fn with_scroll(mut self, scroll_x: f64, scroll_y: f64) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }

    /// Document position directly below the caret
    pub fn menu_position(&self) -> Option<MenuPosition> {
        self.rect.map(|rect| MenuPosition {
            top: rect.bottom + self.scroll_y,
            left: rect.left + self.scroll_x,
        })
    }
}

/// What the focused block looks like to the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusedBlock<'a> {
    pub id: BlockId,
    pub kind: BlockType,
    pub content: &'a str,
}

impl<'a> From<&'a Block> for FocusedBlock<'a> {
    fn from(block: &'a Block) -> Self {
        Self {
            id: block.id,
            kind: block.kind,
            content: &block.content,
        }
    }
}

impl FocusedBlock<'_> {
    fn is_empty(&self) -> bool {
        match self.kind {
            BlockType::Divider => true,
            BlockType::Paragraph
            | BlockType::Heading1
            | BlockType::Heading2
            | BlockType::Heading3
            | BlockType::BulletList
            | BlockType::NumberedList
            | BlockType::Todo => self.content.is_empty(),
        }
    }
}

/// Structural action derived from a key event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    InsertParagraphAfter(BlockId),
    Delete(BlockId),
    Indent(BlockId),
    Outdent(BlockId),
    OpenMenu {
        position: MenuPosition,
        target: BlockId,
    },
    /// Key was claimed but resolves to nothing (e.g. `/` without a caret)
    Swallow,
}

/// Whether the host should suppress its native handling of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Engine consumed the key; prevent default
    Handled,
    /// Let native input proceed
    Ignored,
}

impl KeyOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, KeyOutcome::Handled)
    }
}

/// Map a key event on the focused block to an intent
///
/// Rules are checked in priority order; the first match wins. `None` means
/// the event passes through unhandled.
pub fn interpret(
    event: &KeyEvent,
    focused: &FocusedBlock<'_>,
    caret: Option<&CaretGeometry>,
) -> Option<Intent> {
    let shift = event.modifiers.shift;
    match event.key {
        Key::Enter if !shift => Some(Intent::InsertParagraphAfter(focused.id)),
        Key::Backspace if focused.is_empty() => Some(Intent::Delete(focused.id)),
        Key::Tab if shift => Some(Intent::Outdent(focused.id)),
        Key::Tab => Some(Intent::Indent(focused.id)),
        Key::Char('/') if !shift => Some(
            match caret.and_then(CaretGeometry::menu_position) {
                Some(position) => Intent::OpenMenu {
                    position,
                    target: focused.id,
                },
                None => Intent::Swallow,
            },
        ),
        _ => None,
    }
}
