/*!
 * # Editing Core Module
 *
 * Block-based editing: an ordered list of typed blocks, the commands that
 * mutate it, and the keyboard/focus/menu machinery a host drives it with.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: the block list
 * - A [`Document`] owns a `Vec<Block>`; position in the vector is rendering order
 * - The list is never empty while mounted
 * - Indent is a per-block integer, not a parent/child tree
 *
 * ### 2. Command-Based Editing
 * - Every mutation is a [`Cmd`] applied through `Document::apply`
 * - Commands are total: stale ids and boundary hits are silent no-ops
 * - Each application returns a [`Patch`] describing its [`Effect`]
 *
 * ### 3. Keyboard Dispatch
 * - [`keyboard::interpret`] maps a raw key on the focused block to an [`Intent`]
 * - Enter inserts a paragraph, Backspace on empty deletes, Tab/Shift+Tab
 *   indent/outdent, `/` opens the command menu under the caret
 *
 * ### 4. Focus and Caret
 * - [`FocusController`] tracks the focused block
 * - Engine-driven focus moves ask the host's [`CaretPlacer`] to put the caret
 *   at the end of the block
 *
 * ### 5. Read API: Immutable Snapshots
 * - [`Snapshot`] carries render-ready blocks (with list numbering) and the
 *   visible menu, so hosts never reach into engine state
 *
 * ## Usage Pattern
 *
 * ```rust
 * use blockpad_engine::editing::*;
 * use blockpad_engine::models::BlockType;
 *
 * let mut editor = Editor::headless();
 * let first = editor.focused_block_id().unwrap();
 *
 * // `/` under a resolvable caret opens the menu on the focused block
 * let caret = CaretGeometry::at(CaretRect { top: 0.0, left: 8.0, bottom: 16.0, right: 9.0 });
 * editor.handle_key(&KeyEvent::plain(Key::Char('/')), Some(&caret));
 * editor.set_menu_query("head");
 * editor.select_type(BlockType::Heading1);
 *
 * let snapshot = editor.snapshot();
 * assert_eq!(snapshot.blocks[0].id, first);
 * assert_eq!(snapshot.blocks[0].kind, BlockType::Heading1);
 * assert!(snapshot.menu.is_none());
 * ```
 */

pub mod commands;
pub mod document;
pub mod editor;
pub mod focus;
pub mod keyboard;
pub mod menu;
pub mod patch;
pub mod snapshot;

// Public API re-exports
pub use commands::Cmd;
pub use document::Document;
pub use editor::Editor;
pub use focus::{CaretPlacer, FocusController};
pub use keyboard::{
    CaretGeometry, CaretRect, FocusedBlock, Intent, Key, KeyEvent, KeyOutcome, Modifiers,
};
pub use menu::{CommandMenu, MenuPosition, MenuSelection};
pub use patch::{Effect, Patch};
pub use snapshot::{MenuItem, MenuView, RenderBlock, Snapshot};
