pub mod editing;
pub mod models;

// Re-export key types for easier usage
pub use editing::{
    CaretGeometry, CaretPlacer, CaretRect, Cmd, CommandMenu, Document, Editor, Key, KeyEvent,
    KeyOutcome, MenuPosition, Modifiers, Snapshot,
};
pub use models::{Block, BlockId, BlockType, ParseBlockTypeError};
