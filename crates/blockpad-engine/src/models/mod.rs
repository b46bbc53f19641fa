pub mod block;

pub use block::{Block, BlockId, BlockType, ParseBlockTypeError};
