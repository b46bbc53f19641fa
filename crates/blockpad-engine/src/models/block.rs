use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a block
///
/// Ids are random v4 UUIDs, so an id is never handed out twice within a
/// session even after its block has been deleted.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub Uuid);

impl BlockId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Block type classification
///
/// Every variant shares the same `{id, content, indent}` shape on [`Block`];
/// behaviour that differs per type is a `match` on this enum.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    #[default]
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletList,
    NumberedList,
    Todo,
    Divider,
}

impl BlockType {
    /// All block types in command menu order
    pub const ALL: [BlockType; 8] = [
        BlockType::Paragraph,
        BlockType::Heading1,
        BlockType::Heading2,
        BlockType::Heading3,
        BlockType::BulletList,
        BlockType::NumberedList,
        BlockType::Todo,
        BlockType::Divider,
    ];

    /// Stable name used for serialization and parsing
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading1 => "heading1",
            BlockType::Heading2 => "heading2",
            BlockType::Heading3 => "heading3",
            BlockType::BulletList => "bulletList",
            BlockType::NumberedList => "numberedList",
            BlockType::Todo => "todo",
            BlockType::Divider => "divider",
        }
    }

    /// Human-readable label shown in the command menu
    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "Text",
            BlockType::Heading1 => "Heading 1",
            BlockType::Heading2 => "Heading 2",
            BlockType::Heading3 => "Heading 3",
            BlockType::BulletList => "Bulleted list",
            BlockType::NumberedList => "Numbered list",
            BlockType::Todo => "To-do list",
            BlockType::Divider => "Divider",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "Just start writing with plain text.",
            BlockType::Heading1 => "Big section heading.",
            BlockType::Heading2 => "Medium section heading.",
            BlockType::Heading3 => "Small section heading.",
            BlockType::BulletList => "Create a simple bulleted list.",
            BlockType::NumberedList => "Create a list with numbering.",
            BlockType::Todo => "Track tasks with a to-do list.",
            BlockType::Divider => "Visually divide blocks.",
        }
    }

    /// Whether blocks of this type carry editable text
    pub fn holds_text(&self) -> bool {
        !matches!(self, BlockType::Divider)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown block type: {0}")]
pub struct ParseBlockTypeError(pub String);

impl FromStr for BlockType {
    type Err = ParseBlockTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseBlockTypeError(s.to_string()))
    }
}

/// One unit of document content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub kind: BlockType,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub indent: usize,
}

impl Block {
    /// Create an empty block with a fresh id
    pub fn new(kind: BlockType) -> Self {
        Self {
            id: BlockId::new(),
            kind,
            content: String::new(),
            indent: 0,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Text as seen by editing logic; dividers never have any
    pub fn text(&self) -> &str {
        if self.kind.holds_text() {
            &self.content
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(BlockType::Paragraph, "paragraph")]
    #[case(BlockType::Heading1, "heading1")]
    #[case(BlockType::Heading2, "heading2")]
    #[case(BlockType::Heading3, "heading3")]
    #[case(BlockType::BulletList, "bulletList")]
    #[case(BlockType::NumberedList, "numberedList")]
    #[case(BlockType::Todo, "todo")]
    #[case(BlockType::Divider, "divider")]
    fn test_block_type_names_parse_back(#[case] kind: BlockType, #[case] name: &str) {
        assert_eq!(kind.to_string(), name);
        assert_eq!(name.parse::<BlockType>(), Ok(kind));
    }

    #[test]
    fn test_unknown_block_type_is_an_error() {
        let err = "heading4".parse::<BlockType>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown block type: heading4");
    }

    #[test]
    fn test_new_blocks_get_distinct_ids() {
        let a = Block::new(BlockType::Paragraph);
        let b = Block::new(BlockType::Paragraph);
        assert_ne!(a.id, b.id);
        assert_eq!(a.content, "");
        assert_eq!(a.indent, 0);
    }

    #[test]
    fn test_divider_text_is_always_empty() {
        let block = Block::new(BlockType::Divider).with_content("stale");
        assert_eq!(block.text(), "");

        let block = Block::new(BlockType::Todo).with_content("buy milk");
        assert_eq!(block.text(), "buy milk");
    }
}
