use super::common::BlockCommon;
use crate::types::RichTextItem;
use serde::{Deserialize, Serialize};

/// Text content block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextBlockContent {
    pub rich_text: Vec<RichTextItem>,
}

impl TextBlockContent {
    pub fn new(rich_text: Vec<RichTextItem>) -> Self {
        Self { rich_text }
    }
}

/// Paragraph block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParagraphBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Heading 1 block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Heading1Block {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Heading 2 block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Heading2Block {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Heading 3 block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Heading3Block {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Bulleted list item block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BulletedListItemBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Numbered list item block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberedListItemBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// To-do block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToDoBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    pub checked: bool,
}

/// Quote block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Code block. Text is kept raw; annotations are ignored when rendering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CodeBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    pub language: String,
}

/// Divider block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DividerBlock {
    pub common: BlockCommon,
}

/// Callout block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalloutBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    pub icon: Option<Icon>,
}

/// Icon types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Icon {
    Emoji(String),
    External(String),
}

impl Icon {
    /// Short textual form used when rendering.
    pub fn as_text(&self) -> &str {
        match self {
            Icon::Emoji(emoji) => emoji,
            Icon::External(url) => url,
        }
    }
}

/// Toggle block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToggleBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Child page block. Its content lives on the child page itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChildPageBlock {
    pub common: BlockCommon,
    pub title: String,
}

/// Any block type without a Markdown mapping.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnsupportedBlock {
    pub common: BlockCommon,
    pub block_type: String,
}
