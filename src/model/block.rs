use super::blocks::*;
use super::common::BlockCommon;
use crate::types::{split_into_spans, NotionId, RichTextItem};
use serde::{Deserialize, Serialize};

/// Macro to reduce boilerplate in Block enum methods
macro_rules! match_all_blocks {
    ($self:expr, $pattern:pat => $result:expr) => {
        match $self {
            Block::Paragraph($pattern) => $result,
            Block::Heading1($pattern) => $result,
            Block::Heading2($pattern) => $result,
            Block::Heading3($pattern) => $result,
            Block::BulletedListItem($pattern) => $result,
            Block::NumberedListItem($pattern) => $result,
            Block::ToDo($pattern) => $result,
            Block::Quote($pattern) => $result,
            Block::Code($pattern) => $result,
            Block::Divider($pattern) => $result,
            Block::Callout($pattern) => $result,
            Block::Toggle($pattern) => $result,
            Block::ChildPage($pattern) => $result,
            Block::Unsupported($pattern) => $result,
        }
    };
}

/// One typed content unit in a page body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(ParagraphBlock),
    Heading1(Heading1Block),
    Heading2(Heading2Block),
    Heading3(Heading3Block),
    BulletedListItem(BulletedListItemBlock),
    NumberedListItem(NumberedListItemBlock),
    ToDo(ToDoBlock),
    Quote(QuoteBlock),
    Code(CodeBlock),
    Divider(DividerBlock),
    Callout(CalloutBlock),
    Toggle(ToggleBlock),
    ChildPage(ChildPageBlock),
    Unsupported(UnsupportedBlock),
}

impl Block {
    /// Get the block's ID, if it has been assigned one remotely
    pub fn id(&self) -> Option<&NotionId> {
        self.common().id.as_ref()
    }

    /// Get the block's children
    pub fn children(&self) -> &[Block] {
        &self.common().children
    }

    /// Whether the source declared nested children for this block
    pub fn has_children(&self) -> bool {
        self.common().has_children
    }

    /// Get common block data
    pub fn common(&self) -> &BlockCommon {
        match_all_blocks!(self, b => &b.common)
    }

    fn common_mut(&mut self) -> &mut BlockCommon {
        match_all_blocks!(self, b => &mut b.common)
    }

    /// Consumes the block and returns it with `children` attached.
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.common_mut().children = children;
        self
    }

    /// The visible text of the block, for types that carry rich text.
    pub fn rich_text(&self) -> Option<&[RichTextItem]> {
        match self {
            Block::Paragraph(b) => Some(&b.content.rich_text),
            Block::Heading1(b) => Some(&b.content.rich_text),
            Block::Heading2(b) => Some(&b.content.rich_text),
            Block::Heading3(b) => Some(&b.content.rich_text),
            Block::BulletedListItem(b) => Some(&b.content.rich_text),
            Block::NumberedListItem(b) => Some(&b.content.rich_text),
            Block::ToDo(b) => Some(&b.content.rich_text),
            Block::Quote(b) => Some(&b.content.rich_text),
            Block::Code(b) => Some(&b.content.rich_text),
            Block::Callout(b) => Some(&b.content.rich_text),
            Block::Toggle(b) => Some(&b.content.rich_text),
            Block::Divider(_) | Block::ChildPage(_) | Block::Unsupported(_) => None,
        }
    }

    /// Get block type name as used on the wire
    pub fn block_type(&self) -> &str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading1(_) => "heading_1",
            Block::Heading2(_) => "heading_2",
            Block::Heading3(_) => "heading_3",
            Block::BulletedListItem(_) => "bulleted_list_item",
            Block::NumberedListItem(_) => "numbered_list_item",
            Block::ToDo(_) => "to_do",
            Block::Quote(_) => "quote",
            Block::Code(_) => "code",
            Block::Divider(_) => "divider",
            Block::Callout(_) => "callout",
            Block::Toggle(_) => "toggle",
            Block::ChildPage(_) => "child_page",
            Block::Unsupported(b) => &b.block_type,
        }
    }

    /// Whether this block belongs to a Markdown list (bulleted, numbered, to-do).
    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            Block::BulletedListItem(_) | Block::NumberedListItem(_) | Block::ToDo(_)
        )
    }

    // --- Construction vocabulary for blocks without a remote id ---

    pub fn paragraph(text: &str) -> Self {
        Block::Paragraph(ParagraphBlock {
            common: BlockCommon::default(),
            content: text_content(text),
        })
    }

    /// Heading of level 1-3; deeper levels clamp to 3.
    pub fn heading(level: u8, text: &str) -> Self {
        let common = BlockCommon::default();
        let content = text_content(text);
        match level {
            0 | 1 => Block::Heading1(Heading1Block { common, content }),
            2 => Block::Heading2(Heading2Block { common, content }),
            _ => Block::Heading3(Heading3Block { common, content }),
        }
    }

    pub fn bulleted(text: &str) -> Self {
        Block::BulletedListItem(BulletedListItemBlock {
            common: BlockCommon::default(),
            content: text_content(text),
        })
    }

    pub fn numbered(text: &str) -> Self {
        Block::NumberedListItem(NumberedListItemBlock {
            common: BlockCommon::default(),
            content: text_content(text),
        })
    }

    pub fn todo(text: &str, checked: bool) -> Self {
        Block::ToDo(ToDoBlock {
            common: BlockCommon::default(),
            content: text_content(text),
            checked,
        })
    }

    pub fn quote(text: &str) -> Self {
        Block::Quote(QuoteBlock {
            common: BlockCommon::default(),
            content: text_content(text),
        })
    }

    pub fn code(text: &str, language: &str) -> Self {
        Block::Code(CodeBlock {
            common: BlockCommon::default(),
            content: text_content(text),
            language: language.to_string(),
        })
    }

    pub fn divider() -> Self {
        Block::Divider(DividerBlock::default())
    }
}

fn text_content(text: &str) -> TextBlockContent {
    TextBlockContent::new(split_into_spans(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructed_blocks_have_no_id_or_children() {
        let block = Block::todo("ship it", true);
        assert!(block.id().is_none());
        assert!(!block.has_children());
        assert!(block.children().is_empty());
        assert_eq!(block.block_type(), "to_do");
    }

    #[test]
    fn with_children_keeps_the_declared_flag() {
        let parent = Block::BulletedListItem(BulletedListItemBlock {
            common: BlockCommon::default().with_has_children(true),
            content: TextBlockContent::default(),
        });

        let filled = parent.with_children(vec![Block::bulleted("child")]);
        assert!(filled.has_children());
        assert_eq!(filled.children().len(), 1);
    }

    #[test]
    fn unsupported_blocks_report_their_raw_type() {
        let block = Block::Unsupported(UnsupportedBlock {
            common: BlockCommon::default(),
            block_type: "synced_block".to_string(),
        });
        assert_eq!(block.block_type(), "synced_block");
        assert!(block.rich_text().is_none());
    }

    #[test]
    fn heading_levels_clamp() {
        assert!(matches!(Block::heading(1, "a"), Block::Heading1(_)));
        assert!(matches!(Block::heading(2, "a"), Block::Heading2(_)));
        assert!(matches!(Block::heading(5, "a"), Block::Heading3(_)));
    }
}
