// src/formatting/block_renderer.rs
//! Block tree to Markdown.
//!
//! Rendering is a pure recursive walk: each block produces its own lines,
//! children are rendered as a nested document and indented under their
//! parent, and siblings are joined with a separator that depends on
//! whether both sides belong to a list.

use super::inline::render_rich_text;
use super::normalize::{fence_length, normalize_whitespace};
use crate::constants::{
    BULLETED_CHILD_INDENT, CHARS_PER_BLOCK_ESTIMATE, DEFAULT_CODE_LANGUAGE, EMPTY_PARAGRAPH_MARKER,
    NUMBERED_CHILD_INDENT,
};
use crate::model::*;
use crate::types::concat_plain_text;

/// Renders a block forest as a normalized Markdown document.
pub fn render_markdown(blocks: &[Block]) -> String {
    log::debug!("Rendering {} top-level blocks", blocks.len());
    normalize_whitespace(&render_blocks(blocks))
}

/// Renders sibling blocks without the final normalization pass.
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut output = String::with_capacity(blocks.len() * CHARS_PER_BLOCK_ESTIMATE);
    let mut previous: Option<&Block> = None;

    for block in blocks {
        if let Some(prev) = previous {
            output.push_str(separator(prev, block));
        }
        output.push_str(&render_block(block));
        previous = Some(block);
    }

    output
}

/// List items stay tight; everything else is separated by a blank line.
fn separator(previous: &Block, next: &Block) -> &'static str {
    if previous.is_list_item() && next.is_list_item() {
        "\n"
    } else {
        "\n\n"
    }
}

pub fn render_block(block: &Block) -> String {
    match block {
        Block::Paragraph(b) => with_children(paragraph(&b.content), block, BULLETED_CHILD_INDENT),
        Block::Heading1(b) => heading(1, &b.content),
        Block::Heading2(b) => heading(2, &b.content),
        Block::Heading3(b) => heading(3, &b.content),
        Block::BulletedListItem(b) => with_children(
            format!("- {}", render_rich_text(&b.content.rich_text)),
            block,
            BULLETED_CHILD_INDENT,
        ),
        Block::NumberedListItem(b) => with_children(
            format!("1. {}", render_rich_text(&b.content.rich_text)),
            block,
            NUMBERED_CHILD_INDENT,
        ),
        Block::ToDo(b) => {
            let mark = if b.checked { "x" } else { " " };
            with_children(
                format!("- [{}] {}", mark, render_rich_text(&b.content.rich_text)),
                block,
                BULLETED_CHILD_INDENT,
            )
        }
        Block::Quote(b) => quoted(&render_rich_text(&b.content.rich_text), None, block),
        Block::Code(b) => code_fence(b),
        Block::Divider(_) => "---".to_string(),
        Block::Callout(b) => quoted(
            &render_rich_text(&b.content.rich_text),
            b.icon.as_ref().map(Icon::as_text),
            block,
        ),
        Block::Toggle(b) => toggle(b),
        Block::ChildPage(b) => child_page(b),
        Block::Unsupported(b) => match &b.common.id {
            Some(id) => format!("<!-- unsupported block: {} {} -->", b.block_type, id),
            None => format!("<!-- unsupported block: {} -->", b.block_type),
        },
    }
}

fn paragraph(content: &TextBlockContent) -> String {
    let text = render_rich_text(&content.rich_text);
    if text.is_empty() {
        EMPTY_PARAGRAPH_MARKER.to_string()
    } else {
        text
    }
}

fn heading(level: usize, content: &TextBlockContent) -> String {
    format!("{} {}", "#".repeat(level), render_rich_text(&content.rich_text))
}

/// Appends the rendered children of `block`, indented by `indent` spaces.
fn with_children(line: String, block: &Block, indent: usize) -> String {
    if block.children().is_empty() {
        return line;
    }
    let children = render_blocks(block.children());
    format!("{}\n{}", line, indent_lines(&children, indent))
}

fn indent_lines(text: &str, indent: usize) -> String {
    let pad = " ".repeat(indent);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefixes every line of the block (and its children) with `> `.
fn quoted(text: &str, icon: Option<&str>, block: &Block) -> String {
    let mut body = match icon {
        Some(icon) => format!("{} {}", icon, text),
        None => text.to_string(),
    };
    if !block.children().is_empty() {
        body.push_str("\n\n");
        body.push_str(&render_blocks(block.children()));
    }

    body.split('\n')
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Code uses the raw text; annotations never apply inside a fence.
fn code_fence(code: &CodeBlock) -> String {
    let text = concat_plain_text(&code.content.rich_text);
    let longest_inner_fence = text.lines().filter_map(fence_length).max().unwrap_or(0);
    let fence = "`".repeat(longest_inner_fence.max(2) + 1);

    let language = if code.language == DEFAULT_CODE_LANGUAGE {
        ""
    } else {
        code.language.as_str()
    };

    format!("{}{}\n{}\n{}", fence, language, text, fence)
}

fn toggle(toggle: &ToggleBlock) -> String {
    let summary = render_rich_text(&toggle.content.rich_text);
    if toggle.common.children.is_empty() {
        return format!("<details>\n<summary>{}</summary>\n</details>", summary);
    }
    format!(
        "<details>\n<summary>{}</summary>\n\n{}\n\n</details>",
        summary,
        render_blocks(&toggle.common.children)
    )
}

fn child_page(page: &ChildPageBlock) -> String {
    let title = if page.title.is_empty() {
        "Untitled"
    } else {
        page.title.as_str()
    };
    match &page.common.id {
        Some(id) => format!("- 📄 [{}]({})", title, id.to_url()),
        None => format!("- 📄 {}", title),
    }
}
