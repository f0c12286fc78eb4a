// src/parsing/mod.rs
//! Markdown text to a flat block sequence.
//!
//! A single forward scan over lines. Only fenced code looks ahead: its
//! lines are consumed verbatim until a closing fence or the end of input.
//! Indentation is not turned into nesting; nested lists come back flat.

mod classify;
mod cursor;

pub use classify::{classify, LineKind};
pub use cursor::LineCursor;

use crate::constants::DEFAULT_CODE_LANGUAGE;
use crate::model::Block;

/// Parses Markdown into top-level blocks.
pub fn parse_markdown(text: &str) -> Vec<Block> {
    let mut cursor = LineCursor::new(text);
    let mut blocks = Vec::new();

    while let Some(line) = cursor.next_line() {
        let block = match classify(line) {
            LineKind::FenceOpen { ticks, language } => code_block(&mut cursor, ticks, language),
            LineKind::Divider => Block::divider(),
            LineKind::Heading { level, text } => Block::heading(level, text),
            LineKind::ToDo { checked, text } => Block::todo(text, checked),
            LineKind::Bulleted(text) => Block::bulleted(text),
            LineKind::Numbered(text) => Block::numbered(text),
            LineKind::Quote(first) => {
                let mut lines = vec![first];
                lines.extend(cursor.take_while(|next| match classify(next) {
                    LineKind::Quote(text) => Some(text),
                    _ => None,
                }));
                Block::quote(&lines.join("\n"))
            }
            LineKind::Text(first) => {
                let mut lines = vec![first];
                lines.extend(cursor.take_while(|next| match classify(next) {
                    LineKind::Text(text) => Some(text),
                    _ => None,
                }));
                Block::paragraph(&lines.join("\n"))
            }
            LineKind::EmptyParagraph => Block::paragraph(""),
            LineKind::Blank => continue,
        };
        blocks.push(block);
    }

    log::debug!("Parsed {} blocks from {} bytes of Markdown", blocks.len(), text.len());
    blocks
}

/// Consumes code lines up to the closing fence. An unclosed fence runs to
/// the end of input.
fn code_block(cursor: &mut LineCursor<'_>, ticks: usize, language: &str) -> Block {
    let start = cursor.line_number();
    let mut lines = Vec::new();
    let mut closed = false;

    while let Some(line) = cursor.next_line() {
        if classify::closes_fence(line, ticks) {
            closed = true;
            break;
        }
        lines.push(line);
    }

    if !closed {
        log::debug!("Code fence opened on line {} is never closed", start);
    }

    let language = if language.is_empty() {
        DEFAULT_CODE_LANGUAGE
    } else {
        language
    };
    Block::code(&lines.join("\n"), language)
}
