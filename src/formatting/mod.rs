// src/formatting/mod.rs
//! Markdown rendering of block trees.

mod block_renderer;
mod inline;
mod normalize;

pub use block_renderer::{render_block, render_blocks, render_markdown};
pub use inline::{render_rich_text, render_span};
pub use normalize::normalize_whitespace;
pub(crate) use normalize::fence_length;
