// src/formatting/inline.rs
//! Rich text spans to inline Markdown.

use crate::types::{Annotations, RichTextItem};

/// Renders a span sequence as inline Markdown.
pub fn render_rich_text(items: &[RichTextItem]) -> String {
    items.iter().map(render_span).collect()
}

/// Renders one span.
///
/// Markers nest in a fixed order: code innermost, then bold, italic,
/// strikethrough, and underline outermost. A link wraps the result.
/// Surrounding whitespace stays outside the markers so `** bold**` never
/// appears in the output.
pub fn render_span(item: &RichTextItem) -> String {
    let text = item.plain_text.as_str();
    let core = text.trim();
    if core.is_empty() {
        return text.to_string();
    }

    let leading = &text[..text.len() - text.trim_start().len()];
    let trailing = &text[text.trim_end().len()..];

    let mut styled = apply_annotations(core, &item.annotations);
    if let Some(url) = &item.link {
        styled = format!("[{}]({})", styled, url);
    }

    format!("{}{}{}", leading, styled, trailing)
}

fn apply_annotations(text: &str, annotations: &Annotations) -> String {
    let mut result = if annotations.code {
        code_span(text)
    } else {
        text.to_string()
    };

    if annotations.bold {
        result = format!("**{}**", result);
    }
    if annotations.italic {
        result = format!("*{}*", result);
    }
    if annotations.strikethrough {
        result = format!("~~{}~~", result);
    }
    if annotations.underline {
        result = format!("<u>{}</u>", result);
    }
    result
}

/// Wraps text in enough backticks that embedded backticks survive.
fn code_span(text: &str) -> String {
    let longest_run = text
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);

    if longest_run == 0 {
        return format!("`{}`", text);
    }
    let fence = "`".repeat(longest_run + 1);
    format!("{} {} {}", fence, text, fence)
}
