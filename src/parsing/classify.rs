// src/parsing/classify.rs
//! Line classification.
//!
//! Each rule is a pure function from one line to an optional [`LineKind`].
//! [`classify`] tries them in precedence order; the first rule that accepts
//! the line decides its kind. To-do items must be tried before bulleted
//! items because every to-do line is also a valid bullet.

use crate::formatting::fence_length;
use once_cell::sync::Lazy;
use regex::Regex;

static NUMBERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.(?: (.*))?$").expect("numbered item pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    FenceOpen { ticks: usize, language: &'a str },
    Divider,
    Heading { level: u8, text: &'a str },
    ToDo { checked: bool, text: &'a str },
    Bulleted(&'a str),
    Numbered(&'a str),
    Quote(&'a str),
    EmptyParagraph,
    Blank,
    Text(&'a str),
}

type Rule = for<'a> fn(&'a str) -> Option<LineKind<'a>>;

/// Rules in precedence order. `Text` is the fallback when none match.
const RULES: &[Rule] = &[
    fence_open,
    divider,
    heading,
    todo_item,
    bulleted_item,
    numbered_item,
    quote_line,
    empty_paragraph,
    blank,
];

pub fn classify(line: &str) -> LineKind<'_> {
    RULES
        .iter()
        .find_map(|rule| rule(line))
        .unwrap_or_else(|| LineKind::Text(line.trim()))
}

pub fn fence_open(line: &str) -> Option<LineKind<'_>> {
    let ticks = fence_length(line)?;
    let language = line.trim_start()[ticks..].trim();
    if language.contains('`') {
        return None;
    }
    Some(LineKind::FenceOpen { ticks, language })
}

/// Whether `line` closes a fence opened with `ticks` backticks.
pub fn closes_fence(line: &str, ticks: usize) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= ticks && trimmed.chars().all(|c| c == '`')
}

pub fn divider(line: &str) -> Option<LineKind<'_>> {
    (line.trim() == "---").then_some(LineKind::Divider)
}

pub fn heading(line: &str) -> Option<LineKind<'_>> {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    if !(1..=3).contains(&hashes) {
        return None;
    }
    let rest = trimmed[hashes..].trim_end();
    let text = if rest.is_empty() { rest } else { rest.strip_prefix(' ')? };
    Some(LineKind::Heading {
        level: hashes as u8,
        text: text.trim_end(),
    })
}

/// Text after a `- ` or `* ` marker. A bare marker is an empty item.
fn bullet_body(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if matches!(trimmed.trim_end(), "-" | "*") {
        return Some("");
    }
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
}

pub fn todo_item(line: &str) -> Option<LineKind<'_>> {
    let body = bullet_body(line)?.trim_end();
    let (checked, rest) = if let Some(rest) = body.strip_prefix("[ ]") {
        (false, rest)
    } else if let Some(rest) = body
        .strip_prefix("[x]")
        .or_else(|| body.strip_prefix("[X]"))
    {
        (true, rest)
    } else {
        return None;
    };

    if rest.is_empty() {
        return Some(LineKind::ToDo { checked, text: "" });
    }
    rest.strip_prefix(' ')
        .map(|text| LineKind::ToDo { checked, text })
}

pub fn bulleted_item(line: &str) -> Option<LineKind<'_>> {
    bullet_body(line).map(|text| LineKind::Bulleted(text.trim_end()))
}

pub fn numbered_item(line: &str) -> Option<LineKind<'_>> {
    let trimmed = line.trim();
    let captures = NUMBERED_ITEM.captures(trimmed)?;
    let text = captures.get(1).map_or("", |text| &trimmed[text.range()]);
    Some(LineKind::Numbered(text))
}

pub fn quote_line(line: &str) -> Option<LineKind<'_>> {
    let trimmed = line.trim();
    if trimmed == ">" {
        return Some(LineKind::Quote(""));
    }
    trimmed.strip_prefix("> ").map(LineKind::Quote)
}

pub fn empty_paragraph(line: &str) -> Option<LineKind<'_>> {
    matches!(line.trim(), "<br>" | "<br/>" | "<br />").then_some(LineKind::EmptyParagraph)
}

pub fn blank(line: &str) -> Option<LineKind<'_>> {
    line.trim().is_empty().then_some(LineKind::Blank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn todo_wins_over_bullet() {
        assert_eq!(
            classify("- [ ] task"),
            LineKind::ToDo { checked: false, text: "task" }
        );
        assert_eq!(
            classify("* [X] done"),
            LineKind::ToDo { checked: true, text: "done" }
        );
        assert_eq!(classify("- [link] text"), LineKind::Bulleted("[link] text"));
    }

    #[test]
    fn headings_need_a_space_and_at_most_three_hashes() {
        assert_eq!(heading("## Two"), Some(LineKind::Heading { level: 2, text: "Two" }));
        assert_eq!(heading("#hashtag"), None);
        assert_eq!(heading("#### Four"), None);
        assert_eq!(classify("#### Four"), LineKind::Text("#### Four"));
    }

    #[test]
    fn divider_must_stand_alone() {
        assert_eq!(classify("---"), LineKind::Divider);
        assert_eq!(classify("--- x"), LineKind::Text("--- x"));
    }

    #[test]
    fn fence_captures_language() {
        assert_eq!(
            classify("```rust"),
            LineKind::FenceOpen { ticks: 3, language: "rust" }
        );
        assert_eq!(
            classify("````"),
            LineKind::FenceOpen { ticks: 4, language: "" }
        );
        assert!(closes_fence("`````", 4));
        assert!(!closes_fence("```", 4));
        assert!(!closes_fence("```rust", 3));
    }

    #[test]
    fn numbered_items_accept_any_number() {
        assert_eq!(classify("12. twelve"), LineKind::Numbered("twelve"));
        assert_eq!(classify("1.no space"), LineKind::Text("1.no space"));
    }

    #[test]
    fn bare_markers_are_empty_blocks() {
        assert_eq!(classify("#"), LineKind::Heading { level: 1, text: "" });
        assert_eq!(classify("###"), LineKind::Heading { level: 3, text: "" });
        assert_eq!(classify("-"), LineKind::Bulleted(""));
        assert_eq!(classify("*"), LineKind::Bulleted(""));
        assert_eq!(classify("7."), LineKind::Numbered(""));
        assert_eq!(classify("- [x]"), LineKind::ToDo { checked: true, text: "" });
        assert_eq!(classify("<br>"), LineKind::EmptyParagraph);
        assert_eq!(classify("<br />"), LineKind::EmptyParagraph);
        assert_eq!(classify("--"), LineKind::Text("--"));
    }

    #[test]
    fn quotes_and_blanks() {
        assert_eq!(classify("> said"), LineKind::Quote("said"));
        assert_eq!(classify(">"), LineKind::Quote(""));
        assert_eq!(classify("   "), LineKind::Blank);
        assert_eq!(classify("  plain  "), LineKind::Text("plain"));
    }
}
