// src/formatting/normalize.rs
//! Whitespace normalization for rendered documents.

/// Length of the backtick run opening a fenced code line, if any.
pub(crate) fn fence_length(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let run = trimmed.chars().take_while(|&c| c == '`').count();
    (run >= 3).then_some(run)
}

/// Trims trailing whitespace, collapses runs of blank lines into a single
/// blank line and ends the document with exactly one newline.
///
/// Lines inside fenced code are left exactly as written.
pub fn normalize_whitespace(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + 1);
    let mut open_fence: Option<usize> = None;
    let mut pending_blank = false;

    for line in text.lines() {
        if let Some(open) = open_fence {
            output.push_str(line);
            output.push('\n');
            if fence_length(line).is_some_and(|len| len >= open) && is_bare_fence(line) {
                open_fence = None;
            }
            continue;
        }

        let line = line.trim_end();
        if line.is_empty() {
            pending_blank = !output.is_empty();
            continue;
        }

        if pending_blank {
            output.push('\n');
            pending_blank = false;
        }
        output.push_str(line);
        output.push('\n');
        open_fence = fence_length(line);
    }

    output
}

fn is_bare_fence(line: &str) -> bool {
    line.trim().chars().all(|c| c == '`')
}
