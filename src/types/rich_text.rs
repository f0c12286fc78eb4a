use crate::constants::RICH_TEXT_SPAN_LIMIT;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Formatting flags carried by a rich text span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

impl Annotations {
    /// True when no formatting flag is set.
    pub fn is_plain(&self) -> bool {
        !(self.bold || self.italic || self.strikethrough || self.underline || self.code)
    }
}

/// A run of text sharing one annotation set and optional link.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RichTextItem {
    pub plain_text: String,
    pub annotations: Annotations,
    pub link: Option<String>,
}

impl RichTextItem {
    /// A span with no annotations or link.
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    /// Decodes one span from the API wire shape.
    ///
    /// `plain_text` is present on every span kind (text, mention, equation),
    /// so mentions survive as their visible text.
    pub fn from_wire(value: &Value) -> Self {
        let plain_text = value
            .get("plain_text")
            .and_then(Value::as_str)
            .or_else(|| value.pointer("/text/content").and_then(Value::as_str))
            .unwrap_or_default()
            .to_string();

        let annotations = value
            .get("annotations")
            .and_then(|a| serde_json::from_value(a.clone()).ok())
            .unwrap_or_default();

        let link = value
            .pointer("/text/link/url")
            .or_else(|| value.get("href"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            plain_text,
            annotations,
            link,
        }
    }

    /// Encodes this span as a `text` rich text object.
    pub fn to_wire(&self) -> Value {
        let link = self.link.as_ref().map(|url| json!({ "url": url }));
        let mut span = json!({
            "type": "text",
            "text": { "content": self.plain_text, "link": link },
        });
        if !self.annotations.is_plain() {
            span["annotations"] = json!(self.annotations);
        }
        span
    }
}

/// Splits text into consecutive plain spans no longer than the remote
/// per-span limit. Nothing is truncated; only the last span may be shorter.
pub fn split_into_spans(text: &str) -> Vec<RichTextItem> {
    split_into_spans_with_limit(text, RICH_TEXT_SPAN_LIMIT)
}

pub fn split_into_spans_with_limit(text: &str, limit: usize) -> Vec<RichTextItem> {
    if text.is_empty() || limit == 0 {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(limit)
        .map(|chunk| RichTextItem::plain_text(chunk.iter().collect::<String>()))
        .collect()
}

/// Concatenates the visible text of a span sequence.
pub fn concat_plain_text(items: &[RichTextItem]) -> String {
    items.iter().map(|item| item.plain_text.as_str()).collect()
}

pub fn rich_text_from_wire(value: Option<&Value>) -> Vec<RichTextItem> {
    value
        .and_then(Value::as_array)
        .map(|spans| spans.iter().map(RichTextItem::from_wire).collect())
        .unwrap_or_default()
}

pub fn rich_text_to_wire(items: &[RichTextItem]) -> Value {
    Value::Array(items.iter().map(RichTextItem::to_wire).collect())
}
