// src/api/parser.rs
//! Translation between Notion's JSON wire shapes and the domain model.
//!
//! Block wire shape: `{object: "block", id, type: <tag>, <tag>: {...}, has_children}`.
//! Any tag without a domain variant decodes to `Block::Unsupported`, keeping
//! its raw type name so the loss stays visible downstream.

use crate::constants::DEFAULT_CODE_LANGUAGE;
use crate::error::AppError;
use crate::model::*;
use crate::types::{concat_plain_text, rich_text_from_wire, rich_text_to_wire, NotionId};
use serde_json::{json, Value};

// --- Blocks ---

/// Decodes one block object. Children are never read from the payload;
/// they are attached by the tree fetcher.
pub fn decode_block(value: &Value) -> Result<Block, AppError> {
    let block_type = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::MalformedResponse("Block without 'type' field".to_string()))?;

    let id = match value.get("id").and_then(Value::as_str) {
        Some(raw) => Some(NotionId::parse(raw)?),
        None => None,
    };
    let common = BlockCommon {
        id,
        has_children: value
            .get("has_children")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        children: Vec::new(),
    };

    let payload = value.get(block_type).unwrap_or(&Value::Null);
    let content = TextBlockContent::new(rich_text_from_wire(payload.get("rich_text")));

    let block = match block_type {
        "paragraph" => Block::Paragraph(ParagraphBlock { common, content }),
        "heading_1" => Block::Heading1(Heading1Block { common, content }),
        "heading_2" => Block::Heading2(Heading2Block { common, content }),
        "heading_3" => Block::Heading3(Heading3Block { common, content }),
        "bulleted_list_item" => Block::BulletedListItem(BulletedListItemBlock { common, content }),
        "numbered_list_item" => Block::NumberedListItem(NumberedListItemBlock { common, content }),
        "to_do" => Block::ToDo(ToDoBlock {
            common,
            content,
            checked: payload
                .get("checked")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }),
        "quote" => Block::Quote(QuoteBlock { common, content }),
        "code" => Block::Code(CodeBlock {
            common,
            content,
            language: payload
                .get("language")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_CODE_LANGUAGE)
                .to_string(),
        }),
        "divider" => Block::Divider(DividerBlock { common }),
        "callout" => Block::Callout(CalloutBlock {
            common,
            content,
            icon: payload.get("icon").and_then(decode_icon),
        }),
        "toggle" => Block::Toggle(ToggleBlock { common, content }),
        "child_page" => Block::ChildPage(ChildPageBlock {
            common,
            title: payload
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }),
        other => {
            log::debug!("Block type '{}' has no Markdown mapping", other);
            Block::Unsupported(UnsupportedBlock {
                common,
                block_type: other.to_string(),
            })
        }
    };

    Ok(block)
}

fn decode_icon(icon: &Value) -> Option<Icon> {
    match icon.get("type").and_then(Value::as_str)? {
        "emoji" => icon
            .get("emoji")
            .and_then(Value::as_str)
            .map(|e| Icon::Emoji(e.to_string())),
        kind @ ("external" | "file") => icon
            .pointer(&format!("/{}/url", kind))
            .and_then(Value::as_str)
            .map(|url| Icon::External(url.to_string())),
        _ => None,
    }
}

/// Encodes a block for create/append requests, children included.
pub fn encode_block(block: &Block) -> Result<Value, AppError> {
    let tag = block.block_type().to_string();

    let mut payload = match block {
        Block::Divider(_) => json!({}),
        Block::ToDo(b) => json!({
            "rich_text": rich_text_to_wire(&b.content.rich_text),
            "checked": b.checked,
        }),
        Block::Code(b) => json!({
            "rich_text": rich_text_to_wire(&b.content.rich_text),
            "language": b.language,
        }),
        Block::Callout(b) => {
            let mut payload = json!({ "rich_text": rich_text_to_wire(&b.content.rich_text) });
            match &b.icon {
                Some(Icon::Emoji(emoji)) => {
                    payload["icon"] = json!({ "type": "emoji", "emoji": emoji });
                }
                Some(Icon::External(url)) => {
                    payload["icon"] = json!({ "type": "external", "external": { "url": url } });
                }
                None => {}
            }
            payload
        }
        Block::ChildPage(_) | Block::Unsupported(_) => {
            return Err(AppError::UnwritableBlock { block_type: tag });
        }
        other => {
            let spans = other.rich_text().unwrap_or_default();
            json!({ "rich_text": rich_text_to_wire(spans) })
        }
    };

    if !block.children().is_empty() {
        payload["children"] = Value::Array(
            block
                .children()
                .iter()
                .map(encode_block)
                .collect::<Result<Vec<_>, _>>()?,
        );
    }

    let mut wire = serde_json::Map::new();
    wire.insert("object".to_string(), json!("block"));
    wire.insert("type".to_string(), json!(tag));
    wire.insert(tag, payload);
    Ok(Value::Object(wire))
}

pub fn encode_blocks(blocks: &[Block]) -> Result<Vec<Value>, AppError> {
    blocks.iter().map(encode_block).collect()
}

// --- Pages and schemas ---

pub fn decode_parent(value: &Value) -> Option<Parent> {
    let id_at = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .and_then(|raw| NotionId::parse(raw).ok())
    };

    match value.get("type").and_then(Value::as_str)? {
        "page_id" => id_at("page_id").map(Parent::Page),
        "database_id" => id_at("database_id").map(Parent::Database),
        "block_id" => id_at("block_id").map(Parent::Block),
        "workspace" => Some(Parent::Workspace),
        _ => None,
    }
}

/// Decodes a page object: identity, parent, title and property schema.
pub fn decode_page(value: &Value) -> Result<Page, AppError> {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::MalformedResponse("Page without 'id' field".to_string()))?;
    let properties = value.get("properties").unwrap_or(&Value::Null);
    let schema = PropertySchema::from_wire(properties);

    let title = schema
        .title_property_name()
        .and_then(|name| properties.get(name))
        .map(|property| concat_plain_text(&rich_text_from_wire(property.get("title"))))
        .unwrap_or_default();

    Ok(Page {
        id: NotionId::parse(id)?,
        parent: value.get("parent").and_then(decode_parent),
        url: value.get("url").and_then(Value::as_str).map(str::to_string),
        title,
        schema,
        archived: value
            .get("archived")
            .or_else(|| value.get("in_trash"))
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

/// Decodes the property schema of a typed container.
pub fn decode_database_schema(value: &Value) -> Result<PropertySchema, AppError> {
    let properties = value.get("properties").ok_or_else(|| {
        AppError::MalformedResponse("Database without 'properties' field".to_string())
    })?;
    Ok(PropertySchema::from_wire(properties))
}
