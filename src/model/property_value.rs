use crate::types::{rich_text_to_wire, NotionId, RichTextItem};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A date or date range as the API accepts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl DateRange {
    pub fn starting(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: None,
            time_zone: None,
        }
    }
}

/// A typed payload for one writable property.
///
/// `None` variants clear the value remotely; computed property types have
/// no variant here.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Title(Vec<RichTextItem>),
    RichText(Vec<RichTextItem>),
    Select(Option<String>),
    Status(Option<String>),
    MultiSelect(Vec<String>),
    People(Vec<NotionId>),
    Relation(Vec<NotionId>),
    Date(Option<DateRange>),
    Checkbox(bool),
    Number(Option<f64>),
    Url(Option<String>),
    Email(Option<String>),
    PhoneNumber(Option<String>),
}

impl PropertyValue {
    /// Returns the Notion API type name for this property value.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Title(_) => "title",
            PropertyValue::RichText(_) => "rich_text",
            PropertyValue::Select(_) => "select",
            PropertyValue::Status(_) => "status",
            PropertyValue::MultiSelect(_) => "multi_select",
            PropertyValue::People(_) => "people",
            PropertyValue::Relation(_) => "relation",
            PropertyValue::Date(_) => "date",
            PropertyValue::Checkbox(_) => "checkbox",
            PropertyValue::Number(_) => "number",
            PropertyValue::Url(_) => "url",
            PropertyValue::Email(_) => "email",
            PropertyValue::PhoneNumber(_) => "phone_number",
        }
    }

    /// Encodes as `{<type>: <payload>}`.
    pub fn to_wire(&self) -> Value {
        let payload = match self {
            PropertyValue::Title(spans) | PropertyValue::RichText(spans) => {
                rich_text_to_wire(spans)
            }
            PropertyValue::Select(name) | PropertyValue::Status(name) => name
                .as_ref()
                .map(|name| json!({ "name": name }))
                .unwrap_or(Value::Null),
            PropertyValue::MultiSelect(names) => {
                Value::Array(names.iter().map(|name| json!({ "name": name })).collect())
            }
            PropertyValue::People(ids) => Value::Array(
                ids.iter()
                    .map(|id| json!({ "object": "user", "id": id.as_str() }))
                    .collect(),
            ),
            PropertyValue::Relation(ids) => Value::Array(
                ids.iter().map(|id| json!({ "id": id.as_str() })).collect(),
            ),
            PropertyValue::Date(range) => json!(range),
            PropertyValue::Checkbox(checked) => json!(checked),
            PropertyValue::Number(number) => json!(number),
            PropertyValue::Url(text) | PropertyValue::Email(text) | PropertyValue::PhoneNumber(text) => {
                json!(text)
            }
        };

        let mut wire = serde_json::Map::new();
        wire.insert(self.type_name().to_string(), payload);
        Value::Object(wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearing_values_encode_as_null() {
        assert_eq!(PropertyValue::Select(None).to_wire(), json!({ "select": null }));
        assert_eq!(PropertyValue::Url(None).to_wire(), json!({ "url": null }));
        assert_eq!(PropertyValue::Date(None).to_wire(), json!({ "date": null }));
    }

    #[test]
    fn list_values_encode_their_element_shape() {
        let tags = PropertyValue::MultiSelect(vec!["a".into(), "b".into()]);
        assert_eq!(
            tags.to_wire(),
            json!({ "multi_select": [{ "name": "a" }, { "name": "b" }] })
        );

        let id = NotionId::parse("a07589e357414b3285a8d02beb8fd9dd").unwrap();
        assert_eq!(
            PropertyValue::Relation(vec![id.clone()]).to_wire(),
            json!({ "relation": [{ "id": "a07589e3-5741-4b32-85a8-d02beb8fd9dd" }] })
        );
        assert_eq!(
            PropertyValue::People(vec![id]).to_wire(),
            json!({ "people": [{ "object": "user", "id": "a07589e3-5741-4b32-85a8-d02beb8fd9dd" }] })
        );
    }

    #[test]
    fn date_ranges_skip_absent_fields() {
        let date = PropertyValue::Date(Some(DateRange::starting("2024-05-01")));
        assert_eq!(date.to_wire(), json!({ "date": { "start": "2024-05-01" } }));
    }
}
