//! Decoding of tool result fragments into renderable items.
//!
//! A result fragment is a base64 blob whose decoded text is usually JSON in
//! one of the shapes MCP tool calls produce: a single content item, a
//! `content` array of items, or arbitrary structured output. Servers in the
//! wild also emit plain text, truncated blobs, and outright garbage, so the
//! decode path is a chain of fallbacks that always produces something
//! displayable and never errors.

use crate::utils::encoding::safe_base64_decode;
use serde_json::Value;

/// One renderable piece of a tool result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolResultItem {
    /// An inline image. `data` is a `data:` URI, synthesized from the raw
    /// base64 payload and `mime_type` when the server sent a bare blob.
    Image { data: String, mime_type: String },

    /// A text block; JSON payloads arrive pretty-printed.
    Text { text: String },
}

/// Classification of a successfully parsed result payload.
enum ResultShape {
    /// The payload is itself a single tagged content item.
    Item(Value),

    /// The payload wraps its items in a `content` array.
    ContentList(Vec<Value>),

    /// Valid JSON in no recognized shape; shown as formatted JSON.
    Other(Value),
}

fn classify(value: Value) -> ResultShape {
    match value.get("type").and_then(Value::as_str) {
        Some("image") | Some("text") => ResultShape::Item(value),
        _ => match value.get("content").and_then(Value::as_array) {
            Some(items) => ResultShape::ContentList(items.clone()),
            None => ResultShape::Other(value),
        },
    }
}

/// Decode one result fragment into renderable items.
///
/// Fallback layers, tried in order:
/// 1. base64-decode the fragment; failure means the fragment is already
///    text.
/// 2. parse the decoded text as JSON and classify its shape.
/// 3. on a parse failure, best-effort pretty-print; worst case the literal
///    decoded text is emitted as a single text block.
pub fn decode_result(fragment: &str) -> Vec<ToolResultItem> {
    let decoded = safe_base64_decode(fragment);

    match serde_json::from_str::<Value>(decoded.trim()) {
        Ok(value) => match classify(value) {
            ResultShape::Item(item) => item_from_value(&item).into_iter().collect(),
            ResultShape::ContentList(items) => {
                items.iter().filter_map(item_from_value).collect()
            }
            ResultShape::Other(value) => vec![ToolResultItem::Text {
                text: pretty_value(&value),
            }],
        },
        Err(_) => vec![ToolResultItem::Text {
            text: format_json(&decoded),
        }],
    }
}

/// Decode the calls payload of a tool segment for display.
pub fn decode_calls(payload: &str) -> String {
    format_json(&safe_base64_decode(payload))
}

/// Build one item from a tagged content value.
///
/// Items with an unrecognized tag, or missing their required fields, yield
/// `None`; that is a normal outcome, not an error.
fn item_from_value(value: &Value) -> Option<ToolResultItem> {
    match value.get("type").and_then(Value::as_str) {
        Some("image") => {
            let data = non_empty_str(value.get("data"))?;
            let mime_type = non_empty_str(value.get("mimeType"))?;
            let data = if data.starts_with("data:") {
                data.to_string()
            } else {
                format!("data:{};base64,{}", mime_type, data)
            };
            Some(ToolResultItem::Image {
                data,
                mime_type: mime_type.to_string(),
            })
        }
        Some("text") => {
            let text = non_empty_str(value.get("text"))?;
            Some(ToolResultItem::Text {
                text: format_json(text),
            })
        }
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Pretty-print `text` as JSON when it parses; otherwise return it as-is.
fn format_json(text: &str) -> String {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(value) => pretty_value(&value),
        Err(_) => text.to_string(),
    }
}

fn pretty_value(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::prelude::BASE64_STANDARD;
    use base64::Engine;

    fn encode(text: &str) -> String {
        BASE64_STANDARD.encode(text.as_bytes())
    }

    #[test]
    fn single_text_item_decodes() {
        let items = decode_result(&encode(r#"{"type":"text","text":"hello"}"#));
        assert_eq!(
            items,
            vec![ToolResultItem::Text {
                text: "hello".to_string()
            }]
        );
    }

    #[test]
    fn text_item_with_json_payload_is_pretty_printed() {
        let items = decode_result(&encode(r#"{"type":"text","text":"{\"a\":1}"}"#));
        let ToolResultItem::Text { text } = &items[0] else {
            panic!("expected text item");
        };
        assert_eq!(text, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn image_item_synthesizes_data_uri() {
        let items = decode_result(&encode(
            r#"{"type":"image","data":"QUJD","mimeType":"image/png"}"#,
        ));
        assert_eq!(
            items,
            vec![ToolResultItem::Image {
                data: "data:image/png;base64,QUJD".to_string(),
                mime_type: "image/png".to_string(),
            }]
        );
    }

    #[test]
    fn image_item_keeps_existing_data_uri() {
        let items = decode_result(&encode(
            r#"{"type":"image","data":"data:image/png;base64,QUJD","mimeType":"image/png"}"#,
        ));
        let ToolResultItem::Image { data, .. } = &items[0] else {
            panic!("expected image item");
        };
        assert_eq!(data, "data:image/png;base64,QUJD");
    }

    #[test]
    fn image_without_mime_type_emits_nothing() {
        let items = decode_result(&encode(r#"{"type":"image","data":"QUJD"}"#));
        assert!(items.is_empty());
    }

    #[test]
    fn content_array_emits_one_item_per_element() {
        let payload = r#"{"content":[
            {"type":"text","text":"first"},
            {"type":"audio","data":"ignored"},
            {"type":"text","text":"second"}
        ]}"#;
        let items = decode_result(&encode(payload));
        assert_eq!(
            items,
            vec![
                ToolResultItem::Text {
                    text: "first".to_string()
                },
                ToolResultItem::Text {
                    text: "second".to_string()
                },
            ]
        );
    }

    #[test]
    fn unrecognized_json_shape_is_pretty_printed() {
        let items = decode_result(&encode(r#"{"rows":[1,2]}"#));
        assert_eq!(
            items,
            vec![ToolResultItem::Text {
                text: "{\n  \"rows\": [\n    1,\n    2\n  ]\n}".to_string()
            }]
        );
    }

    #[test]
    fn malformed_base64_falls_back_to_literal_text() {
        let items = decode_result("definitely not base64 {{{");
        assert_eq!(
            items,
            vec![ToolResultItem::Text {
                text: "definitely not base64 {{{".to_string()
            }]
        );
    }

    #[test]
    fn decoded_non_json_text_is_emitted_literally() {
        let items = decode_result(&encode("plain words, no JSON"));
        assert_eq!(
            items,
            vec![ToolResultItem::Text {
                text: "plain words, no JSON".to_string()
            }]
        );
    }

    #[test]
    fn decoded_json_text_without_shape_markers_is_formatted() {
        // Valid base64 of valid JSON that is neither a tagged item nor a
        // content list: shown as formatted JSON.
        let items = decode_result(&encode("[1, 2, 3]"));
        assert_eq!(
            items,
            vec![ToolResultItem::Text {
                text: "[\n  1,\n  2,\n  3\n]".to_string()
            }]
        );
    }

    #[test]
    fn decode_calls_formats_the_payload() {
        assert_eq!(
            decode_calls(&encode(r#"{"tool":"search","args":{}}"#)),
            "{\n  \"tool\": \"search\",\n  \"args\": {}\n}"
        );
        // Non-JSON calls payloads come through as-is.
        assert_eq!(decode_calls("???"), "???");
    }
}
