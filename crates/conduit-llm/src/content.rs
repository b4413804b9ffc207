//! Mapping between message parts and wire content blocks

use aws_sdk_bedrockruntime::types::{
    CachePointBlock, CachePointType, ContentBlock, ImageBlock, ImageFormat, ImageSource, ToolResultBlock,
    ToolResultContentBlock, ToolResultStatus, ToolUseBlock,
};
use aws_smithy_types::Blob;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use conduit_core::document::{document_to_object, value_to_document};
use conduit_core::{Error, Media, Part, ToolRequest, ToolResponse};
use serde_json::{Value, json};

use crate::schema::ToolSchemas;

/// Convert one outbound part into a wire content block
///
/// Parts with no wire counterpart yield `None` and are dropped by the caller.
///
/// # Errors
///
/// Returns `Error::InvalidRequest` if a wire block cannot be assembled
pub fn to_wire_block(part: &Part) -> Result<Option<ContentBlock>, Error> {
    let block = match part {
        Part::Text(text) => ContentBlock::Text(text.clone()),
        Part::Media(media) => ContentBlock::Image(image_block(media)?),
        Part::ToolRequest(request) => ContentBlock::ToolUse(tool_use_block(request)?),
        Part::ToolResponse(response) => ContentBlock::ToolResult(tool_result_block(response)?),
        Part::CachePoint => ContentBlock::CachePoint(cache_point()?),
        _ => {
            tracing::warn!("dropping message part with no wire representation");
            return Ok(None);
        }
    };

    Ok(Some(block))
}

/// Convert one inbound wire content block into a part
///
/// Tool-use input is coerced against the matching tool's schema. Blocks other
/// than text and tool use yield `None`.
pub fn to_part(block: &ContentBlock, tools: &ToolSchemas) -> Option<Part> {
    match block {
        ContentBlock::Text(text) => Some(Part::text(text.as_str())),
        ContentBlock::ToolUse(tool_use) => Some(tool_request_part(tool_use, tools)),
        _ => {
            tracing::debug!("ignoring unsupported content block in model output");
            None
        }
    }
}

/// Wire image format for a MIME type, PNG when unrecognized
pub fn image_format(content_type: Option<&str>) -> ImageFormat {
    match content_type {
        Some("image/png") => ImageFormat::Png,
        Some("image/jpeg" | "image/jpg") => ImageFormat::Jpeg,
        Some("image/gif") => ImageFormat::Gif,
        Some("image/webp") => ImageFormat::Webp,
        other => {
            tracing::debug!(content_type = ?other, "unrecognized image type, sending as png");
            ImageFormat::Png
        }
    }
}

fn image_block(media: &Media) -> Result<ImageBlock, Error> {
    let (content_type, payload) = media.payload();

    // Not base64 after all: send the payload as-is
    let bytes = STANDARD
        .decode(payload)
        .unwrap_or_else(|_| payload.as_bytes().to_vec());

    ImageBlock::builder()
        .format(image_format(content_type))
        .source(ImageSource::Bytes(Blob::new(bytes)))
        .build()
        .map_err(|e| Error::InvalidRequest(format!("invalid image block: {e}")))
}

fn tool_use_block(request: &ToolRequest) -> Result<ToolUseBlock, Error> {
    ToolUseBlock::builder()
        .tool_use_id(&request.ref_id)
        .name(&request.name)
        .input(value_to_document(&request.input))
        .build()
        .map_err(|e| Error::InvalidRequest(format!("invalid tool use block for '{}': {e}", request.name)))
}

fn tool_result_block(response: &ToolResponse) -> Result<ToolResultBlock, Error> {
    let content = match &response.output {
        Value::Null => Vec::new(),
        output => vec![ToolResultContentBlock::Text(tool_output_text(output))],
    };

    ToolResultBlock::builder()
        .tool_use_id(&response.ref_id)
        .set_content(Some(content))
        .status(ToolResultStatus::Success)
        .build()
        .map_err(|e| Error::InvalidRequest(format!("invalid tool result block for '{}': {e}", response.name)))
}

fn tool_output_text(output: &Value) -> String {
    match output {
        Value::String(text) => text.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| other.to_string()),
    }
}

pub(crate) fn cache_point() -> Result<CachePointBlock, Error> {
    CachePointBlock::builder()
        .r#type(CachePointType::Default)
        .build()
        .map_err(|e| Error::InvalidRequest(format!("invalid cache point block: {e}")))
}

fn tool_request_part(tool_use: &ToolUseBlock, tools: &ToolSchemas) -> Part {
    let name = tool_use.name();
    let ref_id = tool_use.tool_use_id();

    let input = match document_to_object(tool_use.input()) {
        Ok(fields) => tools.coerce_input(name, fields),
        Err(e) => {
            tracing::warn!(tool = %name, tool_use_id = %ref_id, error = %e, "failed to decode tool input");
            decode_placeholder(&e, ref_id)
        }
    };

    Part::tool_request(name, input, ref_id)
}

/// Stand-in arguments for tool input that could not be decoded
pub(crate) fn decode_placeholder(error: &str, tool_use_id: &str) -> Value {
    json!({
        "_unmarshal_error": error,
        "_tool_use_id": tool_use_id,
    })
}

#[cfg(test)]
mod tests {
    use aws_smithy_types::Document;
    use conduit_core::document::document_to_value;

    use super::*;

    const PIXEL: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn image(part: Part) -> ImageBlock {
        match to_wire_block(&part).unwrap() {
            Some(ContentBlock::Image(block)) => block,
            other => panic!("expected image block, got {other:?}"),
        }
    }

    #[test]
    fn text_round_trips() {
        let part = Part::text("héllo, world");
        let block = to_wire_block(&part).unwrap().unwrap();
        assert_eq!(to_part(&block, &ToolSchemas::default()), Some(part));
    }

    #[test]
    fn jpeg_data_url() {
        let block = image(Part::Media(Media {
            content_type: None,
            url: format!("data:image/jpeg;base64,{PIXEL}"),
        }));
        assert_eq!(block.format(), &ImageFormat::Jpeg);

        let Some(ImageSource::Bytes(bytes)) = block.source() else {
            panic!("expected inline bytes");
        };
        assert_eq!(bytes.as_ref(), STANDARD.decode(PIXEL).unwrap().as_slice());
    }

    #[test]
    fn unknown_mime_defaults_to_png() {
        let block = image(Part::media("image/tiff", format!("data:image/tiff;base64,{PIXEL}")));
        assert_eq!(block.format(), &ImageFormat::Png);
    }

    #[test]
    fn mime_table() {
        assert_eq!(image_format(Some("image/jpg")), ImageFormat::Jpeg);
        assert_eq!(image_format(Some("image/gif")), ImageFormat::Gif);
        assert_eq!(image_format(Some("image/webp")), ImageFormat::Webp);
        assert_eq!(image_format(None), ImageFormat::Png);
    }

    #[test]
    fn undecodable_payload_sent_raw() {
        let block = image(Part::media("image/png", "not base64!"));
        let Some(ImageSource::Bytes(bytes)) = block.source() else {
            panic!("expected inline bytes");
        };
        assert_eq!(bytes.as_ref(), b"not base64!");
    }

    #[test]
    fn tool_request_maps_to_tool_use() {
        let part = Part::tool_request("lookup", json!({"q": "rust", "limit": 3}), "call-1");
        let Some(ContentBlock::ToolUse(block)) = to_wire_block(&part).unwrap() else {
            panic!("expected tool use block");
        };
        assert_eq!(block.name(), "lookup");
        assert_eq!(block.tool_use_id(), "call-1");
        assert_eq!(document_to_value(block.input()), json!({"q": "rust", "limit": 3}));
    }

    #[test]
    fn tool_response_output_serialized() {
        let cases = [
            (json!("plain text"), "plain text"),
            (json!({"temp": 21}), r#"{"temp":21}"#),
            (json!([1, 2]), "[1,2]"),
        ];

        for (output, expected) in cases {
            let part = Part::tool_response("weather", output, "call-9");
            let Some(ContentBlock::ToolResult(block)) = to_wire_block(&part).unwrap() else {
                panic!("expected tool result block");
            };
            assert_eq!(block.tool_use_id(), "call-9");
            assert_eq!(block.status(), Some(&ToolResultStatus::Success));
            assert_eq!(block.content(), [ToolResultContentBlock::Text(expected.to_owned())]);
        }
    }

    #[test]
    fn cache_point_maps_to_block() {
        let block = to_wire_block(&Part::CachePoint).unwrap().unwrap();
        assert!(matches!(block, ContentBlock::CachePoint(_)));
    }

    #[test]
    fn inbound_tool_use_without_schema_is_raw() {
        let block = ContentBlock::ToolUse(
            ToolUseBlock::builder()
                .tool_use_id("t-1")
                .name("unknown_tool")
                .input(value_to_document(&json!({"n": "5"})))
                .build()
                .unwrap(),
        );

        let Some(Part::ToolRequest(request)) = to_part(&block, &ToolSchemas::default()) else {
            panic!("expected tool request");
        };
        assert_eq!(request.input, json!({"n": "5"}));
        assert_eq!(request.ref_id, "t-1");
    }

    #[test]
    fn inbound_tool_use_with_scalar_input_yields_placeholder() {
        let block = ContentBlock::ToolUse(
            ToolUseBlock::builder()
                .tool_use_id("t-2")
                .name("lookup")
                .input(Document::String("oops".to_owned()))
                .build()
                .unwrap(),
        );

        let Some(Part::ToolRequest(request)) = to_part(&block, &ToolSchemas::default()) else {
            panic!("expected tool request");
        };
        assert_eq!(request.input["_tool_use_id"], "t-2");
        assert!(request.input["_unmarshal_error"].as_str().unwrap().contains("string"));
    }
}
