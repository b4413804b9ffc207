//! Static capability tables for Bedrock models
//!
//! Membership is by exact model identifier. A model missing from a table
//! does not support that feature.

use conduit_core::{ModelInfo, ModelSupports};

/// What kind of model an identifier refers to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ModelType {
    #[default]
    Chat,
    Text,
    Image,
    Embedding,
}

/// Models that accept tool definitions
pub const TOOL_MODELS: &[&str] = &[
    "anthropic.claude-3-haiku-20240307-v1:0",
    "anthropic.claude-3-sonnet-20240229-v1:0",
    "anthropic.claude-3-opus-20240229-v1:0",
    "anthropic.claude-3-5-haiku-20241022-v1:0",
    "anthropic.claude-3-5-sonnet-20240620-v1:0",
    "anthropic.claude-3-5-sonnet-20241022-v2:0",
    "anthropic.claude-3-7-sonnet-20250219-v1:0",
    "anthropic.claude-opus-4-20250514-v1:0",
    "anthropic.claude-sonnet-4-20250514-v1:0",
    "amazon.nova-micro-v1:0",
    "amazon.nova-lite-v1:0",
    "amazon.nova-pro-v1:0",
    "amazon.nova-premier-v1:0",
    "cohere.command-r-v1:0",
    "cohere.command-r-plus-v1:0",
    "mistral.mistral-large-2402-v1:0",
    "mistral.mistral-large-2407-v1:0",
    "mistral.mistral-small-2402-v1:0",
    "mistral.pixtral-large-2502-v1:0",
    "ai21.jamba-1-5-large-v1:0",
    "ai21.jamba-1-5-mini-v1:0",
    "meta.llama3-8b-instruct-v1:0",
    "meta.llama3-70b-instruct-v1:0",
    "meta.llama3-1-8b-instruct-v1:0",
    "meta.llama3-1-70b-instruct-v1:0",
    "meta.llama3-1-405b-instruct-v1:0",
    "meta.llama3-2-1b-instruct-v1:0",
    "meta.llama3-2-3b-instruct-v1:0",
    "meta.llama3-2-11b-instruct-v1:0",
    "meta.llama3-2-90b-instruct-v1:0",
    "meta.llama3-3-70b-instruct-v1:0",
    "meta.llama4-maverick-17b-instruct-v1:0",
    "meta.llama4-scout-17b-instruct-v1:0",
    "deepseek.r1-v1:0",
    "writer.palmyra-x4-v1:0",
    "writer.palmyra-x5-v1:0",
    "twelvelabs.pegasus-1-2-v1:0",
];

/// Models that accept image input
pub const MULTIMODAL_MODELS: &[&str] = &[
    "anthropic.claude-3-haiku-20240307-v1:0",
    "anthropic.claude-3-sonnet-20240229-v1:0",
    "anthropic.claude-3-opus-20240229-v1:0",
    "anthropic.claude-3-5-sonnet-20240620-v1:0",
    "anthropic.claude-3-5-sonnet-20241022-v2:0",
    "anthropic.claude-3-7-sonnet-20250219-v1:0",
    "anthropic.claude-opus-4-20250514-v1:0",
    "anthropic.claude-sonnet-4-20250514-v1:0",
    "amazon.nova-lite-v1:0",
    "amazon.nova-pro-v1:0",
    "amazon.nova-premier-v1:0",
    "meta.llama3-2-11b-instruct-v1:0",
    "meta.llama3-2-90b-instruct-v1:0",
    "meta.llama4-maverick-17b-instruct-v1:0",
    "meta.llama4-scout-17b-instruct-v1:0",
    "mistral.pixtral-large-2502-v1:0",
];

/// Infer metadata for `model` of the given type
///
/// Image models produce media but take a single prompt; embedding models
/// support nothing; chat and text models consult the tables.
pub fn infer(model: &str, model_type: ModelType) -> ModelInfo {
    let supports = match model_type {
        ModelType::Image => ModelSupports {
            media: true,
            ..ModelSupports::default()
        },
        ModelType::Embedding => ModelSupports::default(),
        ModelType::Chat | ModelType::Text => ModelSupports {
            multiturn: true,
            tools: TOOL_MODELS.contains(&model),
            system_role: true,
            media: MULTIMODAL_MODELS.contains(&model),
        },
    };

    ModelInfo {
        label: model.to_owned(),
        supports,
        versions: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn chat_model_in_both_tables() {
        let info = infer("anthropic.claude-3-haiku-20240307-v1:0", ModelType::Chat);
        assert_eq!(
            info.supports,
            ModelSupports {
                multiturn: true,
                tools: true,
                system_role: true,
                media: true,
            }
        );
        assert_eq!(info.label, "anthropic.claude-3-haiku-20240307-v1:0");
    }

    #[test]
    fn tool_only_model() {
        let supports = infer("amazon.nova-micro-v1:0", ModelType::Text).supports;
        assert!(supports.tools);
        assert!(!supports.media);
    }

    #[test]
    fn membership_is_exact() {
        let supports = infer("anthropic.claude-3-haiku", ModelType::Chat).supports;
        assert!(supports.multiturn);
        assert!(supports.system_role);
        assert!(!supports.tools);
        assert!(!supports.media);
    }

    #[test]
    fn image_and_embedding_ignore_tables() {
        let image = infer("amazon.nova-pro-v1:0", ModelType::Image).supports;
        assert_eq!(
            image,
            ModelSupports {
                media: true,
                ..ModelSupports::default()
            }
        );

        let embedding = infer("amazon.titan-embed-text-v1", ModelType::Embedding).supports;
        assert_eq!(embedding, ModelSupports::default());
    }

    #[test]
    fn model_type_parses() {
        assert_eq!(ModelType::from_str("image").unwrap(), ModelType::Image);
        assert_eq!(ModelType::from_str("Embedding").unwrap(), ModelType::Embedding);
        assert_eq!(ModelType::Text.to_string(), "text");
        assert!(ModelType::from_str("audio").is_err());
    }
}
