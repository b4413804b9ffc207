use conduit_core::document::merge_shallow;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::ImageFamily;

/// Amazon Titan Image Generator
pub struct TitanImage;

#[derive(Debug, Deserialize)]
pub(super) struct ImagesResponse {
    #[serde(default)]
    pub images: Vec<String>,
}

/// `TEXT_IMAGE` task body shared by the Amazon image models
///
/// Only the `imageGenerationConfig` object of `config` is merged, key by key.
pub(super) fn text_image_body(prompt: &str, mut generation: Map<String, Value>, config: Option<&Value>) -> Value {
    if let Some(overrides) = config.and_then(|c| c.get("imageGenerationConfig")) {
        merge_shallow(&mut generation, overrides);
    }

    json!({
        "taskType": "TEXT_IMAGE",
        "textToImageParams": { "text": prompt },
        "imageGenerationConfig": generation,
    })
}

pub(super) fn default_generation_config() -> Map<String, Value> {
    let mut generation = Map::new();
    generation.insert("numberOfImages".to_owned(), json!(1));
    generation.insert("height".to_owned(), json!(1024));
    generation.insert("width".to_owned(), json!(1024));
    generation.insert("cfgScale".to_owned(), json!(8.0));
    generation.insert("seed".to_owned(), json!(0));
    generation
}

impl ImageFamily for TitanImage {
    fn name(&self) -> &'static str {
        "titan-image"
    }

    fn matches(&self, model_id: &str) -> bool {
        model_id.contains("titan-image")
    }

    fn request_body(&self, prompt: &str, config: Option<&Value>) -> Value {
        text_image_body(prompt, default_generation_config(), config)
    }

    fn parse_images(&self, body: &[u8]) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_slice::<ImagesResponse>(body).map(|response| response.images)
    }
}
