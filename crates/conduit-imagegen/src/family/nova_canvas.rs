use serde_json::{Value, json};

use super::ImageFamily;
use super::titan::{ImagesResponse, default_generation_config, text_image_body};

/// Amazon Nova Canvas
///
/// Same task body as Titan Image Generator, with an explicit quality.
pub struct NovaCanvas;

impl ImageFamily for NovaCanvas {
    fn name(&self) -> &'static str {
        "nova-canvas"
    }

    fn matches(&self, model_id: &str) -> bool {
        model_id.contains("nova-canvas")
    }

    fn request_body(&self, prompt: &str, config: Option<&Value>) -> Value {
        let mut generation = default_generation_config();
        generation.insert("quality".to_owned(), json!("standard"));
        text_image_body(prompt, generation, config)
    }

    fn parse_images(&self, body: &[u8]) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_slice::<ImagesResponse>(body).map(|response| response.images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_quality() {
        let body = NovaCanvas.request_body("mountains", None);
        assert_eq!(body["imageGenerationConfig"]["quality"], "standard");
        assert_eq!(body["imageGenerationConfig"]["cfgScale"], 8.0);
    }

    #[test]
    fn quality_can_be_overridden() {
        let config = json!({"imageGenerationConfig": {"quality": "premium"}});
        let body = NovaCanvas.request_body("mountains", Some(&config));
        assert_eq!(body["imageGenerationConfig"]["quality"], "premium");
    }
}
