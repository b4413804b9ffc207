use conduit_core::document::merge_shallow;
use serde::Deserialize;
use serde_json::{Value, json};

use super::ImageFamily;

/// Stability AI Stable Diffusion and Stable Image models
pub struct StableDiffusion;

#[derive(Debug, Deserialize)]
struct ArtifactsResponse {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    base64: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

impl ImageFamily for StableDiffusion {
    fn name(&self) -> &'static str {
        "stable-diffusion"
    }

    fn matches(&self, model_id: &str) -> bool {
        ["stable-diffusion", "sd3-", "stable-image"]
            .iter()
            .any(|marker| model_id.contains(marker))
    }

    /// Overrides are merged at the top level
    fn request_body(&self, prompt: &str, config: Option<&Value>) -> Value {
        let mut body = json!({
            "text_prompts": [{ "text": prompt, "weight": 1.0 }],
            "cfg_scale": 7,
            "clip_guidance_preset": "FAST_BLUE",
            "height": 512,
            "width": 512,
            "samples": 1,
            "steps": 30,
        });

        if let (Some(target), Some(overrides)) = (body.as_object_mut(), config) {
            merge_shallow(target, overrides);
        }

        body
    }

    fn parse_images(&self, body: &[u8]) -> Result<Vec<String>, serde_json::Error> {
        let response: ArtifactsResponse = serde_json::from_slice(body)?;
        Ok(response
            .artifacts
            .into_iter()
            .map(|artifact| {
                if let Some(reason) = artifact.finish_reason.as_deref().filter(|r| *r != "SUCCESS") {
                    tracing::debug!(finish_reason = %reason, "stable diffusion artifact finished abnormally");
                }
                artifact.base64
            })
            .collect())
    }
}
