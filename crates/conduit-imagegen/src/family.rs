//! Image model families
//!
//! Each family knows its own InvokeModel payload and response shape. Families
//! are matched against the model identifier in registration order, so adding
//! one never touches dispatch.

mod nova_canvas;
mod stable_diffusion;
mod titan;

use serde_json::Value;

pub use nova_canvas::NovaCanvas;
pub use stable_diffusion::StableDiffusion;
pub use titan::TitanImage;

/// Payload builder and response parser for one image model family
pub trait ImageFamily: Send + Sync {
    /// Family name for logs
    fn name(&self) -> &'static str;

    /// Whether this family serves `model_id`
    fn matches(&self, model_id: &str) -> bool;

    /// InvokeModel request body for `prompt` with caller overrides applied
    fn request_body(&self, prompt: &str, config: Option<&Value>) -> Value;

    /// Base64 images from a raw response body, in service order
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the body does not have the family's shape
    fn parse_images(&self, body: &[u8]) -> Result<Vec<String>, serde_json::Error>;
}

/// Ordered set of image families
pub struct ImageFamilies {
    families: Vec<Box<dyn ImageFamily>>,
}

impl Default for ImageFamilies {
    fn default() -> Self {
        Self::empty()
            .with(TitanImage)
            .with(StableDiffusion)
            .with(NovaCanvas)
    }
}

impl ImageFamilies {
    pub fn empty() -> Self {
        Self { families: Vec::new() }
    }

    #[must_use]
    pub fn with(mut self, family: impl ImageFamily + 'static) -> Self {
        self.families.push(Box::new(family));
        self
    }

    /// First family matching `model_id`
    pub fn resolve(&self, model_id: &str) -> Option<&dyn ImageFamily> {
        self.families
            .iter()
            .find(|family| family.matches(model_id))
            .map(|family| &**family)
    }
}
