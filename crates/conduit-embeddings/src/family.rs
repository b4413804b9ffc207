//! Embedding model families

mod cohere;
mod titan;

use serde_json::Value;

pub use cohere::CohereEmbed;
pub use titan::TitanEmbed;

/// Payload builder and response parser for one embedding model family
pub trait EmbeddingFamily: Send + Sync {
    /// Family name for logs
    fn name(&self) -> &'static str;

    /// Whether this family serves `model_id`
    fn matches(&self, model_id: &str) -> bool;

    /// InvokeModel request body embedding a single `text`
    fn request_body(&self, text: &str) -> Value;

    /// The embedding vector from a raw response body, empty if none came back
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the body does not have the family's shape
    fn parse_embedding(&self, body: &[u8]) -> Result<Vec<f32>, serde_json::Error>;
}

/// Ordered set of embedding families
pub struct EmbeddingFamilies {
    families: Vec<Box<dyn EmbeddingFamily>>,
}

impl Default for EmbeddingFamilies {
    fn default() -> Self {
        Self::empty().with(TitanEmbed).with(CohereEmbed)
    }
}

impl EmbeddingFamilies {
    pub fn empty() -> Self {
        Self { families: Vec::new() }
    }

    #[must_use]
    pub fn with(mut self, family: impl EmbeddingFamily + 'static) -> Self {
        self.families.push(Box::new(family));
        self
    }

    /// First family matching `model_id`
    pub fn resolve(&self, model_id: &str) -> Option<&dyn EmbeddingFamily> {
        self.families
            .iter()
            .find(|family| family.matches(model_id))
            .map(|family| &**family)
    }
}
