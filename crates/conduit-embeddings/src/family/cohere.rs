use serde::Deserialize;
use serde_json::{Value, json};

use super::EmbeddingFamily;

/// Cohere Embed models, always embedding as search documents
pub struct CohereEmbed;

#[derive(Debug, Deserialize)]
struct CohereResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

impl EmbeddingFamily for CohereEmbed {
    fn name(&self) -> &'static str {
        "cohere"
    }

    fn matches(&self, model_id: &str) -> bool {
        model_id.contains("cohere")
    }

    fn request_body(&self, text: &str) -> Value {
        json!({
            "texts": [text],
            "input_type": "search_document",
        })
    }

    fn parse_embedding(&self, body: &[u8]) -> Result<Vec<f32>, serde_json::Error> {
        let response: CohereResponse = serde_json::from_slice(body)?;
        Ok(response.embeddings.into_iter().next().unwrap_or_default())
    }
}
