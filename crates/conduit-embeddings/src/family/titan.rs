use serde::Deserialize;
use serde_json::{Value, json};

use super::EmbeddingFamily;

/// Amazon Titan text embeddings
pub struct TitanEmbed;

#[derive(Debug, Deserialize)]
struct TitanResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

impl EmbeddingFamily for TitanEmbed {
    fn name(&self) -> &'static str {
        "titan"
    }

    fn matches(&self, model_id: &str) -> bool {
        model_id.contains("titan")
    }

    fn request_body(&self, text: &str) -> Value {
        json!({ "inputText": text })
    }

    fn parse_embedding(&self, body: &[u8]) -> Result<Vec<f32>, serde_json::Error> {
        serde_json::from_slice::<TitanResponse>(body).map(|response| response.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_and_response() {
        assert_eq!(TitanEmbed.request_body("hello"), json!({"inputText": "hello"}));

        let embedding = TitanEmbed
            .parse_embedding(br#"{"embedding": [0.5, -0.25], "inputTextTokenCount": 1}"#)
            .unwrap();
        assert_eq!(embedding, [0.5, -0.25]);
    }
}
