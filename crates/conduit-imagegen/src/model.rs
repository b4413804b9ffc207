use std::sync::Arc;

use async_trait::async_trait;
use conduit_core::{
    Error, FinishReason, Media, Model, ModelInfo, ModelRequest, ModelResponse, Part, RequestContext, RuntimeClient,
    StreamCallback,
};

use crate::family::ImageFamilies;

/// Text-to-image model served through InvokeModel
pub struct ImageModel {
    name: String,
    info: ModelInfo,
    client: Arc<dyn RuntimeClient>,
    families: Arc<ImageFamilies>,
}

impl ImageModel {
    pub fn new(
        name: impl Into<String>,
        info: ModelInfo,
        client: Arc<dyn RuntimeClient>,
        families: Arc<ImageFamilies>,
    ) -> Self {
        Self {
            name: name.into(),
            info,
            client,
            families,
        }
    }
}

/// First text part of the first message
fn first_prompt(request: &ModelRequest) -> Option<&str> {
    request
        .messages
        .first()?
        .content
        .iter()
        .find_map(Part::as_text)
        .filter(|text| !text.is_empty())
}

#[async_trait]
impl Model for ImageModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> &ModelInfo {
        &self.info
    }

    async fn generate(
        &self,
        request: &ModelRequest,
        context: &RequestContext,
        _callback: Option<&mut StreamCallback<'_>>,
    ) -> Result<ModelResponse, Error> {
        let prompt = first_prompt(request)
            .ok_or_else(|| Error::InvalidRequest("no text prompt found for image generation".to_owned()))?;

        let family = self
            .families
            .resolve(&self.name)
            .ok_or_else(|| Error::UnsupportedModel { model: self.name.clone() })?;

        let body = family.request_body(prompt, request.config.as_ref());
        let body = serde_json::to_vec(&body).map_err(|e| Error::Internal(e.into()))?;

        tracing::debug!(model = %self.name, family = family.name(), "invoking image model");

        let raw = context
            .run(self.client.invoke_model(&self.name, body))
            .await?
            .inspect_err(|e| tracing::error!(model = %self.name, error = %e, "image generation failed"))?;

        let images = family
            .parse_images(&raw)
            .map_err(|e| Error::decode(&self.name, e))?;

        let Some(first) = images.into_iter().next() else {
            return Err(Error::EmptyResult {
                model: self.name.clone(),
                artifact: "images",
            });
        };

        Ok(ModelResponse::new(
            vec![Part::Media(Media::inline_base64("image/png", &first))],
            FinishReason::Stop,
            None,
        ))
    }
}
