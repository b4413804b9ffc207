use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_credential_types::Credentials;
use conduit_config::BedrockConfig;
use conduit_core::{Embedder, Error, Model, ModelInfo, Registry, RuntimeClient, SdkRuntimeClient};
use conduit_embeddings::{BedrockEmbedder, EmbeddingFamilies};
use conduit_imagegen::{ImageFamilies, ImageModel};
use conduit_llm::ConverseModel;
use secrecy::{ExposeSecret, SecretString};

use crate::capabilities::{ModelType, infer};

/// Provider prefix for every registered model and embedder
pub const PROVIDER: &str = "bedrock";

/// A model to register: its Bedrock identifier and kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDefinition {
    pub name: String,
    pub model_type: ModelType,
}

impl ModelDefinition {
    pub fn new(name: impl Into<String>, model_type: ModelType) -> Self {
        Self {
            name: name.into(),
            model_type,
        }
    }
}

/// Explicit credentials replacing the default provider chain
#[derive(Debug)]
pub struct StaticCredentials {
    pub access_key_id: SecretString,
    pub secret_access_key: SecretString,
    pub session_token: Option<SecretString>,
}

/// Settings for building the runtime client
#[derive(Debug)]
pub struct PluginOptions {
    pub region: String,
    /// Maximum attempts made by the SDK retry layer
    pub max_retries: u32,
    pub request_timeout: Duration,
    pub credentials: Option<StaticCredentials>,
    pub define_common_models: bool,
    pub define_common_embedders: bool,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_owned(),
            max_retries: 3,
            request_timeout: Duration::from_secs(30),
            credentials: None,
            define_common_models: false,
            define_common_embedders: false,
        }
    }
}

impl PluginOptions {
    /// Options from the `[bedrock]` configuration section
    ///
    /// # Errors
    ///
    /// Returns an error if the request timeout does not parse
    pub fn from_config(config: &BedrockConfig) -> anyhow::Result<Self> {
        let credentials = match (&config.access_key_id, &config.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StaticCredentials {
                access_key_id: reveal(access_key_id),
                secret_access_key: reveal(secret_access_key),
                session_token: config.session_token.as_ref().map(reveal),
            }),
            _ => None,
        };

        Ok(Self {
            region: config.region.clone(),
            max_retries: config.max_retries,
            request_timeout: config.request_timeout()?,
            credentials,
            define_common_models: config.define_common_models,
            define_common_embedders: config.define_common_embedders,
        })
    }
}

fn reveal(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret())
}

/// The Bedrock plugin
///
/// Must be initialized exactly once before any model or embedder is defined.
pub struct BedrockPlugin {
    options: PluginOptions,
    client: Mutex<Option<Arc<dyn RuntimeClient>>>,
    image_families: Arc<ImageFamilies>,
    embedding_families: Arc<EmbeddingFamilies>,
}

impl BedrockPlugin {
    pub fn new(options: PluginOptions) -> Self {
        Self {
            options,
            client: Mutex::new(None),
            image_families: Arc::new(ImageFamilies::default()),
            embedding_families: Arc::new(EmbeddingFamilies::default()),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.client.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Build the SDK client from the options and initialize with it
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyInitialized` on a second call, or any error from
    /// defining the common sets
    pub async fn init(&self, registry: &Registry) -> Result<(), Error> {
        if self.is_initialized() {
            return Err(Error::AlreadyInitialized);
        }

        let client = SdkRuntimeClient::new(self.build_client().await);
        self.init_with_client(registry, Arc::new(client))
    }

    /// Initialize with an existing runtime client
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyInitialized` on a second call, or any error from
    /// defining the common sets
    pub fn init_with_client(&self, registry: &Registry, client: Arc<dyn RuntimeClient>) -> Result<(), Error> {
        {
            let mut slot = self.client.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.is_some() {
                return Err(Error::AlreadyInitialized);
            }
            *slot = Some(client);
        }

        tracing::info!(region = %self.options.region, "bedrock plugin initialized");

        if self.options.define_common_models {
            self.define_common_models(registry)?;
        }

        if self.options.define_common_embedders {
            self.define_common_embedders(registry)?;
        }

        Ok(())
    }

    async fn build_client(&self) -> aws_sdk_bedrockruntime::Client {
        let options = &self.options;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(options.region.clone()))
            .retry_config(RetryConfig::standard().with_max_attempts(options.max_retries))
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(options.request_timeout)
                    .build(),
            );

        // Explicit credentials win over the default chain
        if let Some(credentials) = &options.credentials {
            loader = loader.credentials_provider(Credentials::new(
                credentials.access_key_id.expose_secret(),
                credentials.secret_access_key.expose_secret(),
                credentials
                    .session_token
                    .as_ref()
                    .map(|token| token.expose_secret().to_owned()),
                None,
                "conduit-config",
            ));
        }

        let sdk_config = loader.load().await;
        aws_sdk_bedrockruntime::Client::new(&sdk_config)
    }

    fn runtime_client(&self) -> Result<Arc<dyn RuntimeClient>, Error> {
        self.client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Arc::clone)
            .ok_or(Error::NotInitialized)
    }

    /// Register a model under `bedrock/<name>`
    ///
    /// Capabilities are inferred when `info` is absent. The label is always
    /// `bedrock-<name>`. Image models are served through InvokeModel, every
    /// other type through Converse.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotInitialized` before `init`
    pub fn define_model(
        &self,
        registry: &Registry,
        definition: &ModelDefinition,
        info: Option<ModelInfo>,
    ) -> Result<Arc<dyn Model>, Error> {
        let client = self.runtime_client()?;
        let info = info.unwrap_or_else(|| infer(&definition.name, definition.model_type));
        let info = ModelInfo {
            label: format!("{PROVIDER}-{}", definition.name),
            ..info
        };

        let model: Arc<dyn Model> = match definition.model_type {
            ModelType::Image => Arc::new(ImageModel::new(
                &definition.name,
                info,
                client,
                Arc::clone(&self.image_families),
            )),
            _ => Arc::new(ConverseModel::new(&definition.name, info, client)),
        };

        tracing::debug!(model = %definition.name, model_type = %definition.model_type, "defining model");

        Ok(registry.register_model(PROVIDER, model))
    }

    /// Register an embedder under `bedrock/<name>`
    ///
    /// # Errors
    ///
    /// Returns `Error::NotInitialized` before `init`
    pub fn define_embedder(&self, registry: &Registry, name: &str) -> Result<Arc<dyn Embedder>, Error> {
        let client = self.runtime_client()?;
        let embedder = BedrockEmbedder::new(name, client, Arc::clone(&self.embedding_families));

        tracing::debug!(embedder = %name, "defining embedder");

        Ok(registry.register_embedder(PROVIDER, Arc::new(embedder)))
    }
}

/// Whether a Bedrock model named `name` is registered
pub fn is_defined_model(registry: &Registry, name: &str) -> bool {
    registry.is_defined_model(PROVIDER, name)
}

/// The registered Bedrock model named `name`
pub fn model(registry: &Registry, name: &str) -> Option<Arc<dyn Model>> {
    registry.lookup_model(PROVIDER, name)
}
