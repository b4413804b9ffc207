#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use args::{Args, ChatArgs, Command};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::Parser;
use conduit_config::Config;
use conduit_core::{
    Document, EmbedRequest, Message, Model, ModelRequest, ModelResponseChunk, Part, Registry, RequestContext,
    StreamCallback,
};
use conduit_plugin::{BedrockPlugin, ModelDefinition, ModelType, PluginOptions};
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    conduit_telemetry::init(Some(&config.telemetry), "info")?;

    let registry = Registry::new();
    let plugin = BedrockPlugin::new(PluginOptions::from_config(&config.bedrock)?);
    plugin.init(&registry).await?;

    // Ctrl-C cancels the in-flight call
    let cancellation = CancellationToken::new();
    let cancel = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling request");
            cancel.cancel();
        }
    });
    let context = RequestContext::with_cancellation(cancellation);

    match args.command {
        Command::Generate(chat) => {
            let model = define(&plugin, &registry, &chat.model, ModelType::Chat)?;
            let response = model.generate(&chat_request(&chat), &context, None).await?;
            println!("{}", response.text());
            tracing::debug!(finish_reason = %response.finish_reason, usage = ?response.usage, "generation finished");
        }
        Command::Stream(chat) => {
            let model = define(&plugin, &registry, &chat.model, ModelType::Chat)?;
            let callback: &mut StreamCallback<'_> = &mut |_: &RequestContext, chunk: ModelResponseChunk| {
                let mut stdout = std::io::stdout().lock();
                write!(stdout, "{}", chunk.text())?;
                stdout.flush()?;
                Ok(())
            };
            let response = model.generate(&chat_request(&chat), &context, Some(callback)).await?;
            println!();
            tracing::debug!(finish_reason = %response.finish_reason, usage = ?response.usage, "stream finished");
        }
        Command::Embed { model, texts } => {
            let embedder = plugin.define_embedder(&registry, &model)?;
            let request = EmbedRequest {
                input: texts.into_iter().map(Document::from_text).collect(),
                options: None,
            };
            let response = embedder.embed(&request, &context).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Image {
            model,
            output,
            config,
            prompt,
        } => {
            let model = define(&plugin, &registry, &model, ModelType::Image)?;
            let mut request = ModelRequest::new(vec![Message::user(prompt)]);
            if let Some(config) = config {
                let config: Value = serde_json::from_str(&config).context("--config must be a JSON object")?;
                request = request.with_config(config);
            }

            let response = model.generate(&request, &context, None).await?;
            let Some(Part::Media(media)) = response.message.content.first() else {
                anyhow::bail!("image model returned no media");
            };
            let bytes = STANDARD.decode(media.payload().1).context("image payload is not base64")?;
            std::fs::write(&output, bytes).with_context(|| format!("failed to write {}", output.display()))?;
            println!("{}", output.display());
        }
    }

    Ok(())
}

fn define(plugin: &BedrockPlugin, registry: &Registry, name: &str, model_type: ModelType) -> anyhow::Result<Arc<dyn Model>> {
    Ok(plugin.define_model(registry, &ModelDefinition::new(name, model_type), None)?)
}

fn chat_request(chat: &ChatArgs) -> ModelRequest {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &chat.system {
        messages.push(Message::system(system.as_str()));
    }
    messages.push(Message::user(chat.prompt.as_str()));

    let mut config = Map::new();
    if let Some(max_tokens) = chat.max_tokens {
        config.insert("maxOutputTokens".to_owned(), json!(max_tokens));
    }
    if let Some(temperature) = chat.temperature {
        config.insert("temperature".to_owned(), json!(temperature));
    }

    let request = ModelRequest::new(messages);
    if config.is_empty() {
        request
    } else {
        request.with_config(Value::Object(config))
    }
}
