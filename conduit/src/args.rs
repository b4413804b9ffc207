use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Conduit: generic chat requests over AWS Bedrock
#[derive(Debug, Parser)]
#[command(name = "conduit", about = "Run chat, image and embedding requests against AWS Bedrock")]
pub struct Args {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long, env = "CONDUIT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a complete reply
    Generate(ChatArgs),
    /// Stream a reply as it is produced
    Stream(ChatArgs),
    /// Embed one or more texts
    Embed {
        /// Embedding model identifier
        #[arg(short, long, default_value = "amazon.titan-embed-text-v2:0")]
        model: String,
        /// Texts to embed, one document each
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// Generate an image from a prompt
    Image {
        /// Image model identifier
        #[arg(short, long, default_value = "amazon.nova-canvas-v1:0")]
        model: String,
        /// File to write the PNG to
        #[arg(short, long, default_value = "image.png")]
        output: PathBuf,
        /// Model-specific settings as a JSON object
        #[arg(long)]
        config: Option<String>,
        prompt: String,
    },
}

#[derive(Debug, ClapArgs)]
pub struct ChatArgs {
    /// Chat model identifier
    #[arg(short, long, default_value = "amazon.nova-lite-v1:0")]
    pub model: String,
    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,
    /// Upper bound on generated tokens
    #[arg(long)]
    pub max_tokens: Option<u32>,
    #[arg(long)]
    pub temperature: Option<f32>,
    pub prompt: String,
}
