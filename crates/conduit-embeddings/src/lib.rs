//! Text embeddings for conduit
//!
//! Embedding models invoked with family-specific JSON payloads.

#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod embedder;
pub mod family;

pub use embedder::BedrockEmbedder;
pub use family::{EmbeddingFamilies, EmbeddingFamily};
