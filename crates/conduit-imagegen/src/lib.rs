//! Image generation for conduit
//!
//! Text-to-image models invoked with family-specific JSON payloads.

#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

pub mod family;
mod model;

pub use family::{ImageFamilies, ImageFamily};
pub use model::ImageModel;
