//! # Error Types
//!
//! This module defines error types used throughout the starprnt library.
//!
//! Rendering has its own error types ([`crate::render::RenderError`],
//! [`crate::components::BuildError`]); those never leave the off-screen
//! renderer, which reports failure as "no image" instead.

use thiserror::Error;

/// Main error type for starprnt operations
#[derive(Debug, Error)]
pub enum StarPrntError {
    /// The rasterizer produced no image for a widget bitmap
    #[error("Image generation failed: {0}")]
    ImageGeneration(String),

    /// Transport-level errors (handing commands to the printer SDK)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Image loading or decoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Instruction serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
