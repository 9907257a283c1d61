//! M2M100 Translator - HTTP translation service over a pretrained M2M100 model
//!
//! This library provides synchronous and token-streaming translation endpoints,
//! a client for them, and the model adapter contract the service runs on.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod server;

// Re-export key types for convenience
pub use core::{
    adapter::ModelAdapter,
    client::TranslationClient,
    config::ServerConfig,
    errors::TranslationError,
    models::{StreamChunk, TranslationRequest, TranslationResult},
    service::TranslationService,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
