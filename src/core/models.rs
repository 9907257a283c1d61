//! Core data models for translation

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::{Result, TranslationError};

/// Translation request, as received on both translate endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TranslationRequest {
    /// Text to translate
    #[schema(example = "Hello, how are you?")]
    pub text: String,
    /// Source language code
    #[schema(example = "en")]
    pub source_language: String,
    /// Target language code
    #[schema(example = "ar")]
    pub target_language: String,
}

impl TranslationRequest {
    /// Create a new request
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    /// Reject empty input before it reaches the model
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(TranslationError::InvalidRequest {
                message: "text cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Translation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TranslationResult {
    /// Full translated text
    pub translation: String,
}

/// A decoded text fragment emitted while streaming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChunk(String);

impl StreamChunk {
    /// Wrap a decoded token; whitespace-only tokens yield `None`
    pub fn from_token(token: &str) -> Option<Self> {
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(format!("{} ", token)))
        }
    }

    /// Chunk text, trailing separator included
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the chunk into its text
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Supported language entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LanguageInfo {
    /// ISO 639-1 style code, e.g. `ar`
    pub code: String,
    /// English name
    pub name: String,
}
