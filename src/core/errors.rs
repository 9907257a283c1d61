//! Custom error types for translation operations

use thiserror::Error;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Request failed validation before reaching the model
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What was wrong with the request
        message: String,
    },

    /// Language code not known to the model
    #[error("Unsupported language code: '{code}'")]
    UnsupportedLanguage {
        /// Offending code
        code: String,
    },

    /// Model raised during tokenization or generation
    #[error("Inference error: {message}")]
    Inference {
        /// Underlying error message
        message: String,
    },

    /// Blocking inference worker panicked or was cancelled
    #[error("Inference worker failed: {message}")]
    Worker {
        /// Underlying error message
        message: String,
    },

    /// Model could not be loaded at startup
    #[error("Model load error: {message}")]
    ModelLoad {
        /// Underlying error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Underlying error message
        message: String,
    },

    /// Translation server answered with a non-success status
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error detail returned by the server
        message: String,
    },

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        /// Underlying error message
        message: String,
    },

    /// Wrapper for anyhow errors
    #[error("Internal error: {0}")]
    InternalError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Config source error
    #[error("Config error: {0}")]
    ConfigSourceError(#[from] config::ConfigError),
}

impl TranslationError {
    /// Shorthand for an [`TranslationError::Inference`] error
    pub fn inference(message: impl Into<String>) -> Self {
        TranslationError::Inference {
            message: message.into(),
        }
    }

    /// Short machine-readable code used in HTTP error bodies
    pub fn code(&self) -> &'static str {
        match self {
            TranslationError::InvalidRequest { .. } => "invalid_request",
            TranslationError::UnsupportedLanguage { .. } => "unsupported_language",
            TranslationError::Inference { .. } => "inference_error",
            TranslationError::Worker { .. } => "worker_error",
            TranslationError::ModelLoad { .. } => "model_load_error",
            TranslationError::ConfigError { .. } | TranslationError::ConfigSourceError(_) => {
                "config_error"
            }
            TranslationError::Api { .. } => "api_error",
            TranslationError::NetworkError { .. } | TranslationError::HttpError(_) => {
                "network_error"
            }
            _ => "internal_error",
        }
    }

    /// Message safe to hand to HTTP clients.
    ///
    /// Backend and worker failures carry raw library messages; those stay in
    /// the logs and the client gets a fixed string.
    pub fn public_message(&self) -> String {
        match self {
            TranslationError::InvalidRequest { .. } | TranslationError::UnsupportedLanguage { .. } => {
                self.to_string()
            }
            TranslationError::Inference { .. } => "Translation failed during model inference".to_string(),
            TranslationError::Worker { .. } => "Translation worker failed".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl From<anyhow::Error> for TranslationError {
    fn from(err: anyhow::Error) -> Self {
        TranslationError::InternalError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for TranslationError {
    fn from(err: tokio::task::JoinError) -> Self {
        TranslationError::Worker {
            message: err.to_string(),
        }
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
