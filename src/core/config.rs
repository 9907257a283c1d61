//! Configuration management

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::errors::{Result, TranslationError};

/// Config file looked up in the working directory when no path is given
const DEFAULT_CONFIG_NAME: &str = "m2m-translator";

/// Prefix for environment overrides, e.g. `M2M_STREAMING__TOKEN_DELAY_MS=20`
const ENV_PREFIX: &str = "M2M";

/// Pretrained checkpoint to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelSize {
    /// facebook/m2m100_418M
    #[serde(rename = "m2m100_418m")]
    M2M100_418M,
    /// facebook/m2m100_1.2B
    #[serde(rename = "m2m100_1_2b")]
    M2M100_1_2B,
}

impl ModelSize {
    /// Hugging Face hub identifier of the checkpoint
    pub fn hub_name(&self) -> &'static str {
        match self {
            ModelSize::M2M100_418M => "facebook/m2m100_418M",
            ModelSize::M2M100_1_2B => "facebook/m2m100_1.2B",
        }
    }
}

/// Where inference runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevicePreference {
    /// CUDA when available, CPU otherwise
    Auto,
    /// Always CPU
    Cpu,
    /// First CUDA device
    Cuda,
}

/// Model loading and generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Checkpoint to load
    pub size: ModelSize,
    /// Inference device
    pub device: DevicePreference,
    /// Maximum generated sequence length
    pub max_length: i64,
    /// Beam width used by generation
    pub num_beams: i64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            size: ModelSize::M2M100_418M,
            device: DevicePreference::Auto,
            max_length: 100,
            num_beams: 5,
        }
    }
}

/// Pacing and buffering of streamed responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Pause after each forwarded translation token
    pub token_delay_ms: u64,
    /// Pause after each character of the demo stream
    pub demo_char_delay_ms: u64,
    /// Tokens buffered between the generation worker and the response
    pub channel_capacity: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            token_delay_ms: 50,
            demo_char_delay_ms: 100,
            channel_capacity: 32,
        }
    }
}

impl StreamingConfig {
    /// [`Self::token_delay_ms`] as a `Duration`
    pub fn token_delay(&self) -> Duration {
        Duration::from_millis(self.token_delay_ms)
    }

    /// [`Self::demo_char_delay_ms`] as a `Duration`
    pub fn demo_char_delay(&self) -> Duration {
        Duration::from_millis(self.demo_char_delay_ms)
    }
}

/// Configuration for the translation server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Model settings
    pub model: ModelConfig,
    /// Streaming settings
    pub streaming: StreamingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            model: ModelConfig::default(),
            streaming: StreamingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from defaults, an optional file and `M2M_*` env vars
    ///
    /// Without an explicit path, `m2m-translator.{toml,yaml,json}` in the
    /// working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                config::File::from(path).required(true)
            }
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        debug!("Effective configuration: {:?}", config);
        config.validate()?;
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(config_error("host is required"));
        }

        if self.port == 0 {
            return Err(config_error("port must be greater than 0"));
        }

        if self.model.max_length <= 0 {
            return Err(config_error("model.max_length must be greater than 0"));
        }

        if self.model.num_beams <= 0 {
            return Err(config_error("model.num_beams must be greater than 0"));
        }

        if self.streaming.channel_capacity == 0 {
            return Err(config_error(
                "streaming.channel_capacity must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Address the server binds to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| config_error(format!("invalid bind address: {}", e)))
    }
}

fn config_error(message: impl Into<String>) -> TranslationError {
    TranslationError::ConfigError {
        message: message.into(),
    }
}
