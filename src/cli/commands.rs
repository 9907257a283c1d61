//! CLI command definitions and handlers

use clap::Subcommand;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::core::client::TranslationClient;
use crate::core::config::ServerConfig;
use crate::core::languages::M2M100_LANGUAGES;
use crate::core::models::TranslationRequest;

/// Commands for the M2M100 translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Config file (toml, yaml or json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Send one translation request to a running server
    Request {
        /// Server base URL
        #[arg(long, default_value = "http://localhost:8000")]
        url: String,

        /// Text to translate
        #[arg(short, long, default_value = "Hello, how are you?")]
        text: String,

        /// Source language code
        #[arg(short, long, default_value = "en")]
        source_language: String,

        /// Target language code
        #[arg(short = 'l', long, default_value = "ar")]
        target_language: String,

        /// Use the synchronous endpoint instead of streaming
        #[arg(long)]
        no_stream: bool,

        /// Request timeout in milliseconds
        #[arg(long, default_value_t = 120_000)]
        timeout_ms: u64,
    },

    /// List supported language codes
    Languages,
}

/// Handle server command
pub async fn handle_serve(
    host: Option<String>,
    port: Option<u16>,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    use crate::server::api::run_server;

    let mut server_config = ServerConfig::load(config.as_deref())?;
    if let Some(host) = host {
        server_config.host = host;
    }
    if let Some(port) = port {
        server_config.port = port;
    }
    server_config.validate()?;

    info!(
        "Starting HTTP server on {}:{}",
        server_config.host, server_config.port
    );
    println!(
        "🚀 Server starting on http://{}:{}",
        server_config.host, server_config.port
    );
    println!(
        "📄 Translation page: http://{}:{}/translation_page",
        server_config.host, server_config.port
    );

    run_server(server_config).await?;

    Ok(())
}

/// Handle request command
pub async fn handle_request(
    url: String,
    text: String,
    source_language: String,
    target_language: String,
    stream: bool,
    timeout_ms: u64,
) -> anyhow::Result<()> {
    let client = TranslationClient::new(url, timeout_ms)?;
    let request = TranslationRequest::new(text, source_language, target_language);

    if stream {
        let mut stdout = std::io::stdout();
        client
            .translate_stream(&request, |chunk| {
                print!("{}", chunk);
                let _ = stdout.flush();
            })
            .await?;
        println!();
    } else {
        let result = client.translate(&request).await?;
        println!("{}", serde_json::to_string(&result)?);
    }

    Ok(())
}

/// Handle languages command
pub fn handle_languages() {
    for (code, name) in M2M100_LANGUAGES {
        println!("{:<4} {}", code, name);
    }
}
