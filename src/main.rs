//! Main entry point for the M2M100 translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use m2m_translator::cli::commands::{self, Commands};

/// M2M100 translation server and client
#[derive(Parser, Debug)]
#[command(name = "m2m-translator", version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("m2m_translator={},tower_http={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match args.command {
        Some(Commands::Serve { host, port, config }) => {
            commands::handle_serve(host, port, config).await?;
        }
        Some(Commands::Request {
            url,
            text,
            source_language,
            target_language,
            no_stream,
            timeout_ms,
        }) => {
            commands::handle_request(
                url,
                text,
                source_language,
                target_language,
                !no_stream,
                timeout_ms,
            )
            .await?;
        }
        Some(Commands::Languages) => {
            commands::handle_languages();
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
