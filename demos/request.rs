//! Stream a translation from a running server
//!
//! Start the server first (`m2m-translator serve`), then:
//! `cargo run --example request`

use std::io::Write;

use dotenvy::dotenv;
use m2m_translator::{TranslationClient, TranslationRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let url = std::env::var("M2M_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let client = TranslationClient::new(&url, 120_000)?;
    let request = TranslationRequest::new("Hello, how are you?", "en", "ar");

    println!("=== {} -> {} via {}/translate/stream ===", request.source_language, request.target_language, url);

    let mut stdout = std::io::stdout();
    let full = client
        .translate_stream(&request, |chunk| {
            print!("{}", chunk);
            let _ = stdout.flush();
        })
        .await?;
    println!();

    println!("\n{} chars received", full.chars().count());
    Ok(())
}
