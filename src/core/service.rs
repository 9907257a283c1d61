//! Translation service: synchronous and streaming paths over a [`ModelAdapter`]

use futures::stream::BoxStream;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::core::adapter::ModelAdapter;
use crate::core::config::StreamingConfig;
use crate::core::errors::Result;
use crate::core::languages;
use crate::core::models::{StreamChunk, TranslationRequest, TranslationResult};

/// Literal streamed by the `/stream-text` demo endpoint
pub const DEMO_TEXT: &str = "This is a hardcoded string that will be streamed to the user character by character. Hello from the streaming API!";

/// Lazily produced translation chunks, in generation order
pub type TokenStream = BoxStream<'static, Result<StreamChunk>>;

/// Translation service shared by all request handlers
#[derive(Clone)]
pub struct TranslationService {
    adapter: Arc<dyn ModelAdapter>,
    streaming: Arc<StreamingConfig>,
}

impl TranslationService {
    /// Create a new translation service
    pub fn new(adapter: Arc<dyn ModelAdapter>, streaming: StreamingConfig) -> Self {
        Self {
            adapter,
            streaming: Arc::new(streaming),
        }
    }

    /// Name of the underlying model backend
    pub fn backend_name(&self) -> &str {
        self.adapter.name()
    }

    /// Streaming settings in effect
    pub fn streaming_config(&self) -> &StreamingConfig {
        &self.streaming
    }

    fn check(request: &TranslationRequest) -> Result<()> {
        request.validate()?;
        languages::ensure_supported(&request.source_language)?;
        languages::ensure_supported(&request.target_language)?;
        Ok(())
    }

    /// Translate a single request, returning the full text
    pub async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult> {
        Self::check(request)?;

        debug!(
            "Translating {} chars {} -> {}",
            request.text.len(),
            request.source_language,
            request.target_language
        );

        let adapter = Arc::clone(&self.adapter);
        let request = request.clone();
        let translation = tokio::task::spawn_blocking(move || {
            adapter.translate(
                &request.text,
                &request.source_language,
                &request.target_language,
            )
        })
        .await??;

        Ok(TranslationResult { translation })
    }

    /// Start a streaming translation.
    ///
    /// Validation errors are returned before anything is generated. Once the
    /// stream is running, an adapter failure is yielded as the final `Err`
    /// item. Dropping the stream cancels generation at the next token.
    pub fn stream_translate(&self, request: &TranslationRequest) -> Result<TokenStream> {
        Self::check(request)?;

        let (tx, mut rx) = mpsc::channel::<Result<String>>(self.streaming.channel_capacity);

        let adapter = Arc::clone(&self.adapter);
        let request = request.clone();
        let producer_tx = tx.clone();
        let worker = tokio::task::spawn_blocking(move || {
            if producer_tx.is_closed() {
                return;
            }

            let mut forward = |token: String| match producer_tx.blocking_send(Ok(token)) {
                Ok(()) => ControlFlow::Continue(()),
                Err(_) => ControlFlow::Break(()),
            };

            let outcome = adapter.stream_translate(
                &request.text,
                &request.source_language,
                &request.target_language,
                &mut forward,
            );

            match outcome {
                Ok(()) => debug!("Generation worker finished"),
                Err(e) => {
                    error!("Streaming generation failed: {}", e);
                    let _ = producer_tx.blocking_send(Err(e));
                }
            }
        });

        // Surface worker panics to the consumer instead of ending the stream silently.
        tokio::spawn(async move {
            if let Err(e) = worker.await {
                error!("Generation worker panicked: {}", e);
                let _ = tx.send(Err(e.into())).await;
            }
        });

        let delay = self.streaming.token_delay();
        let stream = async_stream::stream! {
            while let Some(item) = rx.recv().await {
                match item {
                    Ok(token) => {
                        if let Some(chunk) = StreamChunk::from_token(&token) {
                            yield Ok(chunk);
                            pace(delay).await;
                        }
                    }
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
            info!("Translation stream closed");
        };

        Ok(Box::pin(stream))
    }

    /// Demo stream: [`DEMO_TEXT`] one character at a time
    pub fn demo_text_stream(&self) -> BoxStream<'static, String> {
        demo_text_stream(self.streaming.demo_char_delay())
    }
}

/// Stream `DEMO_TEXT` one character per item with `delay` after each
pub fn demo_text_stream(delay: Duration) -> BoxStream<'static, String> {
    let stream = async_stream::stream! {
        for ch in DEMO_TEXT.chars() {
            yield ch.to_string();
            pace(delay).await;
        }
    };
    Box::pin(stream)
}

async fn pace(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}

impl std::fmt::Debug for TranslationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationService")
            .field("backend", &self.adapter.name())
            .field("streaming", &self.streaming)
            .finish()
    }
}

/// Warn once at startup when pacing makes long outputs slow
pub fn log_streaming_settings(config: &StreamingConfig) {
    if config.token_delay_ms > 500 {
        warn!(
            "token_delay_ms={} will make streamed translations very slow",
            config.token_delay_ms
        );
    }
    info!(
        "Streaming: token delay {}ms, demo delay {}ms, buffer {} tokens",
        config.token_delay_ms, config.demo_char_delay_ms, config.channel_capacity
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::adapter::testing::{FailingAdapter, PanickingAdapter, ScriptedAdapter};
    use crate::core::errors::TranslationError;
    use futures::StreamExt;
    use std::sync::atomic::Ordering;

    fn fast_config() -> StreamingConfig {
        StreamingConfig {
            token_delay_ms: 0,
            demo_char_delay_ms: 0,
            channel_capacity: 4,
        }
    }

    fn service(adapter: Arc<dyn ModelAdapter>) -> TranslationService {
        TranslationService::new(adapter, fast_config())
    }

    async fn collect(stream: TokenStream) -> Vec<Result<StreamChunk>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn test_translate_to_arabic() {
        let service = service(Arc::new(ScriptedAdapter::new()));
        let request = TranslationRequest::new("Hello, how are you?", "en", "ar");

        let result = service.translate(&request).await.unwrap();
        assert!(!result.translation.is_empty());
        assert!(result
            .translation
            .chars()
            .any(|c| ('\u{0600}'..='\u{06FF}').contains(&c)));
    }

    #[tokio::test]
    async fn test_translate_rejects_unsupported_language() {
        let adapter = Arc::new(ScriptedAdapter::new());
        let service = service(adapter.clone());

        for request in [
            TranslationRequest::new("Hello", "zz", "fr"),
            TranslationRequest::new("Hello", "en", "zz"),
        ] {
            match service.translate(&request).await {
                Err(TranslationError::UnsupportedLanguage { code }) => assert_eq!(code, "zz"),
                other => panic!("unexpected result: {:?}", other),
            }
        }
        assert!(adapter.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_translate_rejects_empty_text() {
        let service = service(Arc::new(ScriptedAdapter::new()));
        let request = TranslationRequest::new("  ", "en", "fr");
        assert!(matches!(
            service.translate(&request).await,
            Err(TranslationError::InvalidRequest { .. })
        ));
        assert!(service.stream_translate(&request).is_err());
    }

    #[tokio::test]
    async fn test_translate_maps_adapter_failure() {
        let service = service(Arc::new(FailingAdapter {
            tokens_before_failure: 0,
        }));
        let request = TranslationRequest::new("Hello", "en", "fr");
        assert!(matches!(
            service.translate(&request).await,
            Err(TranslationError::Inference { .. })
        ));
    }

    #[tokio::test]
    async fn test_translate_maps_worker_panic() {
        let service = service(Arc::new(PanickingAdapter));
        let request = TranslationRequest::new("Hello", "en", "fr");
        assert!(matches!(
            service.translate(&request).await,
            Err(TranslationError::Worker { .. })
        ));
    }

    #[tokio::test]
    async fn test_stream_skips_whitespace_tokens_and_keeps_order() {
        let service = service(Arc::new(ScriptedAdapter::new()));
        let request = TranslationRequest::new("good morning", "en", "fr");

        let chunks: Vec<String> = collect(service.stream_translate(&request).unwrap())
            .await
            .into_iter()
            .map(|c| c.unwrap().into_string())
            .collect();

        assert_eq!(chunks, vec!["[en->fr] ", "good ", "morning "]);
        assert!(chunks.iter().all(|c| !c.trim().is_empty()));
    }

    #[tokio::test]
    async fn test_stream_and_sync_agree_on_success() {
        let service = service(Arc::new(ScriptedAdapter::new()));
        let request = TranslationRequest::new("Hello, how are you?", "en", "ar");

        let sync = service.translate(&request).await.unwrap();
        let streamed: String = collect(service.stream_translate(&request).unwrap())
            .await
            .into_iter()
            .map(|c| c.unwrap().into_string())
            .collect();

        assert!(!streamed.trim().is_empty());
        assert_eq!(streamed.trim(), sync.translation);
    }

    #[tokio::test]
    async fn test_stream_and_sync_agree_on_failure() {
        let service = service(Arc::new(FailingAdapter {
            tokens_before_failure: 0,
        }));
        let request = TranslationRequest::new("Hello", "en", "fr");

        assert!(service.translate(&request).await.is_err());
        let items = collect(service.stream_translate(&request).unwrap()).await;
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(TranslationError::Inference { .. })));
    }

    #[tokio::test]
    async fn test_stream_failure_ends_with_error_item() {
        let service = service(Arc::new(FailingAdapter {
            tokens_before_failure: 2,
        }));
        let request = TranslationRequest::new("Hello", "en", "fr");

        let items = collect(service.stream_translate(&request).unwrap()).await;
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap().as_str(), "partial0 ");
        assert_eq!(items[1].as_ref().unwrap().as_str(), "partial1 ");
        assert!(items[2].is_err());
    }

    #[tokio::test]
    async fn test_stream_reports_worker_panic() {
        let service = service(Arc::new(PanickingAdapter));
        let request = TranslationRequest::new("Hello", "en", "fr");

        let items = collect(service.stream_translate(&request).unwrap()).await;
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(TranslationError::Worker { .. })));
    }

    #[tokio::test]
    async fn test_dropping_stream_cancels_generation() {
        let adapter = Arc::new(ScriptedAdapter::new());
        let service = TranslationService::new(
            adapter.clone(),
            StreamingConfig {
                token_delay_ms: 0,
                demo_char_delay_ms: 0,
                channel_capacity: 1,
            },
        );
        let text = vec!["word"; 200].join(" ");
        let request = TranslationRequest::new(text, "en", "fr");

        let mut stream = service.stream_translate(&request).unwrap();
        assert!(stream.next().await.unwrap().is_ok());
        drop(stream);

        tokio::time::sleep(Duration::from_millis(200)).await;
        let emitted = adapter.emitted.load(Ordering::SeqCst);
        // a full run emits 402 tokens (201 words, each followed by a blank)
        assert!(emitted <= 8, "worker kept generating: {}", emitted);
    }

    #[tokio::test]
    async fn test_concurrent_requests_keep_their_languages() {
        let service = service(Arc::new(ScriptedAdapter::new()));

        let mut handles = Vec::new();
        for (i, source) in ["en", "de", "fr", "es", "it", "ja"].iter().cycle().take(24).enumerate() {
            let service = service.clone();
            let request = TranslationRequest::new(format!("text{}", i), *source, "pt");
            handles.push(tokio::spawn(async move {
                let result = service.translate(&request).await.unwrap();
                (request, result)
            }));
        }

        for handle in handles {
            let (request, result) = handle.await.unwrap();
            assert_eq!(
                result.translation,
                format!("[{}->pt] {}", request.source_language, request.text)
            );
        }
    }

    #[tokio::test]
    async fn test_demo_stream_one_char_per_item() {
        let items: Vec<String> = demo_text_stream(Duration::ZERO).collect().await;
        assert_eq!(items.len(), DEMO_TEXT.chars().count());
        assert!(items.iter().all(|s| s.chars().count() == 1));
        assert_eq!(items.concat(), DEMO_TEXT);
    }

    #[tokio::test]
    async fn test_stream_waits_token_delay_after_each_chunk() {
        let service = TranslationService::new(
            Arc::new(ScriptedAdapter::new()),
            StreamingConfig {
                token_delay_ms: 50,
                ..fast_config()
            },
        );
        let request = TranslationRequest::new("a b c d", "en", "fr");

        let start = tokio::time::Instant::now();
        let chunks = collect(service.stream_translate(&request).unwrap()).await;
        let elapsed = start.elapsed();

        assert_eq!(chunks.len(), 5);
        assert!(chunks.iter().all(|c| c.is_ok()));
        assert!(elapsed >= Duration::from_millis(250), "elapsed: {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_stream_waits_char_delay_after_each_char() {
        let service = TranslationService::new(
            Arc::new(ScriptedAdapter::new()),
            StreamingConfig {
                demo_char_delay_ms: 10,
                ..fast_config()
            },
        );

        let start = tokio::time::Instant::now();
        let items: Vec<String> = service.demo_text_stream().collect().await;
        let elapsed = start.elapsed();

        let chars = DEMO_TEXT.chars().count() as u32;
        assert_eq!(items.len() as u32, chars);
        assert!(elapsed >= Duration::from_millis(10) * chars, "elapsed: {:?}", elapsed);
    }
}
