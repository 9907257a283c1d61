//! Model adapter contract
//!
//! The pretrained model is a black box behind [`ModelAdapter`]. Calls are
//! blocking and CPU/GPU bound, so the service always runs them on the
//! blocking pool. Source and target languages are passed on every call;
//! adapters must not keep per-request language state.

use std::ops::ControlFlow;
use std::sync::Arc;

use crate::core::config::ModelConfig;
use crate::core::errors::{Result, TranslationError};

/// Pretrained tokenizer/model pair
pub trait ModelAdapter: Send + Sync {
    /// Backend name reported by the health check
    fn name(&self) -> &str;

    /// Translate `text` in one shot
    fn translate(&self, text: &str, source_language: &str, target_language: &str) -> Result<String>;

    /// Generate a translation, handing each decoded token to `on_token` in order.
    ///
    /// Generation stops early when `on_token` returns `ControlFlow::Break`.
    fn stream_translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        on_token: &mut dyn FnMut(String) -> ControlFlow<()>,
    ) -> Result<()>;
}

/// Hand a finished translation to `on_token` one whitespace-delimited word at a time.
///
/// Returns `false` if the consumer asked to stop. Scripts written without
/// spaces (Chinese, Japanese, Thai) arrive as a single chunk.
pub fn emit_words(output: &str, on_token: &mut dyn FnMut(String) -> ControlFlow<()>) -> bool {
    for word in output.split_whitespace() {
        if on_token(word.to_string()).is_break() {
            return false;
        }
    }
    true
}

/// Load the adapter selected at build time
#[cfg(feature = "m2m100")]
pub fn load_adapter(config: &ModelConfig) -> Result<Arc<dyn ModelAdapter>> {
    let adapter = crate::core::m2m100::M2M100Adapter::load(config)?;
    Ok(Arc::new(adapter))
}

/// Load the adapter selected at build time
#[cfg(not(feature = "m2m100"))]
pub fn load_adapter(config: &ModelConfig) -> Result<Arc<dyn ModelAdapter>> {
    Err(TranslationError::ModelLoad {
        message: format!(
            "cannot load {}: built without the `m2m100` feature",
            config.size.hub_name()
        ),
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    fn words(output: &str) -> Vec<String> {
        let mut seen = Vec::new();
        assert!(emit_words(output, &mut |w: String| {
            seen.push(w);
            ControlFlow::Continue(())
        }));
        seen
    }

    #[test]
    fn test_emit_words_splits_on_whitespace() {
        assert_eq!(words("Bonjour,  comment\tallez-vous ?"), vec!["Bonjour,", "comment", "allez-vous", "?"]);
        assert!(words("   ").is_empty());
    }

    #[test]
    fn test_emit_words_keeps_unspaced_script_whole() {
        assert_eq!(words("你好，你好吗？"), vec!["你好，你好吗？"]);
    }

    #[test]
    fn test_emit_words_stops_on_break() {
        let mut seen = 0;
        let finished = emit_words("a b c d", &mut |_: String| {
            seen += 1;
            if seen == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert!(!finished);
        assert_eq!(seen, 2);
    }

    #[cfg(not(feature = "m2m100"))]
    #[test]
    fn test_load_adapter_without_backend_fails() {
        match load_adapter(&ModelConfig::default()) {
            Err(TranslationError::ModelLoad { message }) => {
                assert!(message.contains("facebook/m2m100_418M"));
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("adapter should not load without a backend"),
        }
    }
}
