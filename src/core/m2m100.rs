//! M2M100 backend built on rust-bert

use std::ops::ControlFlow;
use std::sync::Mutex;

use rust_bert::m2m_100::{
    M2M100ConfigResources, M2M100MergesResources, M2M100ModelResources, M2M100SourceLanguages,
    M2M100TargetLanguages, M2M100VocabResources,
};
use rust_bert::pipelines::common::ModelType;
use rust_bert::pipelines::translation::{Language, TranslationConfig, TranslationModel};
use rust_bert::resources::RemoteResource;
use tch::Device;
use tracing::{debug, info};

use crate::core::adapter::{emit_words, ModelAdapter};
use crate::core::config::{DevicePreference, ModelConfig, ModelSize};
use crate::core::errors::{Result, TranslationError};

/// rust-bert `TranslationModel` holding an M2M100 checkpoint.
///
/// libtorch modules are not `Sync`; the mutex makes each generation call a
/// single critical section.
pub struct M2M100Adapter {
    model: Mutex<TranslationModel>,
    size: ModelSize,
    languages: Vec<Language>,
}

impl M2M100Adapter {
    /// Download (or reuse the cached) checkpoint and load it on the configured device
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let (model, model_config, vocab, merges, sources, targets) = match config.size {
            ModelSize::M2M100_418M => (
                M2M100ModelResources::M2M100_418M,
                M2M100ConfigResources::M2M100_418M,
                M2M100VocabResources::M2M100_418M,
                M2M100MergesResources::M2M100_418M,
                M2M100SourceLanguages::M2M100_418M.iter().copied().collect::<Vec<Language>>(),
                M2M100TargetLanguages::M2M100_418M.iter().copied().collect::<Vec<Language>>(),
            ),
            ModelSize::M2M100_1_2B => (
                M2M100ModelResources::M2M100_1_2B,
                M2M100ConfigResources::M2M100_1_2B,
                M2M100VocabResources::M2M100_1_2B,
                M2M100MergesResources::M2M100_1_2B,
                M2M100SourceLanguages::M2M100_1_2B.iter().copied().collect::<Vec<Language>>(),
                M2M100TargetLanguages::M2M100_1_2B.iter().copied().collect::<Vec<Language>>(),
            ),
        };

        let device = match config.device {
            DevicePreference::Auto => Device::cuda_if_available(),
            DevicePreference::Cpu => Device::Cpu,
            DevicePreference::Cuda => Device::Cuda(0),
        };

        let mut translation_config = TranslationConfig::new(
            ModelType::M2M100,
            RemoteResource::from_pretrained(model),
            RemoteResource::from_pretrained(model_config),
            RemoteResource::from_pretrained(vocab),
            Some(RemoteResource::from_pretrained(merges)),
            &sources,
            &targets,
            device,
        );
        translation_config.max_length = Some(config.max_length);
        translation_config.num_beams = config.num_beams;

        info!(
            "Loading {} on {:?} (max_length={}, num_beams={})",
            config.size.hub_name(),
            device,
            config.max_length,
            config.num_beams
        );

        let model = TranslationModel::new(translation_config).map_err(|e| {
            TranslationError::ModelLoad {
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            model: Mutex::new(model),
            size: config.size,
            languages: sources,
        })
    }

    fn resolve(&self, code: &str) -> Result<Language> {
        self.languages
            .iter()
            .find(|language| language.get_iso_639_1_code() == code)
            .copied()
            .ok_or_else(|| TranslationError::UnsupportedLanguage {
                code: code.to_string(),
            })
    }

    fn generate(&self, text: &str, source_language: &str, target_language: &str) -> Result<String> {
        let source = self.resolve(source_language)?;
        let target = self.resolve(target_language)?;

        let model = self
            .model
            .lock()
            .map_err(|_| TranslationError::inference("model lock poisoned"))?;
        let mut outputs = model
            .translate(&[text], source, target)
            .map_err(|e| TranslationError::inference(e.to_string()))?;

        debug!("Generated {} sequence(s)", outputs.len());
        if outputs.is_empty() {
            return Err(TranslationError::inference("model returned no sequences"));
        }
        Ok(outputs.swap_remove(0))
    }
}

impl ModelAdapter for M2M100Adapter {
    fn name(&self) -> &str {
        self.size.hub_name()
    }

    fn translate(&self, text: &str, source_language: &str, target_language: &str) -> Result<String> {
        self.generate(text, source_language, target_language)
    }

    /// Streams whitespace-delimited words of the finished translation, not
    /// model tokens.
    ///
    /// rust-bert exposes no per-step decode hook, so the whole sequence is
    /// generated first. Cancellation takes effect between words, and output
    /// in unspaced scripts (zh, ja, th) comes through as one chunk.
    fn stream_translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        on_token: &mut dyn FnMut(String) -> ControlFlow<()>,
    ) -> Result<()> {
        let output = self.generate(text, source_language, target_language)?;
        if !emit_words(&output, on_token) {
            debug!("Stream consumer went away, stopping early");
        }
        Ok(())
    }
}
