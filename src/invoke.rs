//! Adapts the uniform (text, options) request shape to each variant's
//! calling convention and drives the model call.

use std::path::PathBuf;
use std::time::Instant;

use crate::backend::{GenerateRequest, SpeechModel};
use crate::error::RenderError;
use crate::guard::classify_failure;
use crate::variant::{is_supported_language, ModelVariant, DEFAULT_LANGUAGE};

/// Per-request options, built from the current UI selections.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// Language id, meaningful only for the multilingual variant.
    pub language: Option<String>,
    /// Resolved reference voice path, if any.
    pub voice_path: Option<PathBuf>,
}

/// Reject empty input before any model is loaded or called.
pub(crate) fn validate_text(text: &str) -> Result<&str, RenderError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RenderError::EmptyText);
    }
    Ok(trimmed)
}

/// Run one generation. `text` must already be validated.
///
/// No retry on failure: retrying a resource-exhausted model rarely helps and
/// compounds memory pressure. The error is classified and surfaced as-is.
pub(crate) fn invoke(
    model: &mut dyn SpeechModel,
    variant: ModelVariant,
    text: &str,
    options: &GenerationOptions,
) -> Result<Vec<f32>, RenderError> {
    let audio_prompt = options.voice_path.as_deref();

    let request = if variant.uses_language_id() {
        let language_id = options.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
        if !is_supported_language(language_id) {
            // The model may still know it; pass through and let it decide.
            log::warn!("language id '{language_id}' is not in the supported-language table");
        }
        GenerateRequest::Multilingual {
            text,
            language_id,
            audio_prompt,
        }
    } else {
        GenerateRequest::Monolingual { text, audio_prompt }
    };

    let start = Instant::now();
    let samples = model.generate(request).map_err(|source| {
        let class = classify_failure(&source.to_string());
        RenderError::Generation { class, source }
    })?;
    log::debug!(
        "{variant} generated {} samples in {:.2?}",
        samples.len(),
        start.elapsed()
    );
    Ok(samples)
}
