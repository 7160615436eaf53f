//! The model capability boundary.
//!
//! Models are opaque to this crate: a backend knows how to load a variant's
//! weights onto a device and turn text into a waveform. Everything else,
//! from caching and validation to encoding and failure classification, lives on this
//! side of the boundary and never inspects model internals.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::variant::ModelVariant;

/// Errors crossing the backend boundary. Backends report whatever their
/// runtime gives them; the failure classifier only looks at the display text.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Compute device the model weights are loaded onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Cpu,
    Cuda,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => f.write_str("cpu"),
            Device::Cuda => f.write_str("cuda"),
        }
    }
}

/// A single generation call, shaped for the variant's parameter surface.
///
/// Turbo and Standard take only text and an optional reference voice; the
/// multilingual model additionally requires a language id. Modeling this as
/// a sum keeps the per-variant signatures typed instead of dispatching on
/// variant names at the call site.
#[derive(Debug, Clone, Copy)]
pub enum GenerateRequest<'a> {
    Monolingual {
        text: &'a str,
        audio_prompt: Option<&'a Path>,
    },
    Multilingual {
        text: &'a str,
        language_id: &'a str,
        audio_prompt: Option<&'a Path>,
    },
}

impl GenerateRequest<'_> {
    pub fn text(&self) -> &str {
        match self {
            GenerateRequest::Monolingual { text, .. } => text,
            GenerateRequest::Multilingual { text, .. } => text,
        }
    }

    pub fn audio_prompt(&self) -> Option<&Path> {
        match self {
            GenerateRequest::Monolingual { audio_prompt, .. } => *audio_prompt,
            GenerateRequest::Multilingual { audio_prompt, .. } => *audio_prompt,
        }
    }
}

/// A loaded model handle.
///
/// Handles are owned exclusively by the session cache as `Box<dyn SpeechModel>`
/// and are never cloned or shared across variants.
pub trait SpeechModel {
    /// Output sample rate of generated waveforms, in Hz.
    fn sample_rate(&self) -> u32;

    /// Render text to a mono f32 waveform, conceptually in [-1.0, 1.0].
    fn generate(&mut self, request: GenerateRequest<'_>) -> Result<Vec<f32>, BackendError>;
}

/// Loads model weights for a variant onto a device.
///
/// Loading is expensive (large parameter set, device transfer); the session
/// cache guarantees `load` runs at most once per variant per session.
pub trait ModelLoader {
    fn load(
        &mut self,
        variant: ModelVariant,
        device: Device,
    ) -> Result<Box<dyn SpeechModel>, BackendError>;
}
