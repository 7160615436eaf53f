//! The session context: one user, one pipeline, one mutable home for the
//! model cache and the last rendered artifact.
//!
//! A [`Session`] is a plain owned value, so there is no ambient global state
//! to reason about: create one at session start, call
//! [`render`](Session::render) for each request, and drop it at session end
//! to release every cached model and temp file. The `&mut self` render API
//! serializes generations within a session by construction.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::Deserialize;

use crate::artifact::{EncodedArtifact, PromptStore};
use crate::backend::{Device, ModelLoader};
use crate::cache::ModelCache;
use crate::encode::encode_wav;
use crate::error::RenderError;
use crate::guard::{MemoryReclaimer, NoopReclaimer, ReclaimOnDrop};
use crate::invoke::{invoke, validate_text, GenerationOptions};
use crate::variant::ModelVariant;
use crate::voice::{persist_upload, VoiceLibrary, VoiceSource};

/// Session-level settings, loadable from a JSON file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory scanned for reference speaker files.
    pub speakers_dir: PathBuf,
    /// Device model weights are loaded onto.
    pub device: Device,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            speakers_dir: PathBuf::from("speakers"),
            device: Device::Cpu,
        }
    }
}

impl SessionConfig {
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self, RenderError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// One render request: which model, what text, and how it should sound.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct RenderRequest {
    pub variant: ModelVariant,
    pub text: String,
    /// Language id; only the multilingual variant reads it.
    #[builder(default, setter(strip_option, into))]
    pub language: Option<String>,
    #[builder(default)]
    pub voice: VoiceSource,
}

/// A user session: owns the model cache, the speaker library handle, the
/// uploaded-prompt store and the last rendered output.
pub struct Session {
    device: Device,
    loader: Box<dyn ModelLoader>,
    reclaimer: Box<dyn MemoryReclaimer>,
    cache: ModelCache,
    voices: VoiceLibrary,
    prompts: PromptStore,
    last_output: Option<EncodedArtifact>,
}

impl Session {
    pub fn new(loader: impl ModelLoader + 'static, config: SessionConfig) -> Self {
        Self {
            device: config.device,
            loader: Box::new(loader),
            reclaimer: Box::new(NoopReclaimer),
            cache: ModelCache::new(),
            voices: VoiceLibrary::new(config.speakers_dir),
            prompts: PromptStore::default(),
            last_output: None,
        }
    }

    /// Replace the no-op memory reclaimer with a runtime-specific one.
    pub fn with_reclaimer(mut self, reclaimer: impl MemoryReclaimer + 'static) -> Self {
        self.reclaimer = Box::new(reclaimer);
        self
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn voices(&self) -> &VoiceLibrary {
        &self.voices
    }

    /// Variants currently loaded in this session.
    pub fn loaded_variants(&self) -> Vec<ModelVariant> {
        self.cache.loaded_variants()
    }

    /// The most recently rendered artifact, kept alive for repeated
    /// playback/download without regenerating.
    pub fn last_output(&self) -> Option<&EncodedArtifact> {
        self.last_output.as_ref()
    }

    /// Run the full pipeline for one request: validate, resolve the voice,
    /// acquire the model (loading on first use), generate, encode.
    ///
    /// The returned artifact stays owned by the session as its last output;
    /// the previous last output is deleted when it is replaced. Memory
    /// reclamation hooks run before the model work and again on every exit
    /// path, success or failure.
    pub fn render(&mut self, request: &RenderRequest) -> Result<&EncodedArtifact, RenderError> {
        // Fail fast before any load or model call.
        let text = validate_text(&request.text)?;

        let voice_path = match &request.voice {
            VoiceSource::Default => None,
            VoiceSource::Library(name) => Some(self.voices.resolve(name)?),
            VoiceSource::Upload(bytes) => Some(self.prompts.register(persist_upload(bytes)?)),
        };
        let options = GenerationOptions {
            language: request.language.clone(),
            voice_path,
        };

        self.reclaimer.release_cached();
        let cleanup = ReclaimOnDrop(self.reclaimer.as_ref());

        let model = self
            .cache
            .acquire(request.variant, self.loader.as_mut(), self.device)?;
        let sample_rate = model.sample_rate();
        let samples = invoke(model, request.variant, text, &options)?;

        let artifact = encode_wav(&samples, sample_rate)?;
        // The raw waveform is the largest host-side buffer; drop it before
        // the post-call reclamation pass runs.
        drop(samples);
        drop(cleanup);

        Ok(&*self.last_output.insert(artifact))
    }

    /// Delete uploaded voice prompts and the last output now instead of at
    /// session end. Deletion is best-effort; failures are swallowed.
    pub fn clear_artifacts(&mut self) {
        self.prompts.clear();
        self.last_output = None;
    }
}
