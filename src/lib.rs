//! # chatterbox-session
//!
//! Session-scoped model caching and audio rendering for Chatterbox-style
//! text-to-speech backends.
//!
//! A [`Session`] owns everything one user's interaction needs: a lazy cache
//! of loaded model variants (each variant loads at most once per session), a
//! speaker library for reference voices, and the lifecycle of every temp
//! file the pipeline creates. One [`Session::render`] call runs the whole
//! pipeline (validate, resolve the voice, acquire the model, generate,
//! encode to 16-bit PCM WAV) and hands back an artifact that is deleted
//! automatically when the session moves on.
//!
//! Models themselves are opaque: implement [`ModelLoader`] and
//! [`SpeechModel`] for your inference runtime and the pipeline does the
//! rest.
//!
//! ## Quick Start
//!
//! ```ignore
//! use chatterbox_session::{
//!     ModelVariant, RenderRequestBuilder, Session, SessionConfig, VoiceSource,
//! };
//!
//! let mut session = Session::new(MyLoader::new(), SessionConfig::default());
//!
//! let request = RenderRequestBuilder::default()
//!     .variant(ModelVariant::Multilingual)
//!     .text("Bonjour, comment ça va?")
//!     .language("fr")
//!     .voice(VoiceSource::Library("alice.wav".to_string()))
//!     .build()?;
//!
//! let artifact = session.render(&request)?;
//! println!("wrote {} at {} Hz", artifact.path().display(), artifact.sample_rate());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod artifact;
pub mod backend;
pub mod cache;
pub mod encode;
pub mod error;
pub mod guard;
mod invoke;
pub mod session;
pub mod variant;
pub mod voice;

pub use artifact::{EncodedArtifact, PromptStore};
pub use backend::{BackendError, Device, GenerateRequest, ModelLoader, SpeechModel};
pub use encode::encode_wav;
pub use error::RenderError;
pub use guard::{classify_failure, FailureClass, MemoryReclaimer, NoopReclaimer};
pub use invoke::GenerationOptions;
pub use session::{
    RenderRequest, RenderRequestBuilder, RenderRequestBuilderError, Session, SessionConfig,
};
pub use variant::{is_supported_language, ModelVariant, DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES};
pub use voice::{VoiceLibrary, VoiceSource, VOICE_EXTENSIONS};
