use crate::backend::BackendError;
use crate::guard::FailureClass;
use crate::variant::ModelVariant;

/// Everything that can go wrong between a render request and an artifact.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// The input text was empty after trimming whitespace. Raised before any
    /// model is loaded or called.
    #[error("no text to synthesize")]
    EmptyText,

    /// A library voice selection no longer resolves to a usable file.
    #[error("voice '{0}' not found in the speaker library")]
    VoiceNotFound(String),

    /// Model loading failed; the session cache for the variant is left empty
    /// so the next request retries the load.
    #[error("failed to load {variant}: {source}")]
    ModelLoad {
        variant: ModelVariant,
        #[source]
        source: BackendError,
    },

    /// The model call itself failed after a successful load.
    #[error("speech generation failed ({class}): {source}")]
    Generation {
        class: FailureClass,
        #[source]
        source: BackendError,
    },

    /// Artifact or voice-prompt file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the PCM container failed.
    #[error("WAV encoding error: {0}")]
    Wav(#[from] hound::Error),

    /// The session configuration file could not be parsed.
    #[error("invalid session config: {0}")]
    Config(#[from] serde_json::Error),
}

impl RenderError {
    /// The failure classification, for generation failures.
    pub fn failure_class(&self) -> Option<FailureClass> {
        match self {
            RenderError::Generation { class, .. } => Some(*class),
            _ => None,
        }
    }

    /// Static remediation hint to show next to the error message, when the
    /// failure classifier has one.
    pub fn remediation(&self) -> Option<&'static str> {
        self.failure_class().map(FailureClass::remediation)
    }
}
