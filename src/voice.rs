//! Voice reference resolution.
//!
//! A render request names its reference voice one of three ways: none (the
//! model's built-in default), an entry from the speaker library directory,
//! or raw uploaded bytes. Resolution produces a stable local path for the
//! model to read, or `None`. No audio validation happens here; format and
//! duration checks are the model's problem.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::error::RenderError;

/// Extensions accepted for library entries and uploads.
pub const VOICE_EXTENSIONS: &[&str] = &["wav", "mp3", "flac"];

/// Where the reference voice for a request comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VoiceSource {
    /// No reference audio; the model falls back to its default voice.
    #[default]
    Default,
    /// A file name from the speaker library directory.
    Library(String),
    /// Raw audio bytes uploaded by the user, persisted to a temp file.
    Upload(Vec<u8>),
}

/// A fixed directory of reference speaker files.
#[derive(Debug, Clone)]
pub struct VoiceLibrary {
    dir: PathBuf,
}

impl VoiceLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List library entries (file names, sorted). A missing or empty
    /// directory is a valid empty library, not an error.
    pub fn entries(&self) -> Vec<String> {
        let Ok(read_dir) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut names: Vec<String> = read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| has_voice_extension(path))
            .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        names
    }

    /// Resolve a library entry name to its path.
    ///
    /// Fails with [`RenderError::VoiceNotFound`] when the selection is stale
    /// (file removed since the library was listed), carries an extension
    /// outside the allow-list, or tries to escape the library directory.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, RenderError> {
        if name.contains('/') || name.contains('\\') {
            return Err(RenderError::VoiceNotFound(name.to_string()));
        }

        let path = self.dir.join(name);
        if !has_voice_extension(&path) || !path.is_file() {
            return Err(RenderError::VoiceNotFound(name.to_string()));
        }
        Ok(path)
    }
}

fn has_voice_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            VOICE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Persist uploaded reference audio to a uniquely named temp file and hand
/// ownership of the path to the caller.
pub(crate) fn persist_upload(bytes: &[u8]) -> Result<TempPath, RenderError> {
    let mut file = tempfile::Builder::new()
        .prefix("voice-prompt-")
        .suffix(".wav")
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;
    log::debug!("persisted {} uploaded bytes to {}", bytes.len(), file.path().display());
    Ok(file.into_temp_path())
}
