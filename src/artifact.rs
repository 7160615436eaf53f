//! Temporary artifact lifecycle.
//!
//! Every temp file this crate creates (uploaded voice prompts and encoded
//! outputs) is owned as a [`tempfile::TempPath`], so deletion happens on
//! drop on every exit path. `TempPath` deletion is best-effort by design: a
//! missing or locked file never surfaces as an error during cleanup.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;

/// A rendered 16-bit PCM WAV on disk, plus its sample rate.
///
/// The file is deleted when the artifact is dropped; the session keeps the
/// most recent one alive as the "last output" for repeated playback and
/// download without regenerating.
#[derive(Debug)]
pub struct EncodedArtifact {
    path: TempPath,
    sample_rate: u32,
}

impl EncodedArtifact {
    pub(crate) fn new(path: TempPath, sample_rate: u32) -> Self {
        Self { path, sample_rate }
    }

    /// Path to the WAV file. Valid for the lifetime of the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Read the entire container back, e.g. to serve a download.
    pub fn read_bytes(&self) -> io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}

/// Owns the temp files backing uploaded voice prompts for the lifetime of a
/// session. A prompt must outlive the generation calls that reference its
/// path, and repeated uploads within one session each get their own file.
#[derive(Debug, Default)]
pub struct PromptStore {
    prompts: Vec<TempPath>,
}

impl PromptStore {
    /// Take ownership of a persisted prompt and hand back its path.
    pub(crate) fn register(&mut self, path: TempPath) -> PathBuf {
        let resolved = path.to_path_buf();
        self.prompts.push(path);
        resolved
    }

    /// Number of prompts currently kept alive.
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Delete all stored prompts now instead of waiting for session end.
    pub fn clear(&mut self) {
        self.prompts.clear();
    }
}
