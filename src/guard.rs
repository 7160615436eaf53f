//! Memory reclamation hooks and generation-failure classification.
//!
//! Model loads and generation runs can exhaust host virtual memory or
//! accelerator memory. The pipeline cannot fix that, but it can (a) ask the
//! runtime to drop cached-but-unused memory before and after every attempt,
//! and (b) tell the user which of the known failure modes they hit and what
//! actually helps.

use std::fmt;

/// Best-effort memory reclamation at the runtime boundary.
///
/// Implementations typically empty the accelerator's allocator cache and
/// trigger a host-side collection pass. The hooks are advisory: correctness
/// never depends on them, and a no-op implementation is valid.
pub trait MemoryReclaimer {
    fn release_cached(&self);
}

/// The default reclaimer: does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReclaimer;

impl MemoryReclaimer for NoopReclaimer {
    fn release_cached(&self) {}
}

/// Runs the reclamation hook when dropped, so the post-call pass executes on
/// every exit path, including early returns and unwinding.
pub(crate) struct ReclaimOnDrop<'a>(pub(crate) &'a dyn MemoryReclaimer);

impl Drop for ReclaimOnDrop<'_> {
    fn drop(&mut self) {
        self.0.release_cached();
    }
}

/// What kind of resource exhaustion a generation failure looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Host virtual-memory backing store too small (Windows error 1455).
    PagingFileExhausted,
    /// Accelerator ran out of memory.
    DeviceOutOfMemory,
    /// Anything else.
    Unclassified,
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureClass::PagingFileExhausted => f.write_str("paging file exhausted"),
            FailureClass::DeviceOutOfMemory => f.write_str("device out of memory"),
            FailureClass::Unclassified => f.write_str("unclassified"),
        }
    }
}

impl FailureClass {
    /// Static remediation hint shown alongside the error message.
    ///
    /// The classifier only informs; it never retries or downgrades the
    /// variant on the user's behalf.
    pub fn remediation(self) -> &'static str {
        match self {
            FailureClass::PagingFileExhausted => {
                "The system paging file is too small to map the model weights. \
                 Increase the Windows virtual memory allocation (16 GB or more), \
                 or switch to the Turbo variant, which has the smallest footprint."
            }
            FailureClass::DeviceOutOfMemory => {
                "Out of memory. Try the Turbo variant, close other applications, \
                 or load the model on the CPU instead of the accelerator."
            }
            FailureClass::Unclassified => {
                "Check that the model weights are installed and that enough \
                 RAM/VRAM is available."
            }
        }
    }
}

/// Classify a failure by matching known indicator substrings in its display
/// text. The match strings are brittle across locales; structured error
/// codes from the runtime would be more robust where available.
pub fn classify_failure(message: &str) -> FailureClass {
    let msg = message.to_ascii_lowercase();
    if msg.contains("paging file") || msg.contains("1455") {
        FailureClass::PagingFileExhausted
    } else if msg.contains("out of memory") || msg.contains("oom") {
        FailureClass::DeviceOutOfMemory
    } else {
        FailureClass::Unclassified
    }
}
