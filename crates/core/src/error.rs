use thiserror::Error;

use crate::session::{SessionEvent, SessionState};

/// How a failure is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Capability or permission problem; shown immediately, never retried.
    Blocking,
    /// The command is discarded and the session goes back to idle.
    Destructive,
    /// Programming error inside the session driver.
    Internal,
}

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("microphone permission denied")]
    PermissionDenied,
    #[error("speech capability not supported: {0}")]
    Unsupported(String),
    #[error("transcription failed: {0}")]
    Transcription(String),
    #[error("intent completion failed: {0}")]
    Completion(String),
    #[error("invalid session transition from {from:?} on {event:?}")]
    InvalidTransition {
        from: SessionState,
        event: SessionEvent,
    },
}

impl VoiceError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::PermissionDenied | Self::Unsupported(_) => Severity::Blocking,
            Self::Transcription(_) | Self::Completion(_) => Severity::Destructive,
            Self::InvalidTransition { .. } => Severity::Internal,
        }
    }
}
