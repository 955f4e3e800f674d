//! Speech input/output seams. Whether speech is available is decided once
//! when the front end starts and carried as a [`SpeechCapability`].

use std::collections::VecDeque;
use std::future::Future;

use crate::error::VoiceError;
use crate::models::{Command, Language};

pub trait SpeechRecognizer: Send {
    /// Resolves with the next final transcript. `Ok(None)` means the input
    /// stream was closed.
    fn next_final(
        &mut self,
        language: Language,
    ) -> impl Future<Output = Result<Option<Command>, VoiceError>> + Send;

    /// Best-effort cancel of the underlying stream.
    fn stop(&mut self);
}

pub trait SpeechSynthesizer: Send {
    fn speak(
        &mut self,
        text: &str,
        language: Language,
    ) -> impl Future<Output = Result<(), VoiceError>> + Send;
}

#[derive(Debug)]
pub enum SpeechCapability<R> {
    Supported(R),
    Unsupported { reason: String },
}

impl<R: SpeechRecognizer> SpeechCapability<R> {
    pub fn resolve(recognizer: Option<R>, reason: impl Into<String>) -> Self {
        match recognizer {
            Some(recognizer) => Self::Supported(recognizer),
            None => Self::Unsupported {
                reason: reason.into(),
            },
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Supported(_))
    }

    pub fn recognizer_mut(&mut self) -> Result<&mut R, VoiceError> {
        match self {
            Self::Supported(recognizer) => Ok(recognizer),
            Self::Unsupported { reason } => Err(VoiceError::Unsupported(reason.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Say(String),
    /// Never produces a result; the listener has to time out.
    Silence,
    Deny,
    Fail(String),
}

/// Recognizer that replays a fixed list of steps. Used for replaying
/// transcript files and in tests.
#[derive(Debug, Default)]
pub struct ScriptedRecognizer {
    steps: VecDeque<ScriptStep>,
    stopped: bool,
}

impl ScriptedRecognizer {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            stopped: false,
        }
    }

    /// One `Say` step per non-empty line; `#silence`, `#deny` and
    /// `#fail <reason>` lines map to the other steps.
    pub fn from_lines(raw: &str) -> Self {
        let steps = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| match line {
                "#silence" => ScriptStep::Silence,
                "#deny" => ScriptStep::Deny,
                _ => match line.strip_prefix("#fail") {
                    Some(reason) => ScriptStep::Fail(reason.trim().to_string()),
                    None => ScriptStep::Say(line.to_string()),
                },
            });
        Self::new(steps)
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    pub fn was_stopped(&self) -> bool {
        self.stopped
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    async fn next_final(&mut self, language: Language) -> Result<Option<Command>, VoiceError> {
        self.stopped = false;
        match self.steps.pop_front() {
            None => Ok(None),
            Some(ScriptStep::Say(text)) => Ok(Some(Command::new(text, language))),
            Some(ScriptStep::Silence) => {
                std::future::pending::<()>().await;
                Ok(None)
            }
            Some(ScriptStep::Deny) => Err(VoiceError::PermissionDenied),
            Some(ScriptStep::Fail(reason)) => Err(VoiceError::Transcription(reason)),
        }
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

/// Synthesizer that keeps what it was asked to say.
#[derive(Debug, Default)]
pub struct RecordingSynthesizer {
    pub spoken: Vec<(String, Language)>,
}

impl SpeechSynthesizer for RecordingSynthesizer {
    async fn speak(&mut self, text: &str, language: Language) -> Result<(), VoiceError> {
        self.spoken.push((text.to_string(), language));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_script_lines() {
        let recognizer = ScriptedRecognizer::from_lines("open orders\n\n#silence\n#fail network down\n#deny");
        assert_eq!(recognizer.remaining(), 4);
        assert_eq!(
            recognizer.steps.get(2),
            Some(&ScriptStep::Fail("network down".to_string()))
        );
    }

    #[test]
    fn unsupported_capability_reports_reason() {
        let mut capability =
            SpeechCapability::<ScriptedRecognizer>::resolve(None, "no microphone found");
        assert!(!capability.is_supported());
        let err = capability.recognizer_mut().unwrap_err();
        assert!(matches!(err, VoiceError::Unsupported(reason) if reason == "no microphone found"));
    }

    #[tokio::test]
    async fn replays_steps_in_order() {
        let mut recognizer = ScriptedRecognizer::from_lines("open orders\n#deny");
        let first = recognizer.next_final(Language::Hindi).await.unwrap().unwrap();
        assert_eq!(first.text, "open orders");
        assert_eq!(first.language, Language::Hindi);
        assert!(matches!(
            recognizer.next_final(Language::English).await,
            Err(VoiceError::PermissionDenied)
        ));
        assert!(recognizer.next_final(Language::English).await.unwrap().is_none());
    }
}
