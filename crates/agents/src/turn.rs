use agrolink_core::{
    lookup, AssistantInput, CommandInput, CommandOutcome, Language, ListenEnd, MessageKey,
    Portal, SessionEvent, Severity, SpeechCapability, SpeechRecognizer, SpeechSynthesizer,
    VoiceError, VoiceSession,
};
use agrolink_ml::IntentModel;
use serde::Serialize;
use tracing::{debug, warn};

use crate::VoiceAgent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceMode {
    /// Floating widget of a portal, keyword routing.
    Widget(Portal),
    /// Global assistant, intent model.
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnEnd {
    Completed,
    Ignored,
    Stopped,
    TimedOut,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    pub end: TurnEnd,
    pub transcript: Option<String>,
    pub message: Option<String>,
    pub navigate_to: Option<String>,
    #[serde(skip)]
    pub severity: Option<Severity>,
}

impl TurnReport {
    fn ended(end: TurnEnd, message: Option<String>) -> Self {
        Self {
            end,
            transcript: None,
            message,
            navigate_to: None,
            severity: None,
        }
    }

    fn failed(error: &VoiceError, language: Language) -> Self {
        let key = match error {
            VoiceError::PermissionDenied => MessageKey::PermissionDenied,
            VoiceError::Unsupported(_) => MessageKey::Unsupported,
            VoiceError::Transcription(_)
            | VoiceError::Completion(_)
            | VoiceError::InvalidTransition { .. } => MessageKey::ProcessingFailed,
        };
        Self {
            end: TurnEnd::Failed,
            transcript: None,
            message: Some(lookup(key, language).to_string()),
            navigate_to: None,
            severity: Some(error.severity()),
        }
    }
}

impl<M> VoiceAgent<M>
where
    M: IntentModel,
{
    /// Runs one listen → think → speak cycle. Every path leaves the session
    /// idle again.
    pub async fn run_turn<R, S>(
        &self,
        session: &mut VoiceSession,
        capability: &mut SpeechCapability<R>,
        synthesizer: &mut S,
        mode: VoiceMode,
        language: Language,
        client_id: &str,
    ) -> TurnReport
    where
        R: SpeechRecognizer,
        S: SpeechSynthesizer,
    {
        let recognizer = match capability.recognizer_mut() {
            Ok(recognizer) => recognizer,
            Err(error) => {
                warn!(%error, "speech recognition unavailable");
                return TurnReport::failed(&error, language);
            }
        };

        if let Err(error) = session.apply(SessionEvent::Start) {
            warn!(%error, "voice session busy");
            return TurnReport::failed(&error, language);
        }

        let heard = tokio::time::timeout(session.listen_timeout(), recognizer.next_final(language)).await;
        let command = match heard {
            Err(_) => {
                recognizer.stop();
                let _ = session.end_listening(ListenEnd::TimedOut);
                debug!("listening timed out");
                return TurnReport::ended(
                    TurnEnd::TimedOut,
                    Some(lookup(MessageKey::ListenTimeout, language).to_string()),
                );
            }
            Ok(Ok(None)) => {
                recognizer.stop();
                let _ = session.end_listening(ListenEnd::Stopped);
                return TurnReport::ended(TurnEnd::Stopped, None);
            }
            Ok(Err(error)) => {
                recognizer.stop();
                session.reset();
                warn!(%error, "speech recognition failed");
                return TurnReport::failed(&error, language);
            }
            Ok(Ok(Some(command))) => command,
        };

        if let Err(error) = session.end_listening(ListenEnd::Transcript) {
            session.reset();
            return TurnReport::failed(&error, language);
        }

        let transcript = command.text.clone();
        let (message, navigate_to) = match mode {
            VoiceMode::Widget(portal) => {
                let outcome = self.handle_command(CommandInput {
                    portal,
                    text: command.text,
                    language: Some(command.language.as_code().to_string()),
                    current_path: None,
                    client_id: Some(client_id.to_string()),
                });
                match outcome {
                    CommandOutcome::Ignored => None,
                    other => Some((
                        other.message().unwrap_or_default().to_string(),
                        other.navigation_target().map(str::to_string),
                    )),
                }
            }
            VoiceMode::Assistant => {
                let asked = self
                    .ask(AssistantInput {
                        text: command.text,
                        language: Some(command.language.as_code().to_string()),
                        client_id: Some(client_id.to_string()),
                    })
                    .await;
                match asked {
                    Ok(Some(reply)) => Some((reply.message, reply.path)),
                    Ok(None) => None,
                    Err(error) => {
                        session.reset();
                        let mut report = TurnReport::failed(&error, command.language);
                        report.transcript = Some(transcript);
                        return report;
                    }
                }
            }
        }
        .unzip();

        let Some(message) = message else {
            let _ = session.apply(SessionEvent::Stop);
            return TurnReport {
                transcript: Some(transcript),
                ..TurnReport::ended(TurnEnd::Ignored, None)
            };
        };
        let navigate_to = navigate_to.flatten();

        if session.apply(SessionEvent::Replied).is_ok() {
            if let Err(error) = synthesizer.speak(&message, command.language).await {
                warn!(%error, "speech synthesis failed");
            }
            let _ = session.apply(SessionEvent::Finished);
        }
        session.reset();

        TurnReport {
            end: TurnEnd::Completed,
            transcript: Some(transcript),
            message: Some(message),
            navigate_to,
            severity: None,
        }
    }
}
