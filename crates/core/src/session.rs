//! Per-widget voice session: `idle → listening → thinking → speaking → idle`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::VoiceError;

pub const DEFAULT_LISTEN_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Listening,
    Thinking,
    Speaking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    Start,
    /// A final recognition result arrived.
    Transcript,
    Stop,
    Timeout,
    Replied,
    Finished,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenEnd {
    Transcript,
    Stopped,
    TimedOut,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub from: SessionState,
    pub to: SessionState,
    pub event: SessionEvent,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct VoiceSession {
    state: SessionState,
    listen_timeout: Duration,
    listening_since: Option<DateTime<Utc>>,
    history: Vec<Transition>,
}

impl VoiceSession {
    pub fn new(listen_timeout: Duration) -> Self {
        Self {
            state: SessionState::Idle,
            listen_timeout,
            listening_since: None,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn listen_timeout(&self) -> Duration {
        self.listen_timeout
    }

    pub fn listening_since(&self) -> Option<DateTime<Utc>> {
        self.listening_since
    }

    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    /// Applies an event. Invalid transitions leave the state untouched.
    pub fn apply(&mut self, event: SessionEvent) -> Result<SessionState, VoiceError> {
        let next = next_state(self.state, event).ok_or(VoiceError::InvalidTransition {
            from: self.state,
            event,
        })?;

        let now = Utc::now();
        self.listening_since = (next == SessionState::Listening).then_some(now);
        self.history.push(Transition {
            from: self.state,
            to: next,
            event,
            at: now,
        });
        self.state = next;
        Ok(next)
    }

    /// Ends a listening phase for the given reason.
    pub fn end_listening(&mut self, end: ListenEnd) -> Result<SessionState, VoiceError> {
        let event = match end {
            ListenEnd::Transcript => SessionEvent::Transcript,
            ListenEnd::Stopped => SessionEvent::Stop,
            ListenEnd::TimedOut => SessionEvent::Timeout,
        };
        self.apply(event)
    }

    /// Drops back to idle from wherever the session is.
    pub fn reset(&mut self) {
        if self.state != SessionState::Idle {
            // Failed is valid from every state
            let _ = self.apply(SessionEvent::Failed);
        }
    }
}

impl Default for VoiceSession {
    fn default() -> Self {
        Self::new(DEFAULT_LISTEN_TIMEOUT)
    }
}

fn next_state(from: SessionState, event: SessionEvent) -> Option<SessionState> {
    use SessionEvent as E;
    use SessionState as S;

    match (from, event) {
        (_, E::Failed) => Some(S::Idle),
        (S::Idle, E::Start) => Some(S::Listening),
        (S::Listening, E::Transcript) => Some(S::Thinking),
        (S::Listening, E::Stop | E::Timeout) => Some(S::Idle),
        (S::Thinking, E::Replied) => Some(S::Speaking),
        (S::Thinking, E::Stop) => Some(S::Idle),
        (S::Speaking, E::Finished | E::Stop) => Some(S::Idle),
        _ => None,
    }
}
