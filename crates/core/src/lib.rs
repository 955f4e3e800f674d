pub mod capability;
pub mod error;
pub mod intent;
pub mod matcher;
pub mod messages;
pub mod models;
pub mod navigation;
pub mod reply;
pub mod routes;
pub mod session;

pub use capability::{
    RecordingSynthesizer, ScriptStep, ScriptedRecognizer, SpeechCapability, SpeechRecognizer,
    SpeechSynthesizer,
};
pub use error::{Severity, VoiceError};
pub use intent::{classify_intent_rules, detect_language, normalize_text};
pub use matcher::{match_route, strip_command, KeywordMatcher, MatchKind};
pub use messages::{
    entry, lookup, render, render_route, route_label, Localized, MessageKey,
};
pub use models::*;
pub use navigation::{NavigationHelper, PreloadCandidate};
pub use reply::{help_reply, resolve_intent, MIN_CONFIDENCE};
pub use routes::{RouteCatalog, RouteEntry, RouteTable};
pub use session::{ListenEnd, SessionEvent, SessionState, VoiceSession, DEFAULT_LISTEN_TIMEOUT};
