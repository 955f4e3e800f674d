mod turn;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use agrolink_core::{
    detect_language, resolve_intent, AssistantInput, AssistantReply, Command, CommandInput,
    CommandOutcome, KeywordMatcher, Language, NavigationHelper, Portal, PreloadCandidate,
    ReplyKind, RouteTable, VoiceError,
};
use agrolink_ml::IntentModel;
use agrolink_observability::AppMetrics;
use tracing::{info, instrument, warn};

pub use turn::{TurnEnd, TurnReport, VoiceMode};

/// Routes transcripts for both the portal widgets (keyword tables) and the
/// global assistant (intent model). Built once by the composition root.
pub struct VoiceAgent<M>
where
    M: IntentModel,
{
    matchers: HashMap<Portal, KeywordMatcher>,
    model: M,
    navigation: Arc<NavigationHelper>,
    metrics: Arc<AppMetrics>,
}

impl<M> VoiceAgent<M>
where
    M: IntentModel,
{
    pub fn new(model: M, navigation: Arc<NavigationHelper>, metrics: Arc<AppMetrics>) -> Self {
        let matchers = Portal::ALL
            .into_iter()
            .map(|portal| {
                let table = navigation.catalog().table(portal).clone();
                (portal, KeywordMatcher::new(table))
            })
            .collect();

        Self {
            matchers,
            model,
            navigation,
            metrics,
        }
    }

    pub fn model_name(&self) -> &'static str {
        self.model.model_name()
    }

    pub fn routes(&self, portal: Portal) -> &RouteTable {
        self.navigation.catalog().table(portal)
    }

    pub fn preload(&self, portal: Portal, client_id: Option<&str>) -> Vec<PreloadCandidate> {
        self.navigation.preload_candidates(portal, client_id)
    }

    #[instrument(skip(self, input), fields(portal = input.portal.as_str()))]
    pub fn handle_command(&self, input: CommandInput) -> CommandOutcome {
        if input.text.trim().is_empty() {
            return CommandOutcome::Ignored;
        }
        let started = Instant::now();
        self.metrics.inc_command();

        let language = resolve_language(input.language.as_deref(), &input.text);
        let command = Command::new(input.text, language);
        let client_id = supplied_client_id(input.client_id);
        let current_path = input.current_path.or_else(|| {
            client_id
                .as_deref()
                .and_then(|client_id| self.navigation.current_path(client_id))
        });

        let outcome = self.matcher(input.portal).handle(&command, current_path.as_deref());
        match &outcome {
            CommandOutcome::Navigate { path, .. } => {
                self.navigation.record_visit(client_id.as_deref(), path);
                self.metrics.inc_navigation();
            }
            CommandOutcome::NotRecognized { .. } => self.metrics.inc_not_recognized(),
            CommandOutcome::AlreadyOnRoute { .. } | CommandOutcome::Ignored => {}
        }

        self.metrics.observe_latency(started.elapsed());
        info!(
            client_id = client_id.as_deref().unwrap_or("-"),
            language = command.language.as_code(),
            target = outcome.navigation_target().unwrap_or("-"),
            "voice command handled"
        );
        outcome
    }

    /// `Ok(None)` for a blank transcript: nothing is sent to the model.
    #[instrument(skip(self, input))]
    pub async fn ask(&self, input: AssistantInput) -> Result<Option<AssistantReply>, VoiceError> {
        if input.text.trim().is_empty() {
            return Ok(None);
        }
        let started = Instant::now();
        self.metrics.inc_command();

        let language = resolve_language(input.language.as_deref(), &input.text);
        let command = Command::new(input.text, language);
        let client_id = supplied_client_id(input.client_id);

        self.metrics.inc_model_call();
        let verdict = match self.model.classify(&command).await {
            Ok(verdict) => verdict,
            Err(error) => {
                self.metrics.inc_failure();
                warn!(%error, model = self.model.model_name(), "intent model call failed");
                return Err(VoiceError::Completion(error.to_string()));
            }
        };

        let reply = resolve_intent(verdict.as_ref(), language);
        match reply.kind {
            ReplyKind::Help => self.metrics.inc_help_fallback(),
            ReplyKind::Navigate => {
                if let Some(path) = reply.path.as_deref() {
                    self.navigation.record_visit(client_id.as_deref(), path);
                    self.metrics.inc_navigation();
                }
            }
            ReplyKind::Information => {}
        }

        self.metrics.observe_latency(started.elapsed());
        info!(
            client_id = client_id.as_deref().unwrap_or("-"),
            language = language.as_code(),
            kind = ?reply.kind,
            confidence = reply.confidence,
            model = self.model.model_name(),
            "assistant request handled"
        );
        Ok(Some(reply))
    }

    fn matcher(&self, portal: Portal) -> &KeywordMatcher {
        // new() builds a matcher for every portal
        &self.matchers[&portal]
    }
}

fn resolve_language(explicit: Option<&str>, text: &str) -> Language {
    let explicit = explicit
        .filter(|value| !value.trim().is_empty())
        .map(|value| Language::from_optional_str(Some(value)));
    detect_language(explicit, text)
}

fn supplied_client_id(client_id: Option<String>) -> Option<String> {
    client_id.filter(|id| !id.trim().is_empty())
}
