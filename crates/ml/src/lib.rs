mod openai;

use std::future::Future;

use agrolink_core::{classify_intent_rules, Command, ModelVerdict};
use thiserror::Error;

pub use openai::{
    extract_completion_content, intent_schema, parse_verdict, OpenAiConfig, OpenAiIntentModel,
};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("intent request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("intent endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Classifies a transcript. `Ok(None)` means the model produced no usable
/// output, which callers treat the same as a low-confidence answer.
pub trait IntentModel: Send + Sync {
    fn model_name(&self) -> &'static str;

    fn classify(
        &self,
        command: &Command,
    ) -> impl Future<Output = Result<Option<ModelVerdict>, ModelError>> + Send;
}

#[derive(Debug, Default, Clone)]
pub struct RuleIntentModel;

impl IntentModel for RuleIntentModel {
    fn model_name(&self) -> &'static str {
        "rules"
    }

    async fn classify(&self, command: &Command) -> Result<Option<ModelVerdict>, ModelError> {
        Ok(Some(classify_intent_rules(&command.text)))
    }
}

/// The model actually wired into the service: the hosted completion when an
/// API key is configured, the offline rules otherwise.
#[derive(Debug, Clone)]
pub enum IntentEngine {
    OpenAi(OpenAiIntentModel),
    Rules(RuleIntentModel),
}

impl IntentEngine {
    pub fn load(client: reqwest::Client, config: Option<OpenAiConfig>) -> Self {
        match config {
            Some(config) => Self::OpenAi(OpenAiIntentModel::new(client, config)),
            None => Self::Rules(RuleIntentModel),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::OpenAi(_))
    }
}

impl IntentModel for IntentEngine {
    fn model_name(&self) -> &'static str {
        match self {
            Self::OpenAi(model) => model.model_name(),
            Self::Rules(model) => model.model_name(),
        }
    }

    async fn classify(&self, command: &Command) -> Result<Option<ModelVerdict>, ModelError> {
        match self {
            Self::OpenAi(model) => model.classify(command).await,
            Self::Rules(model) => model.classify(command).await,
        }
    }
}
