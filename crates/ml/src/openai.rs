use std::env;

use agrolink_core::{Command, InfoTopic, ModelVerdict, PageKey};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{IntentModel, ModelError};

const SYSTEM_PROMPT: &str = "You are the voice assistant of AgroLink, an agricultural marketplace connecting farmers, hubs, restaurants, retailers, transport partners and customers. Classify the user's spoken request. Use intent \"navigate\" when they want to open a page and set page to one of the allowed page keys. Use \"information\" when they ask about the platform and set info_topic to one of the allowed topics. Use \"help\" when they ask what you can do. Use \"none\" when the request is unrelated or unclear. Report your confidence between 0 and 1. The transcript may be in English, Hindi, Telugu or Tamil.";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl OpenAiConfig {
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("AGROLINK_OPENAI_API_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty())?;
        let model = env::var("AGROLINK_OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let base_url = env::var("AGROLINK_OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        Some(Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiIntentModel {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiIntentModel {
    pub fn new(client: reqwest::Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    fn request_payload(&self, command: &Command) -> Value {
        json!({
            "model": self.config.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "Language: {}\nTranscript: {}",
                        command.language.display_name(),
                        command.text
                    )
                }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "voice_intent",
                    "strict": true,
                    "schema": intent_schema()
                }
            }
        })
    }
}

impl IntentModel for OpenAiIntentModel {
    fn model_name(&self) -> &'static str {
        "openai"
    }

    async fn classify(&self, command: &Command) -> Result<Option<ModelVerdict>, ModelError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(self.config.api_key.as_str())
            .json(&self.request_payload(command))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let body = match serde_json::from_str::<Value>(&raw) {
            Ok(body) => body,
            Err(error) => {
                warn!(%error, model = %self.config.model, "completion body is not JSON");
                return Ok(None);
            }
        };

        let verdict = parse_verdict(&body);
        if let Some(verdict) = &verdict {
            debug!(intent = %verdict.intent, confidence = verdict.confidence, "intent classified");
        }
        Ok(verdict)
    }
}

/// Verdict carried by a chat completion body. `None` when the content is
/// missing, is not a JSON object, or lacks an intent. Null fields count as
/// absent, so `"confidence": null` reads as 0.
pub fn parse_verdict(payload: &Value) -> Option<ModelVerdict> {
    let Some(content) = extract_completion_content(payload) else {
        warn!("completion returned no content");
        return None;
    };

    let mut fields = match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => {
            warn!("completion content is not a JSON object");
            return None;
        }
        Err(error) => {
            warn!(%error, "completion content is not JSON");
            return None;
        }
    };
    fields.retain(|_, value| !value.is_null());

    match serde_json::from_value::<ModelVerdict>(Value::Object(fields)) {
        Ok(verdict) => Some(verdict),
        Err(error) => {
            warn!(%error, "completion content did not match the intent schema");
            None
        }
    }
}

/// JSON schema the completion is constrained to.
pub fn intent_schema() -> Value {
    let mut pages = PageKey::ALL
        .iter()
        .map(|page| Value::from(page.as_key()))
        .collect::<Vec<_>>();
    pages.push(Value::Null);
    let mut topics = InfoTopic::ALL
        .iter()
        .map(|topic| Value::from(topic.as_key()))
        .collect::<Vec<_>>();
    topics.push(Value::Null);

    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["intent", "page", "info_topic", "confidence"],
        "properties": {
            "intent": {
                "type": "string",
                "enum": ["navigate", "information", "help", "none"]
            },
            "page": { "type": ["string", "null"], "enum": pages },
            "info_topic": { "type": ["string", "null"], "enum": topics },
            "confidence": { "type": "number", "minimum": 0, "maximum": 1 }
        }
    })
}

pub fn extract_completion_content(payload: &Value) -> Option<String> {
    payload
        .get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrolink_core::Language;

    #[test]
    fn extracts_first_choice_content() {
        let body = json!({
            "choices": [
                { "message": { "role": "assistant", "content": " {\"intent\":\"help\"} " } }
            ]
        });
        assert_eq!(
            extract_completion_content(&body).as_deref(),
            Some("{\"intent\":\"help\"}")
        );
        assert_eq!(extract_completion_content(&json!({ "choices": [] })), None);
        assert_eq!(
            extract_completion_content(&json!({ "choices": [{ "message": { "content": null } }] })),
            None
        );
    }

    fn completion(content: &str) -> Value {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
    }

    #[test]
    fn verdict_parsing_tolerates_nulls_and_rejects_garbage() {
        let verdict = parse_verdict(&completion(
            r#"{"intent":"navigate","page":"orders","info_topic":null,"confidence":null}"#,
        ))
        .unwrap();
        assert_eq!(verdict.intent, "navigate");
        assert_eq!(verdict.page.as_deref(), Some("orders"));
        assert_eq!(verdict.info_topic, None);
        assert_eq!(verdict.confidence, 0.0);

        assert_eq!(parse_verdict(&completion("not json at all")), None);
        assert_eq!(parse_verdict(&completion("[1, 2]")), None);
        assert_eq!(parse_verdict(&completion(r#"{"page":"orders","confidence":0.9}"#)), None);
        assert_eq!(parse_verdict(&completion(r#"{"intent":null,"confidence":0.9}"#)), None);
        assert_eq!(parse_verdict(&json!({ "error": "nope" })), None);
    }

    #[test]
    fn schema_lists_every_page_and_topic() {
        let schema = intent_schema();
        let pages = schema["properties"]["page"]["enum"].as_array().unwrap();
        assert_eq!(pages.len(), PageKey::ALL.len() + 1);
        assert!(pages.contains(&json!("hub_dashboard")));
        let topics = schema["properties"]["info_topic"]["enum"].as_array().unwrap();
        assert!(topics.contains(&Value::Null));
    }

    #[test]
    fn payload_carries_language_and_transcript() {
        let model = OpenAiIntentModel::new(
            reqwest::Client::new(),
            OpenAiConfig {
                api_key: "test".to_string(),
                model: "test-model".to_string(),
                base_url: "http://localhost:9".to_string(),
            },
        );
        let payload = model.request_payload(&Command::new("ऑर्डर खोलें", Language::Hindi));
        assert_eq!(payload["model"], "test-model");
        let user = payload["messages"][1]["content"].as_str().unwrap();
        assert!(user.contains("Language: Hindi"));
        assert!(user.contains("ऑर्डर खोलें"));
    }

    async fn stub_model(base: &str) -> OpenAiIntentModel {
        use axum::http::StatusCode;
        use axum::routing::post;

        let router = axum::Router::new()
            .route(
                "/ok/chat/completions",
                post(|| async {
                    axum::Json(completion(
                        r#"{"intent":"help","page":null,"info_topic":null,"confidence":0.7}"#,
                    ))
                }),
            )
            .route("/garbage/chat/completions", post(|| async { "<html>oops</html>" }))
            .route(
                "/down/chat/completions",
                post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "overloaded") }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        OpenAiIntentModel::new(
            reqwest::Client::new(),
            OpenAiConfig {
                api_key: "test".to_string(),
                model: "test-model".to_string(),
                base_url: format!("http://{addr}/{base}"),
            },
        )
    }

    #[tokio::test]
    async fn classify_reads_a_well_formed_completion() {
        let model = stub_model("ok").await;
        let verdict = model
            .classify(&Command::new("what can you do", Language::English))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(verdict.intent, "help");
        assert_eq!(verdict.confidence, 0.7);
    }

    #[tokio::test]
    async fn garbage_completion_is_no_verdict() {
        let model = stub_model("garbage").await;
        let verdict = model
            .classify(&Command::new("open orders", Language::English))
            .await
            .unwrap();
        assert_eq!(verdict, None);
    }

    #[tokio::test]
    async fn upstream_failure_keeps_status_and_body() {
        let model = stub_model("down").await;
        let err = model
            .classify(&Command::new("open orders", Language::English))
            .await
            .unwrap_err();
        match err {
            ModelError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("expected a status error, got {other:?}"),
        }
    }
}
