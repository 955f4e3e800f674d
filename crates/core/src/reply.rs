use crate::messages::{entry, lookup, MessageKey};
use crate::models::{
    AssistantReply, InfoTopic, Intent, Language, ModelVerdict, PageKey, ReplyKind,
};

/// Below this the model's answer is treated as a guess and the user gets
/// the help text instead.
pub const MIN_CONFIDENCE: f32 = 0.3;

/// Turns the model output into the reply shown and spoken to the user.
/// Low-confidence or empty output never navigates.
pub fn resolve_intent(verdict: Option<&ModelVerdict>, language: Language) -> AssistantReply {
    let Some(verdict) = verdict else {
        return help_reply(language, 0.0);
    };

    let confidence = if verdict.confidence.is_finite() {
        verdict.confidence.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let intent = Intent::parse(&verdict.intent);
    if intent == Intent::None || confidence < MIN_CONFIDENCE {
        return help_reply(language, confidence);
    }

    match intent {
        Intent::Navigate => navigate_reply(verdict.page.as_deref(), language, confidence),
        Intent::Information => {
            information_reply(verdict.info_topic.as_deref(), language, confidence)
        }
        Intent::Help | Intent::None => help_reply(language, confidence),
    }
}

pub fn help_reply(language: Language, confidence: f32) -> AssistantReply {
    AssistantReply {
        kind: ReplyKind::Help,
        message: lookup(MessageKey::Help, language).to_string(),
        path: None,
        page: None,
        topic: None,
        confidence,
        language,
    }
}

fn navigate_reply(page: Option<&str>, language: Language, confidence: f32) -> AssistantReply {
    match page.and_then(PageKey::parse) {
        Some(page) => AssistantReply {
            kind: ReplyKind::Navigate,
            message: lookup(MessageKey::Page(page), language).to_string(),
            path: Some(page.path().to_string()),
            page: Some(page),
            topic: None,
            confidence,
            language,
        },
        None => {
            let target = page
                .map(str::trim)
                .filter(|raw| !raw.is_empty())
                .unwrap_or("that page");
            AssistantReply {
                kind: ReplyKind::Navigate,
                message: format!("Navigating to {target}..."),
                path: None,
                page: None,
                topic: None,
                confidence,
                language,
            }
        }
    }
}

fn information_reply(topic: Option<&str>, language: Language, confidence: f32) -> AssistantReply {
    let (topic, message) = match topic.and_then(InfoTopic::parse) {
        Some(topic) => (Some(topic), lookup(MessageKey::Topic(topic), language)),
        None => (
            None,
            entry(MessageKey::Topic(InfoTopic::Platform)).english,
        ),
    };

    AssistantReply {
        kind: ReplyKind::Information,
        message: message.to_string(),
        path: None,
        page: None,
        topic,
        confidence,
        language,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(intent: &str, page: Option<&str>, topic: Option<&str>, confidence: f32) -> ModelVerdict {
        ModelVerdict {
            intent: intent.to_string(),
            page: page.map(str::to_string),
            info_topic: topic.map(str::to_string),
            confidence,
        }
    }

    #[test]
    fn low_confidence_never_navigates() {
        let reply = resolve_intent(
            Some(&verdict("navigate", Some("orders"), None, 0.29)),
            Language::English,
        );
        assert_eq!(reply.kind, ReplyKind::Help);
        assert!(reply.path.is_none());
    }

    #[test]
    fn none_intent_and_missing_output_give_help() {
        let reply = resolve_intent(Some(&verdict("none", None, None, 0.99)), Language::Hindi);
        assert_eq!(reply.kind, ReplyKind::Help);
        assert_eq!(reply.message, lookup(MessageKey::Help, Language::Hindi));

        let reply = resolve_intent(None, Language::English);
        assert_eq!(reply.kind, ReplyKind::Help);
    }

    #[test]
    fn known_page_navigates_with_localized_text() {
        let reply = resolve_intent(
            Some(&verdict("navigate", Some("marketplace"), None, 0.9)),
            Language::Telugu,
        );
        assert_eq!(reply.kind, ReplyKind::Navigate);
        assert_eq!(reply.path.as_deref(), Some("/marketplace"));
        assert_eq!(reply.message, "మార్కెట్‌ప్లేస్ తెరుస్తున్నాం.");
    }

    #[test]
    fn missing_translation_uses_english() {
        let reply = resolve_intent(
            Some(&verdict("navigate", Some("about"), None, 0.9)),
            Language::Tamil,
        );
        assert_eq!(reply.message, "Opening the about page.");
    }

    #[test]
    fn unknown_page_is_synthesized_without_path() {
        let reply = resolve_intent(
            Some(&verdict("navigate", Some("weather station"), None, 0.8)),
            Language::Hindi,
        );
        assert_eq!(reply.kind, ReplyKind::Navigate);
        assert_eq!(reply.message, "Navigating to weather station...");
        assert!(reply.path.is_none());
    }

    #[test]
    fn unknown_topic_uses_english_default() {
        let reply = resolve_intent(
            Some(&verdict("information", None, Some("tractors"), 0.8)),
            Language::Hindi,
        );
        assert_eq!(reply.kind, ReplyKind::Information);
        assert!(reply.topic.is_none());
        assert!(reply.message.starts_with("AgroLink connects farmers"));
    }

    #[test]
    fn non_finite_confidence_is_treated_as_zero() {
        let reply = resolve_intent(
            Some(&verdict("navigate", Some("orders"), None, f32::NAN)),
            Language::English,
        );
        assert_eq!(reply.kind, ReplyKind::Help);
    }
}
