use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{InfoTopic, Intent, Language, ModelVerdict, PageKey};

static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{M}\p{Nd}\s']+").expect("valid punctuation regex"));

/// Lowercases, drops punctuation and collapses whitespace.
pub fn normalize_text(input: &str) -> String {
    PUNCTUATION
        .replace_all(input, " ")
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Picks the language from the script of the transcript when the caller did
/// not name one.
pub fn detect_language(explicit: Option<Language>, text: &str) -> Language {
    if let Some(language) = explicit {
        return language;
    }

    let mut devanagari = 0usize;
    let mut telugu = 0usize;
    let mut tamil = 0usize;

    for ch in text.chars() {
        let code = ch as u32;
        if (0x0900..=0x097F).contains(&code) {
            devanagari += 1;
        } else if (0x0C00..=0x0C7F).contains(&code) {
            telugu += 1;
        } else if (0x0B80..=0x0BFF).contains(&code) {
            tamil += 1;
        }
    }

    if devanagari > 0 && devanagari >= telugu && devanagari >= tamil {
        Language::Hindi
    } else if telugu > 0 && telugu >= tamil {
        Language::Telugu
    } else if tamil > 0 {
        Language::Tamil
    } else {
        Language::English
    }
}

const PAGE_ALIASES: &[(PageKey, &[&str])] = &[
    (PageKey::FarmerDashboard, &["farmer dashboard", "farmer portal", "farmer"]),
    (PageKey::HubDashboard, &["hub dashboard", "hub portal", "hub"]),
    (PageKey::RestaurantDashboard, &["restaurant dashboard", "restaurant"]),
    (PageKey::RetailDashboard, &["retail dashboard", "retail", "store"]),
    (PageKey::TransportDashboard, &["transport dashboard", "transport", "transporter"]),
    (PageKey::CustomerDashboard, &["customer dashboard", "customer"]),
    (PageKey::Marketplace, &["marketplace", "market", "shop"]),
    (PageKey::Orders, &["orders", "order", "my orders"]),
    (PageKey::Login, &["login", "log in", "sign in"]),
    (PageKey::Register, &["register", "sign up", "registration"]),
    (PageKey::Contact, &["contact", "support"]),
    (PageKey::About, &["about page", "about us"]),
    (PageKey::Home, &["home page", "home", "main page"]),
];

const TOPIC_CUES: &[(InfoTopic, &[&str])] = &[
    (InfoTopic::Payments, &["payment", "pay ", "money", "paid"]),
    (InfoTopic::Orders, &["order", "track"]),
    (InfoTopic::Transport, &["transport", "deliver", "truck", "shipping"]),
    (InfoTopic::Hubs, &["hub"]),
    (InfoTopic::Farmers, &["farmer", "farming", "sell my"]),
    (
        InfoTopic::Sustainability,
        &["sustainab", "environment", "waste", "green"],
    ),
    (InfoTopic::Platform, &["agrolink", "platform", "this app", "this site"]),
];

const NAVIGATION_CUES: &[&str] = &[
    "go to",
    "open",
    "take me",
    "navigate",
    "show",
    "switch to",
    "visit",
];

const INFORMATION_CUES: &[&str] = &[
    "what",
    "how",
    "why",
    "tell me",
    "explain",
    "about",
    "information",
    "info",
];

const HELP_CUES: &[&str] = &["help", "what can you do", "assist", "commands"];

/// Offline stand-in for the intent model: a handful of keyword cues with
/// fixed confidences.
pub fn classify_intent_rules(text: &str) -> ModelVerdict {
    let lower = normalize_text(text);
    if lower.is_empty() {
        return verdict(Intent::None, None, None, 0.0);
    }

    if contains_any(&lower, HELP_CUES) {
        return verdict(Intent::Help, None, None, 0.7);
    }

    let page = find_page(&lower);
    let topic = find_topic(&lower);
    let wants_navigation = contains_any(&lower, NAVIGATION_CUES);
    let wants_information = contains_any(&lower, INFORMATION_CUES);

    match (page, topic) {
        (Some(page), _) if wants_navigation => verdict(Intent::Navigate, Some(page), None, 0.85),
        (_, Some(topic)) if wants_information => {
            verdict(Intent::Information, None, Some(topic), 0.75)
        }
        (None, None) if wants_information => verdict(Intent::Information, None, None, 0.35),
        (Some(page), _) => verdict(Intent::Navigate, Some(page), None, 0.55),
        (None, Some(topic)) => verdict(Intent::Information, None, Some(topic), 0.45),
        (None, None) => verdict(Intent::None, None, None, 0.1),
    }
}

fn find_page(lower: &str) -> Option<PageKey> {
    PAGE_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|alias| contains_phrase(lower, alias)))
        .map(|(page, _)| *page)
}

fn find_topic(lower: &str) -> Option<InfoTopic> {
    let padded = format!("{lower} ");
    TOPIC_CUES
        .iter()
        .find(|(_, cues)| contains_any(&padded, cues))
        .map(|(topic, _)| *topic)
}

fn verdict(
    intent: Intent,
    page: Option<PageKey>,
    topic: Option<InfoTopic>,
    confidence: f32,
) -> ModelVerdict {
    let intent = match intent {
        Intent::Navigate => "navigate",
        Intent::Information => "information",
        Intent::Help => "help",
        Intent::None => "none",
    };
    ModelVerdict {
        intent: intent.to_string(),
        page: page.map(|page| page.as_key().to_string()),
        info_topic: topic.map(|topic| topic.as_key().to_string()),
        confidence,
    }
}

/// Whole-word phrase containment on normalized text.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    format!(" {haystack} ").contains(&format!(" {phrase} "))
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
