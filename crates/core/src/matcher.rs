use serde::Serialize;

use crate::intent::{contains_phrase, normalize_text};
use crate::messages::{render, render_route, MessageKey};
use crate::models::{Command, CommandOutcome};
use crate::routes::{RouteEntry, RouteTable};

/// Longest first, so "show me" wins over "show".
const COMMAND_PREFIXES: &[&str] = &[
    "navigate to",
    "take me to",
    "switch to",
    "open up",
    "go to",
    "show me",
    "find me",
    "open",
    "show",
    "view",
    "display",
    "find",
];

const POLITE_PREFIXES: &[&str] = &["please", "can you", "could you"];

const LEADING_ARTICLES: &[&str] = &["the", "my", "our"];

const TRAILING_WORDS: &[&str] = &["page", "section", "tab", "screen", "please"];

/// Shortest text allowed to match when it is contained in a keyword rather
/// than the other way round.
const MIN_REVERSE_MATCH_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Contains,
}

#[derive(Debug, Clone, Copy)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteEntry,
    pub keyword: &'a str,
    pub kind: MatchKind,
}

/// Reduces a spoken command to the part naming a destination.
pub fn strip_command(text: &str) -> String {
    let mut words = normalize_text(text)
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();

    strip_leading(&mut words, POLITE_PREFIXES);
    strip_leading(&mut words, COMMAND_PREFIXES);
    strip_leading(&mut words, LEADING_ARTICLES);

    while words
        .last()
        .is_some_and(|last| TRAILING_WORDS.contains(&last.as_str()))
    {
        words.pop();
    }

    words.join(" ")
}

fn strip_leading(words: &mut Vec<String>, prefixes: &[&str]) {
    for prefix in prefixes {
        let prefix_words = prefix.split(' ').collect::<Vec<_>>();
        if words.len() >= prefix_words.len()
            && words
                .iter()
                .zip(prefix_words.iter())
                .all(|(word, expected)| word == expected)
        {
            words.drain(..prefix_words.len());
            return;
        }
    }
}

/// Exact keyword hits across the whole table beat containment hits; within a
/// pass the first route in table order wins.
pub fn match_route<'a>(table: &'a RouteTable, stripped: &str) -> Option<RouteMatch<'a>> {
    if stripped.is_empty() {
        return None;
    }

    for route in &table.routes {
        if let Some(keyword) = route.keywords.iter().find(|kw| kw.as_str() == stripped) {
            return Some(RouteMatch {
                route,
                keyword,
                kind: MatchKind::Exact,
            });
        }
    }

    for route in &table.routes {
        let hit = route.keywords.iter().find(|kw| {
            contains_phrase(stripped, kw)
                || (stripped.chars().count() >= MIN_REVERSE_MATCH_CHARS
                    && contains_phrase(kw, stripped))
        });
        if let Some(keyword) = hit {
            return Some(RouteMatch {
                route,
                keyword,
                kind: MatchKind::Contains,
            });
        }
    }

    None
}

/// Deterministic keyword router used by the portal widgets.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    table: RouteTable,
}

impl KeywordMatcher {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn handle(&self, command: &Command, current_path: Option<&str>) -> CommandOutcome {
        if command.is_blank() {
            return CommandOutcome::Ignored;
        }

        let stripped = strip_command(&command.text);
        let Some(hit) = match_route(&self.table, &stripped) else {
            return CommandOutcome::NotRecognized {
                message: render(MessageKey::NotRecognized, command.language, &[]),
            };
        };

        let page = hit.route.description.as_str();
        if current_path.is_some_and(|current| same_path(current, &hit.route.path)) {
            return CommandOutcome::AlreadyOnRoute {
                path: hit.route.path.clone(),
                message: render_route(MessageKey::AlreadyOnPage, command.language, page),
            };
        }

        CommandOutcome::Navigate {
            path: hit.route.path.clone(),
            description: hit.route.description.clone(),
            message: render_route(MessageKey::NavigatingTo, command.language, page),
        }
    }
}

fn same_path(lhs: &str, rhs: &str) -> bool {
    let trim = |path: &str| -> String {
        let trimmed = path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        }
    };
    trim(lhs) == trim(rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Language, Portal};

    fn matcher(portal: Portal) -> KeywordMatcher {
        KeywordMatcher::new(RouteTable::for_portal(portal))
    }

    #[test]
    fn strips_prefixes_articles_and_trailing_words() {
        assert_eq!(strip_command("Go to the Inventory page"), "inventory");
        assert_eq!(strip_command("please navigate to reports section"), "reports");
        assert_eq!(strip_command("show me the orders"), "orders");
        assert_eq!(strip_command("open"), "");
    }

    #[test]
    fn show_me_the_orders_navigates() {
        let outcome = matcher(Portal::Hub).handle(
            &Command::new("show me the orders", Language::English),
            Some("/hub/dashboard"),
        );
        assert_eq!(outcome.navigation_target(), Some("/hub/orders"));
    }

    #[test]
    fn unknown_word_is_not_recognized() {
        let outcome = matcher(Portal::Hub)
            .handle(&Command::new("xyzzy", Language::English), Some("/hub/dashboard"));
        assert!(matches!(outcome, CommandOutcome::NotRecognized { .. }));
        assert_eq!(outcome.navigation_target(), None);
    }

    #[test]
    fn blank_input_is_ignored() {
        let outcome = matcher(Portal::Transport).handle(&Command::new("   ", Language::English), None);
        assert_eq!(outcome, CommandOutcome::Ignored);
    }

    #[test]
    fn already_on_route_does_not_navigate() {
        let outcome = matcher(Portal::Transport).handle(
            &Command::new("open fleet", Language::English),
            Some("/transport/vehicles/"),
        );
        match outcome {
            CommandOutcome::AlreadyOnRoute { path, message } => {
                assert_eq!(path, "/transport/vehicles");
                assert_eq!(message, "You are already on Fleet.");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn exact_match_beats_earlier_containment() {
        let table = RouteTable::new(
            Portal::Hub,
            vec![
                RouteEntry::new(&["order history"], "/hub/history", "History"),
                RouteEntry::new(&["order"], "/hub/orders", "Orders"),
            ],
        );
        let hit = match_route(&table, "order").unwrap();
        assert_eq!(hit.route.path, "/hub/orders");
        assert_eq!(hit.kind, MatchKind::Exact);

        let hit = match_route(&table, "history").unwrap();
        assert_eq!(hit.route.path, "/hub/history");
        assert_eq!(hit.kind, MatchKind::Contains);
    }

    #[test]
    fn containment_works_in_both_directions() {
        let table = RouteTable::for_portal(Portal::Hub);
        let hit = match_route(&table, "latest quality reports").unwrap();
        assert_eq!(hit.route.path, "/hub/quality");
        assert_eq!(hit.kind, MatchKind::Contains);

        let table = RouteTable::for_portal(Portal::Customer);
        let hit = match_route(&table, "track").unwrap();
        assert_eq!(hit.route.path, "/customer/orders");
    }

    #[test]
    fn short_fragments_do_not_match_inside_keywords() {
        let table = RouteTable::for_portal(Portal::Hub);
        assert!(match_route(&table, "a").is_none());
        assert!(match_route(&table, "").is_none());
    }

    #[test]
    fn route_names_are_translated_with_the_sentence() {
        let outcome = matcher(Portal::Hub)
            .handle(&Command::new("open inventory", Language::Hindi), None);
        assert_eq!(outcome.message(), Some("इन्वेंटरी पर जा रहे हैं..."));

        let outcome = matcher(Portal::Transport).handle(
            &Command::new("open fleet", Language::Telugu),
            Some("/transport/vehicles"),
        );
        assert_eq!(outcome.message(), Some("You are already on Fleet."));
    }

    #[test]
    fn messages_follow_command_language() {
        let outcome = matcher(Portal::Farmer)
            .handle(&Command::new("xyzzy", Language::Hindi), None);
        assert_eq!(
            outcome.message(),
            Some("क्षमा करें, मैं वह आदेश नहीं पहचान सका। कृपया फिर से प्रयास करें।")
        );
    }
}
