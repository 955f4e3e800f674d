use std::env;
use std::time::Duration;

use agrolink_ml::OpenAiConfig;
use url::Url;

const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: String,
    pub api_key: String,
    pub rate_limit_window: Duration,
    pub rate_limit_max: usize,
    pub preload_limit: usize,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub allowed_origins: Vec<String>,
    pub openai: Option<OpenAiConfig>,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            bind: env::var("AGROLINK_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            api_key: env::var("AGROLINK_API_KEY").unwrap_or_else(|_| "dev-agrolink-key".to_string()),
            rate_limit_window: Duration::from_secs(env_parse("AGROLINK_RATE_LIMIT_WINDOW_SECONDS", 60)),
            rate_limit_max: env_parse("AGROLINK_RATE_LIMIT_MAX", 120),
            preload_limit: env_parse("AGROLINK_PRELOAD_LIMIT", 3),
            connect_timeout: Duration::from_secs(env_parse("AGROLINK_HTTP_CONNECT_TIMEOUT_SECONDS", 6)),
            request_timeout: Duration::from_secs(env_parse("AGROLINK_HTTP_TIMEOUT_SECONDS", 20)),
            allowed_origins: parse_allowed_origins(env::var("AGROLINK_ALLOWED_ORIGINS").ok().as_deref()),
            openai: OpenAiConfig::from_env(),
        }
    }
}

impl Default for ApiConfig {
    /// Local defaults with no environment lookups; the intent model is the
    /// offline rules engine.
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            api_key: "dev-agrolink-key".to_string(),
            rate_limit_window: Duration::from_secs(60),
            rate_limit_max: 120,
            preload_limit: 3,
            connect_timeout: Duration::from_secs(6),
            request_timeout: Duration::from_secs(20),
            allowed_origins: parse_allowed_origins(None),
            openai: None,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Comma separated list; entries that are not http(s) origins are dropped.
pub fn parse_allowed_origins(raw: Option<&str>) -> Vec<String> {
    let origins = match raw {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .filter_map(normalize_origin)
            .collect::<Vec<_>>(),
        None => Vec::new(),
    };

    if origins.is_empty() {
        DEFAULT_ALLOWED_ORIGINS
            .iter()
            .map(|origin| origin.to_string())
            .collect()
    } else {
        origins
    }
}

fn normalize_origin(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let origin = url.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_normalized() {
        let origins = parse_allowed_origins(Some("https://agrolink.example/, ftp://x, not a url"));
        assert_eq!(origins, vec!["https://agrolink.example".to_string()]);
    }

    #[test]
    fn numeric_settings_fall_back_on_garbage() {
        env::set_var("AGROLINK_TEST_RATE_LIMIT_MAX", " 42 ");
        env::set_var("AGROLINK_TEST_PRELOAD_LIMIT", "three");
        assert_eq!(env_parse("AGROLINK_TEST_RATE_LIMIT_MAX", 120usize), 42);
        assert_eq!(env_parse("AGROLINK_TEST_PRELOAD_LIMIT", 3usize), 3);
        assert_eq!(env_parse("AGROLINK_TEST_UNSET_VARIABLE", 6u64), 6);
    }

    #[test]
    fn empty_origin_list_uses_defaults() {
        assert_eq!(parse_allowed_origins(Some(" , ")).len(), DEFAULT_ALLOWED_ORIGINS.len());
    }
}
