mod config;
mod rate_limit;

use std::sync::Arc;

use agrolink_agents::VoiceAgent;
use agrolink_core::{
    entry, AssistantInput, CommandInput, CommandOutcome, Language, MessageKey, NavigationHelper,
    Portal, PreloadCandidate, RouteCatalog, RouteEntry, VoiceError,
};
use agrolink_ml::IntentEngine;
use agrolink_observability::{AppMetrics, MetricsSnapshot};
use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, Query, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{body::Body, Router};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use config::{parse_allowed_origins, ApiConfig};
pub use rate_limit::ClientRateLimiter;

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<VoiceAgent<IntentEngine>>,
    pub metrics: Arc<AppMetrics>,
    pub api_key: String,
    pub limiter: ClientRateLimiter,
    pub allowed_origins: Arc<Vec<String>>,
    pub remote_model: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    model: &'static str,
    remote_model: bool,
    metrics: MetricsSnapshot,
}

#[derive(Debug, Default, Deserialize)]
struct ClientQuery {
    client_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LanguageQuery {
    language: Option<String>,
}

#[derive(Debug, Serialize)]
struct RoutesResponse<'a> {
    portal: Portal,
    routes: &'a [RouteEntry],
    preload: Vec<PreloadCandidate>,
}

#[derive(Debug, Serialize)]
struct CommandResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    #[serde(flatten)]
    outcome: CommandOutcome,
    preload: Vec<PreloadCandidate>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    key: MessageKey,
    language: Language,
    message: &'static str,
    localized: bool,
}

pub fn build_app(config: ApiConfig) -> Result<Router> {
    let http_client = Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .build()
        .context("failed to build http client")?;

    let engine = IntentEngine::load(http_client, config.openai.clone());
    let remote_model = engine.is_remote();
    let metrics = AppMetrics::shared();
    let navigation = Arc::new(NavigationHelper::new(
        RouteCatalog::builtin(),
        config.preload_limit,
    ));
    let agent = Arc::new(VoiceAgent::new(engine, navigation, metrics.clone()));

    info!(
        model = agent.model_name(),
        remote_model,
        origins = config.allowed_origins.len(),
        "voice router initialized"
    );

    let state = ApiState {
        agent,
        metrics,
        api_key: config.api_key,
        limiter: ClientRateLimiter::new(config.rate_limit_window, config.rate_limit_max),
        allowed_origins: Arc::new(config.allowed_origins),
        remote_model,
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/routes/:portal", get(portal_routes))
        .route("/v1/voice/command", post(voice_command))
        .route("/v1/voice/assistant", post(voice_assistant))
        .route("/v1/messages/:key", get(message))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(16 * 1024))
        .layer(middleware::map_response(json_error_body))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        model: state.agent.model_name(),
        remote_model: state.remote_model,
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn portal_routes(
    State(state): State<ApiState>,
    Path(portal): Path<String>,
    Query(query): Query<ClientQuery>,
) -> Response {
    let Some(portal) = Portal::parse(&portal) else {
        return error_response(
            StatusCode::NOT_FOUND,
            "unknown_portal",
            format!("no route table for portal '{portal}'"),
        );
    };

    let preload = query
        .client_id
        .as_deref()
        .map(|client_id| state.agent.preload(portal, Some(client_id)))
        .unwrap_or_default();
    let payload = RoutesResponse {
        portal,
        routes: &state.agent.routes(portal).routes,
        preload,
    };
    (StatusCode::OK, Json(payload)).into_response()
}

async fn voice_command(
    State(state): State<ApiState>,
    payload: Result<Json<CommandInput>, JsonRejection>,
) -> Response {
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    let client_id = input
        .client_id
        .clone()
        .filter(|id| !id.trim().is_empty());
    let portal = input.portal;

    let outcome = state.agent.handle_command(input);
    let preload = match outcome {
        CommandOutcome::Navigate { .. } => state.agent.preload(portal, client_id.as_deref()),
        _ => Vec::new(),
    };

    (
        StatusCode::OK,
        Json(CommandResponse {
            client_id,
            outcome,
            preload,
        }),
    )
        .into_response()
}

async fn voice_assistant(
    State(state): State<ApiState>,
    payload: Result<Json<AssistantInput>, JsonRejection>,
) -> Response {
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    match state.agent.ask(input).await {
        Ok(Some(reply)) => (StatusCode::OK, Json(reply)).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(VoiceError::Completion(detail)) => {
            warn!(%detail, "assistant completion failed");
            error_response(
                StatusCode::BAD_GATEWAY,
                "completion_failed",
                "the intent model could not be reached",
            )
        }
        Err(error) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "assistant_failed",
            error.to_string(),
        ),
    }
}

async fn message(Path(key): Path<String>, Query(query): Query<LanguageQuery>) -> Response {
    let Some(parsed) = MessageKey::parse(&key) else {
        return error_response(
            StatusCode::NOT_FOUND,
            "unknown_message",
            format!("no message for key '{key}'"),
        );
    };
    let language = Language::from_optional_str(query.language.as_deref());
    let localized = entry(parsed);

    let payload = MessageResponse {
        key: parsed,
        language,
        message: localized.get(language),
        localized: localized.get_exact(language).is_some(),
    };
    (StatusCode::OK, Json(payload)).into_response()
}

fn rejection_response(rejection: JsonRejection) -> Response {
    let status = rejection.status();
    warn!(status = status.as_u16(), "request body rejected");
    error_response(status, error_code(status), rejection.body_text())
}

/// Rewrites plain-text error bodies from layers and the router (body limit,
/// unknown path, wrong method) into the `{error, message}` shape.
async fn json_error_body(response: Response) -> Response {
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if is_json || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let detail = axum::body::to_bytes(body, 4 * 1024)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
        .unwrap_or_default();
    let message = if detail.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        detail
    };

    let mut rewritten = error_response(status, error_code(status), message);
    for (name, value) in &parts.headers {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            rewritten.headers_mut().append(name.clone(), value.clone());
        }
    }
    rewritten
}

fn error_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "invalid_json",
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::METHOD_NOT_ALLOWED => "method_not_allowed",
        StatusCode::PAYLOAD_TOO_LARGE => "payload_too_large",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "unsupported_media_type",
        StatusCode::UNPROCESSABLE_ENTITY => "invalid_body",
        _ => "request_failed",
    }
}

fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": error,
            "message": message.into(),
        })),
    )
        .into_response()
}

fn is_public_endpoint(path: &str) -> bool {
    path == "/health"
}

async fn api_key_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let header_key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if header_key != state.api_key {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "missing or invalid x-api-key",
        );
    }

    next.run(request).await
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-api-key"),
        ])
}

async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let ip = request_ip(&request);
    if !state.limiter.allow(&ip) {
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "rate limit exceeded for this client",
        );
    }

    next.run(request).await
}

fn request_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "local".to_string())
}
