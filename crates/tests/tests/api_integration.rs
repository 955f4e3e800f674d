use agrolink_api::{build_app, ApiConfig};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

const API_KEY: &str = "dev-agrolink-key";

fn app() -> Router {
    build_app(ApiConfig::default()).expect("app should build")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-api-key", API_KEY)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    assert_eq!(parsed["model"], "rules");
    assert_eq!(parsed["remote_model"], false);
}

#[tokio::test]
async fn voice_command_requires_api_key() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/voice/command")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "portal": "hub", "text": "open orders" }).to_string(),
        ))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(response).await["error"], "unauthorized");
}

#[tokio::test]
async fn hub_command_navigates_and_suggests_preloads() {
    let response = app()
        .oneshot(post_json(
            "/v1/voice/command",
            json!({ "portal": "hub", "text": "Show me the orders, please", "client_id": "hub-7" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    assert_eq!(parsed["outcome"], "navigate");
    assert_eq!(parsed["path"], "/hub/orders");
    assert_eq!(parsed["client_id"], "hub-7");
    assert!(parsed["message"]
        .as_str()
        .is_some_and(|message| message.starts_with("Navigating to")));

    let preload = parsed["preload"].as_array().unwrap();
    assert!(!preload.is_empty());
    assert!(preload.iter().all(|candidate| candidate["path"] != "/hub/orders"));
}

#[tokio::test]
async fn unknown_phrase_is_not_recognized() {
    let response = app()
        .oneshot(post_json(
            "/v1/voice/command",
            json!({ "portal": "farmer", "text": "xyzzy" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    assert_eq!(parsed["outcome"], "not_recognized");
    assert!(parsed.get("path").is_none());
    assert!(parsed.get("client_id").is_none());
}

#[tokio::test]
async fn portal_aliases_are_accepted_in_bodies() {
    let response = app()
        .oneshot(post_json(
            "/v1/voice/command",
            json!({ "portal": "Hub", "text": "open inventory" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    assert_eq!(parsed["outcome"], "navigate");
    assert_eq!(parsed["path"], "/hub/inventory");
}

#[tokio::test]
async fn bad_bodies_get_json_errors() {
    let app = app();

    let malformed = Request::builder()
        .method("POST")
        .uri("/v1/voice/command")
        .header("content-type", "application/json")
        .header("x-api-key", API_KEY)
        .body(Body::from("{\"portal\": \"hub\", "))
        .unwrap();
    let response = app.clone().oneshot(malformed).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "invalid_json");

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/voice/command",
            json!({ "portal": "spaceport", "text": "open orders" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let parsed = read_json(response).await;
    assert_eq!(parsed["error"], "invalid_body");
    assert!(parsed["message"]
        .as_str()
        .is_some_and(|message| message.contains("spaceport")));

    let response = app
        .clone()
        .oneshot(post_json("/v1/voice/assistant", json!({ "language": "en" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(read_json(response).await["error"], "invalid_body");

    let oversized = json!({ "portal": "hub", "text": "a".repeat(20 * 1024) }).to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/v1/voice/command")
        .header("content-type", "application/json")
        .header("content-length", oversized.len())
        .header("x-api-key", API_KEY)
        .body(Body::from(oversized))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(read_json(response).await["error"], "payload_too_large");

    let response = app.oneshot(get("/v1/nowhere")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["error"], "not_found");
}

#[tokio::test]
async fn current_route_is_not_reopened() {
    let response = app()
        .oneshot(post_json(
            "/v1/voice/command",
            json!({
                "portal": "hub",
                "text": "open orders",
                "current_path": "/hub/orders/"
            }),
        ))
        .await
        .unwrap();

    let parsed = read_json(response).await;
    assert_eq!(parsed["outcome"], "already_on_route");
    assert_eq!(parsed["path"], "/hub/orders");
}

#[tokio::test]
async fn assistant_navigates_with_rules_engine() {
    let response = app()
        .oneshot(post_json(
            "/v1/voice/assistant",
            json!({ "text": "take me to the marketplace", "language": "en" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    assert_eq!(parsed["kind"], "navigate");
    assert_eq!(parsed["path"], "/marketplace");
    assert_eq!(parsed["page"], "marketplace");
}

#[tokio::test]
async fn blank_assistant_question_has_no_content() {
    let response = app()
        .oneshot(post_json("/v1/voice/assistant", json!({ "text": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn route_tables_are_served_per_portal() {
    let app = app();

    let response = app
        .clone()
        .oneshot(get("/v1/routes/transport"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    assert_eq!(parsed["portal"], "transport");
    assert!(parsed["routes"]
        .as_array()
        .unwrap()
        .iter()
        .any(|route| route["path"] == "/transport/deliveries"));

    let response = app.oneshot(get("/v1/routes/spaceport")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["error"], "unknown_portal");
}

#[tokio::test]
async fn messages_fall_back_to_english() {
    let app = app();

    let response = app
        .clone()
        .oneshot(get("/v1/messages/page.about?language=ta"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    assert_eq!(parsed["message"], "Opening the about page.");
    assert_eq!(parsed["localized"], false);

    let response = app
        .clone()
        .oneshot(get("/v1/messages/not_recognized?language=hi"))
        .await
        .unwrap();
    let parsed = read_json(response).await;
    assert_eq!(parsed["language"], "hindi");
    assert_eq!(parsed["localized"], true);

    let response = app.oneshot(get("/v1/messages/weather")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rate_limit_applies_per_client() {
    let app = build_app(ApiConfig {
        rate_limit_max: 1,
        ..ApiConfig::default()
    })
    .expect("app should build");

    let request = |client: &str| {
        Request::builder()
            .uri("/v1/routes/hub")
            .header("x-api-key", API_KEY)
            .header("x-forwarded-for", client)
            .body(Body::empty())
            .unwrap()
    };

    let first = app.clone().oneshot(request("10.0.0.1")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let second = app.clone().oneshot(request("10.0.0.1")).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    let other = app.oneshot(request("10.0.0.2")).await.unwrap();
    assert_eq!(other.status(), StatusCode::OK);
}
