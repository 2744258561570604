//! Integration tests: build the router, post recorded Dialogflow requests, assert the replies.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use convo_api::{AppState, config::ApiConfig};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(log_requests: bool) -> Router {
    let state = AppState::new(ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        log_requests,
    })
    .expect("app state");
    convo_api::router(state)
}

async fn post(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let resp = app.oneshot(req).await.expect("request");
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&body).expect("parse JSON");
    (status, json)
}

fn dialogflow_request(action: &str, arguments: Value) -> String {
    json!({
        "id": "7c2a1e5b-8f3d-4c1e-9a7b-1f2d3e4c5b6a",
        "timestamp": "2017-12-01T10:15:30.000Z",
        "lang": "en",
        "result": {
            "source": "agent",
            "resolvedQuery": "show me a list",
            "action": action,
            "actionIncomplete": false,
            "parameters": {},
            "contexts": [
                { "name": "actions_capability_screen_output", "parameters": {}, "lifespan": 0 }
            ],
            "metadata": { "intentId": "a1b2", "intentName": action },
            "fulfillment": { "speech": "", "messages": [{ "type": 0, "speech": "" }] },
            "score": 1
        },
        "status": { "code": 200, "errorType": "success" },
        "sessionId": "1512123330123",
        "originalRequest": {
            "source": "google",
            "version": "2",
            "data": {
                "isInSandbox": true,
                "surface": { "capabilities": [{ "name": "actions.capability.SCREEN_OUTPUT" }] },
                "inputs": [{ "intent": "actions.intent.TEXT", "arguments": arguments }],
                "user": { "locale": "en-US", "userId": "AETml1T" },
                "conversation": { "conversationId": "1512123330123", "type": "ACTIVE" }
            }
        }
    })
    .to_string()
}

#[tokio::test]
async fn welcome_returns_rich_response_with_chips() {
    let body = dialogflow_request("input.welcome", json!([]));
    let (status, json) = post(app(false), "/", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["speech"], "Hi there!");
    assert_eq!(json["displayText"], "Hello there!");

    let google = &json["data"]["google"];
    assert_eq!(google["expectUserResponse"], true);
    let items = google["richResponse"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    let chips: Vec<&str> = google["richResponse"]["suggestions"]
        .as_array()
        .expect("suggestions")
        .iter()
        .map(|s| s["title"].as_str().expect("title"))
        .collect();
    assert_eq!(
        chips,
        vec!["Basic Card", "Browse Carousel", "Carousel", "List", "Media", "Suggestions"]
    );
}

#[tokio::test]
async fn list_returns_option_system_intent() {
    let (status, json) = post(app(false), "/webhook", dialogflow_request("list", json!([]))).await;

    assert_eq!(status, StatusCode::OK);
    let intent = &json["data"]["google"]["systemIntent"];
    assert_eq!(intent["intent"], "actions.intent.OPTION");
    assert_eq!(intent["data"]["@type"], "type.googleapis.com/google.actions.v2.OptionValueSpec");
    let items = intent["data"]["listSelect"]["items"].as_array().expect("items");
    let keys: Vec<&str> = items
        .iter()
        .map(|i| i["optionInfo"]["key"].as_str().expect("key"))
        .collect();
    assert_eq!(keys, vec!["title", "googleHome", "googlePixel", "googleAllo"]);
}

#[tokio::test]
async fn item_selected_reads_option_argument() {
    let arguments = json!([{ "name": "OPTION", "textValue": "googlePixel" }]);
    let (status, json) = post(app(true), "/", dialogflow_request("item.selected", arguments)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["speech"], "You selected the Google Pixel!");
    assert_eq!(json["data"]["google"]["expectUserResponse"], true);
}

#[tokio::test]
async fn media_status_finished() {
    let arguments = json!([{
        "name": "MEDIA_STATUS",
        "extension": {
            "@type": "type.googleapis.com/google.actions.v2.MediaStatus",
            "status": "FINISHED"
        }
    }]);
    let (_, json) = post(app(false), "/", dialogflow_request("media.status", arguments)).await;
    assert_eq!(json["speech"], "Hope you enjoyed the tunes!");
}

#[tokio::test]
async fn goodbye_ends_conversation() {
    let (status, json) = post(app(false), "/", dialogflow_request("bye.card", json!([]))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["speech"], "Goodbye, World!");
    assert_eq!(json["data"]["google"]["expectUserResponse"], false);
    assert_eq!(
        json["data"]["google"]["richResponse"]["items"][1]["basicCard"]["formattedText"],
        "This is a goodbye card."
    );
}

#[tokio::test]
async fn unknown_intent_gets_fallback_not_error() {
    let body = dialogflow_request("input.unknown", json!([]));
    let (status, json) = post(app(false), "/", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["speech"], convo_core::dispatch::FALLBACK_TEXT);
    assert_eq!(json["data"]["google"]["expectUserResponse"], true);
}

#[tokio::test]
async fn empty_object_gets_fallback() {
    let (status, json) = post(app(false), "/", "{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["speech"], convo_core::dispatch::FALLBACK_TEXT);
}

#[tokio::test]
async fn null_parameters_still_fulfill_the_intent() {
    let body = json!({ "result": { "action": "list", "parameters": null } }).to_string();
    let (status, json) = post(app(false), "/", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["speech"], "This is a simple response for a list");
    assert_eq!(
        json["data"]["google"]["systemIntent"]["data"]["listSelect"]["title"],
        "List Title"
    );
}

#[tokio::test]
async fn null_action_gets_fallback() {
    let body = json!({ "result": { "action": null } }).to_string();
    let (status, json) = post(app(false), "/", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["speech"], convo_core::dispatch::FALLBACK_TEXT);
    assert_eq!(json["data"]["google"]["expectUserResponse"], true);
}

#[tokio::test]
async fn non_json_body_is_rejected() {
    let (status, json) = post(app(false), "/", "intent=list").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
    assert!(json["message"].as_str().expect("message").contains("webhook JSON"));
}

#[tokio::test]
async fn health_reports_ok() {
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app(false).oneshot(req).await.expect("request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json: Value = serde_json::from_slice(&body).expect("parse JSON");
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}
