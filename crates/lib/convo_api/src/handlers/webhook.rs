//! Fulfillment webhook: the endpoint Dialogflow calls for every matched intent.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use tracing::{debug, info};

use convo_core::{WebhookRequest, WebhookResponse};

use crate::AppState;
use crate::error::AppResult;

/// `POST /`: resolve the intent, run its handler and return the reply.
///
/// Unknown intents and handler failures still answer 200 with the fallback
/// reply; only bodies that are not JSON objects are rejected.
pub async fn conversation_component(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookResponse>> {
    if state.config.log_requests {
        debug!(headers = ?headers, "request headers");
        debug!(body = %String::from_utf8_lossy(&body), "request body");
    }

    let request: WebhookRequest = serde_json::from_slice(&body)?;
    let fulfillment = state.dispatch.fulfill(&request);

    info!(
        intent = %request.action(),
        fallback = fulfillment.is_fallback(),
        ends_conversation = fulfillment.reply.ends_conversation(),
        "intent fulfilled"
    );

    Ok(Json(fulfillment.reply.into_webhook_response()))
}
