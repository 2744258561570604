//! # convo_api
//!
//! HTTP webhook layer for the conversation components.

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use convo_core::{DispatchError, DispatchTable};

use crate::config::ApiConfig;
use crate::handlers::{health, webhook};

/// Route paths.
pub mod routes {
    pub const POST_ROOT: &str = "/";
    pub const POST_WEBHOOK: &str = "/webhook";
    pub const GET_HEALTH: &str = "/health";
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Intent dispatch table, read-only after construction.
    pub dispatch: Arc<DispatchTable>,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// Builds the dispatch table and bundles it with `config`.
    pub fn new(config: ApiConfig) -> Result<Self, DispatchError> {
        Ok(Self {
            dispatch: Arc::new(DispatchTable::new()?),
            config,
        })
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(routes::POST_ROOT, post(webhook::conversation_component))
        .route(routes::POST_WEBHOOK, post(webhook::conversation_component))
        .route(routes::GET_HEALTH, get(health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
