//! kalakar-ai library interface
//!
//! AI listing generation and voice assistant for the Kalakar artisan
//! marketplace. Exposes the services and `build_router` for the binary and
//! for integration tests.

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod validators;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use clients::AiClients;
use kalakar_common::auth::TokenDigest;
use services::{ActionDispatcher, ListingOrchestrator, TranslationService, VoiceAssistant};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Module name reported by `/health`
pub const MODULE_NAME: &str = "kalakar-ai";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub listings: Arc<ListingOrchestrator>,
    pub voice: Arc<VoiceAssistant>,
    pub dispatcher: Arc<ActionDispatcher>,
    pub translation: Arc<TranslationService>,
    /// Digest of the required bearer token; None disables authentication
    pub auth_token: Option<TokenDigest>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last request error for diagnostics
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(clients: AiClients, auth_token: Option<TokenDigest>) -> Self {
        Self {
            listings: Arc::new(ListingOrchestrator::new(&clients)),
            voice: Arc::new(VoiceAssistant::new(&clients)),
            dispatcher: Arc::new(ActionDispatcher::new()),
            translation: Arc::new(TranslationService::new(Arc::clone(&clients.translator))),
            auth_token,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        Utc::now()
            .signed_duration_since(self.startup_time)
            .num_seconds()
            .max(0) as u64
    }

    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    /// Record a failed request for `/health` and build its generic 500
    ///
    /// Only `user_message` is kept; the cause goes to the log alone.
    pub async fn fail(&self, user_message: &str, cause: impl std::fmt::Display) -> ApiError {
        *self.last_error.write().await = Some(user_message.to_string());
        ApiError::internal(user_message, cause)
    }
}

/// Build application router
///
/// Layers, outermost first: CORS, request tracing, bearer authentication
/// (only when a token is configured).
pub fn build_router(state: AppState) -> Router {
    let auth = state.auth_token.map(api::AuthLayer::new);

    let router = Router::new()
        .merge(api::ai_routes())
        .merge(api::voice_routes())
        .merge(api::health_routes())
        .with_state(state);

    let router = match auth {
        Some(layer) => router.layer(layer),
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
