//! HTTP surface of the service.

pub mod routes;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::analyzer::ReviewAnalyzer;
use crate::config::Config;
use crate::provider::OpenAiClient;
use crate::store::{MemoryStore, ReviewStore, SupabaseStore};
use crate::types::{InsightsError, InsightsResult, SecureApiKey};

/// Clients shared by every request, built once at startup
pub struct AppState {
    pub analyzer: ReviewAnalyzer,
    pub store: Arc<dyn ReviewStore>,
}

impl AppState {
    pub fn new(analyzer: ReviewAnalyzer, store: Arc<dyn ReviewStore>) -> Self {
        Self { analyzer, store }
    }

    /// Wire the production provider and store from `config`
    pub fn from_config(config: &Config) -> InsightsResult<Self> {
        let api_key = config
            .openai_api_key
            .clone()
            .unwrap_or_else(|| SecureApiKey::new(""));
        let provider = OpenAiClient::with_timeout(api_key, config.llm_timeout)?
            .with_base_url(config.openai_base_url.clone());

        let store: Arc<dyn ReviewStore> = match config.supabase() {
            Some((url, key)) => Arc::new(SupabaseStore::new(url, key.clone())?),
            None => {
                tracing::warn!("Supabase is not configured, results are kept in memory only");
                Arc::new(MemoryStore::new())
            }
        };

        let analyzer =
            ReviewAnalyzer::new(Arc::new(provider)).with_params(config.completion_params());
        Ok(Self::new(analyzer, store))
    }
}

/// CORS for the single configured front-end origin
fn cors_layer(front_end_url: Option<&str>) -> Option<CorsLayer> {
    let origin = front_end_url?;
    match HeaderValue::from_str(origin) {
        Ok(origin) => Some(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list([origin]))
                .allow_credentials(true)
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request()),
        ),
        Err(e) => {
            tracing::warn!(origin = %origin, error = %e, "Ignoring unusable front-end origin");
            None
        }
    }
}

pub fn build_router(state: Arc<AppState>, front_end_url: Option<&str>) -> Router {
    let router = Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/analyze", post(routes::analyze_review))
        .route("/reviews", get(routes::list_reviews))
        .route("/reviews/:review_id", get(routes::get_review))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match cors_layer(front_end_url) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// Build everything from `config` and serve until Ctrl-C
pub async fn run(config: Config) -> InsightsResult<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    let app = build_router(state, config.front_end_url.as_deref());

    tracing::info!(address = %config.bind_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| {
            InsightsError::ServerError(format!("cannot bind {}: {}", config.bind_addr, e))
        })?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await
        .map_err(|e| InsightsError::ServerError(e.to_string()))
}
