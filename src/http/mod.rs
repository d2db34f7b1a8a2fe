//! HTTP server for the adapter
//!
//! One middleware layer per configured provider sits in front of a small set
//! of system routes. A request nobody claims ends at the `404` fallback.

pub mod adapter;
pub mod proxy;
pub mod response;

use self::adapter::{ProviderState, provider_middleware};
use self::proxy::UpstreamClient;
use crate::cache::{MemoryProfileCache, ProfileCache, spawn_sweeper};
use crate::config::Config;
use crate::constants::{ROUTE_HEALTH, ROUTE_METRICS};
use crate::provider::Provider;
use crate::{AdapterError, Result};
use axum::{
    Router,
    extract::Json,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    LatencyUnit,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Error type for HTTP handlers
#[derive(Debug)]
pub struct AppError(AdapterError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self.0 {
            AdapterError::Network(e) => {
                // Log full error details internally
                tracing::error!("Network error: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "network_error",
                    "The identity provider could not be reached".to_string(),
                )
            }
            AdapterError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "config_error",
                    "The adapter is misconfigured".to_string(),
                )
            }
            _ => {
                tracing::error!("Internal error: {:?}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        tracing::debug!(
            error_type = error_type,
            status = %status,
            message = %message,
            "HTTP request error response"
        );

        let body = json!({
            "error": {
                "type": error_type,
                "message": message,
                "status": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<AdapterError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Start the HTTP server and run until Ctrl-C
pub async fn start_server(config: Config) -> Result<()> {
    crate::telemetry::init();

    let cache: Arc<dyn ProfileCache> = Arc::new(MemoryProfileCache::new());
    let upstream = UpstreamClient::new(&config.upstream)?;
    let providers: Vec<Provider> = config.providers.iter().map(Provider::from_config).collect();

    for provider in &providers {
        tracing::info!(
            provider = provider.name(),
            prefix = provider.route_prefix(),
            authorization_endpoint = %provider.authorization_endpoint(),
            token_endpoint = %provider.token_endpoint(),
            userinfo_endpoint = %provider.userinfo_endpoint(),
            "Registered provider"
        );
    }

    let sweeper = config
        .cache
        .sweep_interval()
        .map(|interval| spawn_sweeper(cache.clone(), interval));

    let app = build_router(providers, cache, upstream);

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AdapterError::config(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Starting HTTP server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AdapterError::config(format!("Server error: {}", e)))?;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    tracing::info!("HTTP server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Build the router
pub fn build_router(
    providers: Vec<Provider>,
    cache: Arc<dyn ProfileCache>,
    upstream: UpstreamClient,
) -> Router {
    let system_routes = Router::new()
        .route(ROUTE_HEALTH, get(health_handler))
        .route(ROUTE_METRICS, get(metrics_handler))
        .fallback(fallback_handler);

    with_providers(system_routes, providers, cache, upstream).layer(
        ServiceBuilder::new().layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(false))
                .on_response(
                    DefaultOnResponse::new()
                        .level(tracing::Level::INFO)
                        .latency_unit(LatencyUnit::Micros),
                ),
        ),
    )
}

/// Put one provider layer per provider in front of `next`
///
/// Providers are consulted in the given order; the first one whose route
/// matches answers the request. Anything unmatched reaches `next` unchanged.
pub fn with_providers(
    next: Router,
    providers: Vec<Provider>,
    cache: Arc<dyn ProfileCache>,
    upstream: UpstreamClient,
) -> Router {
    // The last layer added runs first
    providers.into_iter().rev().fold(next, |router, provider| {
        let state = Arc::new(ProviderState::new(
            Arc::new(provider),
            cache.clone(),
            upstream.clone(),
        ));
        router.layer(axum::middleware::from_fn_with_state(
            state,
            provider_middleware,
        ))
    })
}

// ============================================================================
// SYSTEM HANDLERS
// ============================================================================

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn metrics_handler() -> std::result::Result<(StatusCode, String), AppError> {
    let metrics = crate::telemetry::get_metrics()?;
    Ok((StatusCode::OK, metrics))
}

async fn fallback_handler() -> Response {
    response::not_found()
}
