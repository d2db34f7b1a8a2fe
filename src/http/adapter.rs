//! Provider adapter middleware
//!
//! Sits in the request pipeline for one provider. Requests to the
//! provider's authorize, token and userinfo sub-paths are answered here;
//! everything else continues to the next stage untouched.

use super::AppError;
use super::proxy::UpstreamClient;
use super::response::{unauthorized_empty_object, write_http_json};
use crate::cache::ProfileCache;
use crate::constants::{BEARER_PREFIX, FIELD_ACCESS_TOKEN, FIELD_ID_TOKEN};
use crate::provider::{Provider, ProviderRoute, decode_claims};
use crate::{Result, telemetry};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// State for one provider's middleware
#[derive(Clone)]
pub struct ProviderState {
    pub provider: Arc<Provider>,
    pub cache: Arc<dyn ProfileCache>,
    pub upstream: UpstreamClient,
}

impl ProviderState {
    pub fn new(
        provider: Arc<Provider>,
        cache: Arc<dyn ProfileCache>,
        upstream: UpstreamClient,
    ) -> Self {
        Self {
            provider,
            cache,
            upstream,
        }
    }
}

/// Dispatch provider routes, pass everything else through
pub async fn provider_middleware(
    State(state): State<Arc<ProviderState>>,
    req: Request,
    next: Next,
) -> std::result::Result<Response, AppError> {
    let Some(route) = state.provider.match_route(req.uri().path()) else {
        return Ok(next.run(req).await);
    };

    tracing::debug!(
        provider = state.provider.name(),
        route = route.as_str(),
        method = %req.method(),
        "Provider route matched"
    );

    let response = match route {
        ProviderRoute::Authorize => handle_authorize(&state, &req),
        ProviderRoute::Token => handle_token(&state, req).await?,
        ProviderRoute::Userinfo => handle_userinfo(&state, req.headers()),
    };

    Ok(response)
}

// ============================================================================
// AUTHORIZE
// ============================================================================

/// Permanent redirect to the upstream authorization endpoint
///
/// The query string is carried over byte for byte. No upstream call is made.
pub fn handle_authorize(state: &ProviderState, req: &Request) -> Response {
    let location = state.provider.authorize_redirect(req.uri().query());
    telemetry::record_authorize_redirect(state.provider.name());

    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location)],
    )
        .into_response()
}

// ============================================================================
// TOKEN
// ============================================================================

/// Relay the token request upstream, caching the profile on the side
///
/// The caller always receives the upstream status, headers and exact body
/// bytes. Only a transport failure against the provider is an error.
pub async fn handle_token(state: &ProviderState, req: Request) -> Result<Response> {
    let provider = state.provider.name();
    let started = Instant::now();

    let upstream = state
        .upstream
        .forward(state.provider.token_endpoint(), req)
        .await
        .inspect_err(|e| tracing::warn!(provider, "Upstream token request failed: {}", e))?;

    telemetry::record_upstream_duration(provider, started.elapsed().as_secs_f64());

    let cached = cache_profile(state, &upstream.body);
    telemetry::record_token_exchange(provider, upstream.status.as_u16(), cached);

    tracing::info!(
        provider,
        status = upstream.status.as_u16(),
        cached,
        "Relayed token response"
    );

    Ok(upstream.into_response())
}

/// Access token and ID token of a token response body
///
/// `None` unless the body is a JSON object with non-empty string values for
/// both fields.
pub fn token_fields(body: &[u8]) -> Option<(String, String)> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let access_token = value.get(FIELD_ACCESS_TOKEN)?.as_str()?;
    let id_token = value.get(FIELD_ID_TOKEN)?.as_str()?;

    if access_token.is_empty() || id_token.is_empty() {
        return None;
    }
    Some((access_token.to_string(), id_token.to_string()))
}

/// Cache the profile carried by a token response, if there is one
///
/// Every failure here is absorbed; returns whether an entry was written.
fn cache_profile(state: &ProviderState, body: &[u8]) -> bool {
    let provider = state.provider.name();

    let Some((access_token, id_token)) = token_fields(body) else {
        tracing::debug!(provider, "Token response carries no access_token/id_token pair");
        return false;
    };

    let Some(claims) = decode_claims(&id_token) else {
        tracing::warn!(provider, "Token response id_token could not be decoded");
        return false;
    };

    let Some(profile) = state.provider.extract_profile(&claims) else {
        tracing::warn!(provider, "id_token lacks the claims required for a profile");
        return false;
    };

    let Some(expires_at) = claims.expires_at() else {
        tracing::warn!(provider, exp = claims.exp, "id_token exp is out of range");
        return false;
    };

    tracing::debug!(
        provider,
        subject = %profile.subject,
        expires_at = %expires_at,
        "Caching profile"
    );
    state.cache.set(&access_token, profile, expires_at);
    true
}

// ============================================================================
// USERINFO
// ============================================================================

/// Bearer token of an `Authorization` header, if well formed
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
}

/// Serve the cached profile for the presented bearer token
///
/// 200 with the profile as JSON, or 401 with `{}` when there is no usable
/// token or no live cache entry for it.
pub fn handle_userinfo(state: &ProviderState, headers: &HeaderMap) -> Response {
    let provider = state.provider.name();

    let Some(token) = bearer_token(headers) else {
        telemetry::record_userinfo_lookup(provider, "no_credential");
        return unauthorized_empty_object();
    };

    match state.cache.get(token) {
        Some(profile) => {
            telemetry::record_userinfo_lookup(provider, "hit");
            write_http_json(profile)
        }
        None => {
            telemetry::record_userinfo_lookup(provider, "miss");
            unauthorized_empty_object()
        }
    }
}

#[cfg(test)]
#[path = "adapter_test.rs"]
mod adapter_test;
