//! Telemetry module for the adapter
//!
//! Prometheus metrics for the three provider endpoints and the upstream
//! token call.

use crate::{AdapterError, Result};
use once_cell::sync::Lazy;
use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, TextEncoder, register_counter_vec,
    register_histogram_vec,
};

/// Token exchanges relayed, by upstream status and whether a profile was cached
static TOKEN_EXCHANGES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "oidc_adapter_token_exchanges_total",
        "Total number of token requests relayed to the upstream provider",
        &["provider", "status", "cached"]
    )
    .unwrap()
});

/// Upstream token call duration histogram
static UPSTREAM_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        HistogramOpts::new(
            "oidc_adapter_upstream_duration_seconds",
            "Duration of upstream token requests in seconds"
        ),
        &["provider"]
    )
    .unwrap()
});

/// Userinfo lookups by outcome (hit, miss, no_credential)
static USERINFO_LOOKUPS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "oidc_adapter_userinfo_lookups_total",
        "Total number of userinfo requests",
        &["provider", "outcome"]
    )
    .unwrap()
});

/// Authorization redirects issued
static AUTHORIZE_REDIRECTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "oidc_adapter_authorize_redirects_total",
        "Total number of authorization redirects issued",
        &["provider"]
    )
    .unwrap()
});

/// Initialize telemetry
///
/// Forces registration so every metric family shows up on the first scrape.
pub fn init() {
    Lazy::force(&TOKEN_EXCHANGES_TOTAL);
    Lazy::force(&UPSTREAM_DURATION);
    Lazy::force(&USERINFO_LOOKUPS_TOTAL);
    Lazy::force(&AUTHORIZE_REDIRECTS_TOTAL);
    tracing::info!("Telemetry initialized");
}

/// Record a relayed token exchange
pub fn record_token_exchange(provider: &str, status_code: u16, cached: bool) {
    let status = status_code.to_string();
    let cached = if cached { "true" } else { "false" };
    TOKEN_EXCHANGES_TOTAL
        .with_label_values(&[provider, status.as_str(), cached])
        .inc();
}

/// Record upstream token call duration
pub fn record_upstream_duration(provider: &str, duration_secs: f64) {
    UPSTREAM_DURATION
        .with_label_values(&[provider])
        .observe(duration_secs);
}

/// Record a userinfo lookup
pub fn record_userinfo_lookup(provider: &str, outcome: &str) {
    USERINFO_LOOKUPS_TOTAL
        .with_label_values(&[provider, outcome])
        .inc();
}

/// Record an authorization redirect
pub fn record_authorize_redirect(provider: &str) {
    AUTHORIZE_REDIRECTS_TOTAL
        .with_label_values(&[provider])
        .inc();
}

/// Get Prometheus metrics in text format
pub fn get_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| AdapterError::config(format!("Failed to encode metrics: {}", e)))?;

    String::from_utf8(buffer)
        .map_err(|e| AdapterError::config(format!("Failed to convert metrics to UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_metrics() {
        record_token_exchange("test_provider", 200, true);
        record_upstream_duration("test_provider", 0.123);
        record_userinfo_lookup("test_provider", "hit");
        record_authorize_redirect("test_provider");

        let metrics = get_metrics().unwrap();

        assert!(metrics.contains("oidc_adapter_token_exchanges_total"));
        assert!(metrics.contains("oidc_adapter_upstream_duration_seconds"));
        assert!(metrics.contains("oidc_adapter_userinfo_lookups_total"));
        assert!(metrics.contains("oidc_adapter_authorize_redirects_total"));
    }
}
