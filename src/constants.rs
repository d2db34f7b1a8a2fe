//! Constants used throughout the adapter
//!
//! Configuration paths, HTTP header names, route suffixes and the endpoints
//! of the built-in Microsoft identity platform provider.

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "adapter.config.json";

/// Default HTTP host
pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default upstream request timeout in seconds
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Default upstream connect timeout in seconds
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default interval between background cache sweeps (5 minutes)
pub const DEFAULT_CACHE_SWEEP_INTERVAL_SECS: u64 = 300;

/// Prefix marking a config value as an environment variable reference
pub const ENV_VAR_PREFIX: &str = "$env:";

/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "oidc_oauth_adapter=info";

// ============================================================================
// ROUTES
// ============================================================================

/// Authorization sub-path under a provider prefix
pub const ROUTE_AUTHORIZE: &str = "/authorize";

/// Token sub-path under a provider prefix
pub const ROUTE_TOKEN: &str = "/token";

/// Userinfo sub-path under a provider prefix
pub const ROUTE_USERINFO: &str = "/userinfo";

/// Health check route
pub const ROUTE_HEALTH: &str = "/healthz";

/// Prometheus metrics route
pub const ROUTE_METRICS: &str = "/metrics";

/// Body of the final fallback response
pub const NOT_FOUND_BODY: &str = "Not found.";

// ============================================================================
// HTTP
// ============================================================================

/// Authorization scheme prefix (including the separating space)
pub const BEARER_PREFIX: &str = "Bearer ";

/// JSON content type
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Body returned by userinfo when no profile is available
pub const EMPTY_JSON_OBJECT: &str = "{}";

/// Hop-by-hop headers that are never copied onto the outbound request
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "upgrade",
    "te",
    "trailer",
];

// ============================================================================
// TOKEN RESPONSE FIELDS
// ============================================================================

/// Access token field of an OAuth2 token response
pub const FIELD_ACCESS_TOKEN: &str = "access_token";

/// ID token field of an OAuth2 token response
pub const FIELD_ID_TOKEN: &str = "id_token";

// ============================================================================
// CLAIMS
// ============================================================================

/// Standard subject claim
pub const CLAIM_SUB: &str = "sub";

/// Standard name claim
pub const CLAIM_NAME: &str = "name";

/// Standard email claim
pub const CLAIM_EMAIL: &str = "email";

// ============================================================================
// MICROSOFT IDENTITY PLATFORM
// ============================================================================

/// Route prefix of the built-in Microsoft provider
pub const MICROSOFT_ROUTE_PREFIX: &str = "/microsoft";

/// Microsoft authorization endpoint (common tenant)
pub const MICROSOFT_AUTHORIZATION_ENDPOINT: &str =
    "https://login.microsoftonline.com/common/oauth2/v2.0/authorize";

/// Microsoft token endpoint (common tenant)
pub const MICROSOFT_TOKEN_ENDPOINT: &str =
    "https://login.microsoftonline.com/common/oauth2/v2.0/token";

/// Microsoft Graph OIDC userinfo endpoint
pub const MICROSOFT_USERINFO_ENDPOINT: &str = "https://graph.microsoft.com/oidc/userinfo";
