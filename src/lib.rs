//! OIDC OAuth adapter
//!
//! Puts an OAuth2 client that expects a classic `authorize` / `token` /
//! `userinfo` triple in front of an OpenID Connect identity provider whose
//! userinfo endpoint it cannot use directly.
//!
//! - `{prefix}/authorize` redirects to the provider's authorization endpoint
//! - `{prefix}/token` is relayed to the provider's token endpoint; the
//!   profile in the returned ID token is cached under the access token
//! - `{prefix}/userinfo` answers from that cache
//!
//! # Example
//!
//! ```rust,no_run
//! use oidc_oauth_adapter::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     oidc_oauth_adapter::http::start_server(config).await?;
//!     Ok(())
//! }
//! ```

// Core modules
pub mod constants;
pub mod error;
pub mod model;

// Adapter components
pub mod cache;
pub mod provider;

// Infrastructure
pub mod cli;
pub mod config;
pub mod http;
pub mod telemetry;

// Re-exports for convenience
pub use cache::{MemoryProfileCache, ProfileCache};
pub use error::{AdapterError, Result};
pub use model::{ClaimSet, UserProfile};
pub use provider::Provider;

/// Initialize logging for the application
///
/// `RUST_LOG` wins over `level`, which wins over the built-in default.
/// Calling this more than once is harmless.
pub fn init_logging(level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| level.and_then(|l| EnvFilter::try_new(l).ok()))
        .unwrap_or_else(|| constants::DEFAULT_LOG_FILTER.into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
