//! Upstream identity providers
//!
//! A [`Provider`] is configuration plus a claim extractor: the route prefix it
//! answers under, the three upstream endpoints, and the mapping from its ID
//! token claims to a [`crate::model::UserProfile`]. Provider variants are
//! values, not types.

pub mod claims;
pub mod id_token;

pub use claims::{ClaimExtractor, StandardClaims};
pub use id_token::decode_claims;

use crate::config::ProviderConfig;
use crate::constants::{ROUTE_AUTHORIZE, ROUTE_TOKEN, ROUTE_USERINFO};
use crate::model::{ClaimSet, UserProfile};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Which provider endpoint a request path addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderRoute {
    Authorize,
    Token,
    Userinfo,
}

impl ProviderRoute {
    /// Metric/log label
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderRoute::Authorize => "authorize",
            ProviderRoute::Token => "token",
            ProviderRoute::Userinfo => "userinfo",
        }
    }
}

/// A configured upstream identity provider
#[derive(Clone)]
pub struct Provider {
    name: String,
    route_prefix: String,
    authorize_path: String,
    token_path: String,
    userinfo_path: String,
    authorization_endpoint: Url,
    token_endpoint: Url,
    userinfo_endpoint: Url,
    extractor: Arc<dyn ClaimExtractor>,
}

impl Provider {
    /// Build a provider with an explicit claim extractor
    pub fn with_extractor(
        route_prefix: &str,
        authorization_endpoint: Url,
        token_endpoint: Url,
        userinfo_endpoint: Url,
        extractor: Arc<dyn ClaimExtractor>,
    ) -> Self {
        let route_prefix = crate::config::normalize_route_prefix(route_prefix);
        let name = route_prefix.trim_start_matches('/').to_string();

        Self {
            authorize_path: format!("{}{}", route_prefix, ROUTE_AUTHORIZE),
            token_path: format!("{}{}", route_prefix, ROUTE_TOKEN),
            userinfo_path: format!("{}{}", route_prefix, ROUTE_USERINFO),
            name,
            route_prefix,
            authorization_endpoint,
            token_endpoint,
            userinfo_endpoint,
            extractor,
        }
    }

    /// Build a provider from configuration
    ///
    /// Every configured kind maps the standard `sub`/`name`/`email` claims;
    /// the kind only decides the default endpoints.
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::with_extractor(
            &config.route_prefix,
            config.authorization_endpoint.clone(),
            config.token_endpoint.clone(),
            config.userinfo_endpoint.clone(),
            Arc::new(StandardClaims),
        )
    }

    /// Short name used in logs and metrics (the prefix without its slash)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn route_prefix(&self) -> &str {
        &self.route_prefix
    }

    pub fn authorization_endpoint(&self) -> &Url {
        &self.authorization_endpoint
    }

    pub fn token_endpoint(&self) -> &Url {
        &self.token_endpoint
    }

    pub fn userinfo_endpoint(&self) -> &Url {
        &self.userinfo_endpoint
    }

    /// Match a request path against the three provider sub-paths
    ///
    /// Exact, case-insensitive comparison; no prefix matching.
    pub fn match_route(&self, path: &str) -> Option<ProviderRoute> {
        if path.eq_ignore_ascii_case(&self.authorize_path) {
            Some(ProviderRoute::Authorize)
        } else if path.eq_ignore_ascii_case(&self.token_path) {
            Some(ProviderRoute::Token)
        } else if path.eq_ignore_ascii_case(&self.userinfo_path) {
            Some(ProviderRoute::Userinfo)
        } else {
            None
        }
    }

    /// Redirect target for an authorization request
    ///
    /// The raw query string is appended verbatim after a single `?`.
    pub fn authorize_redirect(&self, raw_query: Option<&str>) -> String {
        format!(
            "{}?{}",
            self.authorization_endpoint.as_str(),
            raw_query.unwrap_or_default()
        )
    }

    /// Map ID-token claims to a profile using this provider's extractor
    pub fn extract_profile(&self, claims: &ClaimSet) -> Option<UserProfile> {
        self.extractor.extract(claims)
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("route_prefix", &self.route_prefix)
            .field("authorization_endpoint", &self.authorization_endpoint.as_str())
            .field("token_endpoint", &self.token_endpoint.as_str())
            .field("userinfo_endpoint", &self.userinfo_endpoint.as_str())
            .finish_non_exhaustive()
    }
}
