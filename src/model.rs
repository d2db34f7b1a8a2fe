//! Data types shared by the provider, cache and HTTP layers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalized user profile served by the userinfo endpoint
///
/// Serialized with the OIDC userinfo field names `sub`, `email` and `name`.
/// An absent email is omitted from the JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable subject identifier
    #[serde(rename = "sub")]
    pub subject: String,

    /// Email address, when the provider issued one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Display name
    #[serde(rename = "name")]
    pub display_name: String,
}

impl UserProfile {
    pub fn new(
        subject: impl Into<String>,
        display_name: impl Into<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            email,
            display_name: display_name.into(),
        }
    }
}

/// Claims carried by a decoded ID token
///
/// `exp` is required; every other claim stays in `claims` with its original
/// JSON value so provider-specific extractors can pick what they need.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClaimSet {
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,

    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl ClaimSet {
    /// String value of a claim, if present and a string
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Value::as_str)
    }

    /// Non-empty string value of a claim
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get_str(name).filter(|s| !s.is_empty())
    }

    /// Expiry as an absolute timestamp
    ///
    /// Returns `None` when `exp` is outside chrono's representable range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;
