//! Claim extraction
//!
//! Identity providers disagree on claim names, so each provider carries a
//! [`ClaimExtractor`] that maps its ID-token claims onto a [`UserProfile`].

use crate::constants::{CLAIM_EMAIL, CLAIM_NAME, CLAIM_SUB};
use crate::model::{ClaimSet, UserProfile};

/// Maps a decoded claim set to a user profile
///
/// Returns `None` when a required claim is missing, in which case no profile
/// is cached for the token.
pub trait ClaimExtractor: Send + Sync {
    fn extract(&self, claims: &ClaimSet) -> Option<UserProfile>;
}

impl<F> ClaimExtractor for F
where
    F: Fn(&ClaimSet) -> Option<UserProfile> + Send + Sync,
{
    fn extract(&self, claims: &ClaimSet) -> Option<UserProfile> {
        self(claims)
    }
}

/// Standard OIDC claims: `sub`, `name` and optional `email`
///
/// Only the `email` claim fills the email. Display claims such as
/// `preferred_username` are user-editable and never stand in for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardClaims;

impl ClaimExtractor for StandardClaims {
    fn extract(&self, claims: &ClaimSet) -> Option<UserProfile> {
        let subject = claims.get_non_empty(CLAIM_SUB)?;
        let name = claims.get_str(CLAIM_NAME)?;
        let email = claims.get_non_empty(CLAIM_EMAIL).map(String::from);
        Some(UserProfile::new(subject, name, email))
    }
}
