//! ID token decoding
//!
//! The adapter reads the identity claims out of the ID token the upstream
//! provider returned over the same TLS connection. Signatures are not
//! verified and neither are audience or issuer. `exp` must be present; it
//! becomes the expiry of the cache entry but is not checked against the clock
//! here.

use crate::model::ClaimSet;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::decode_header;

/// Decode the claims of an ID token without verifying its signature
///
/// Returns `None` for anything that isn't a three-part JWT with a valid JOSE
/// header and a JSON claim set carrying an integer `exp`. Works for any
/// signing algorithm since no key is involved.
pub fn decode_claims(id_token: &str) -> Option<ClaimSet> {
    if let Err(e) = decode_header(id_token) {
        tracing::debug!("ID token header is not decodable: {}", e);
        return None;
    }

    let mut parts = id_token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        tracing::debug!("ID token is not a three-part JWS");
        return None;
    };

    let bytes = match URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("ID token payload is not base64url: {}", e);
            return None;
        }
    };

    match serde_json::from_slice::<ClaimSet>(&bytes) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!("ID token claims are not decodable: {}", e);
            None
        }
    }
}
