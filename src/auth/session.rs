// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session tokens issued after a verified Mini App launch.
//!
//! Tokens are HS256 JWTs keyed with the shared secret and carry
//! `{ user_id, iat, exp }`. There is no server-side session store: a token
//! is valid while its signature checks out and `exp > now`.

use std::time::Duration;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use super::secret::SharedSecret;

/// Default session lifetime (7 days).
pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Telegram user id
    pub user_id: i64,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds, exclusive)
    pub exp: i64,
}

/// A freshly minted token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session token is malformed")]
    Malformed,

    #[error("session token signature is invalid")]
    InvalidSignature,

    #[error("session token has expired")]
    Expired,

    #[error("failed to encode session token: {0}")]
    Encoding(String),
}

impl SessionError {
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::Malformed => "malformed",
            SessionError::InvalidSignature => "invalid_signature",
            SessionError::Expired => "expired",
            SessionError::Encoding(_) => "encoding",
        }
    }
}

/// Mint a session token for `user_id`, valid until `now + lifetime`.
pub fn issue(
    user_id: i64,
    secret: &SharedSecret,
    now: i64,
    lifetime: Duration,
) -> Result<SessionToken, SessionError> {
    let lifetime = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);
    let claims = SessionClaims {
        user_id,
        iat: now,
        exp: now.saturating_add(lifetime),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| SessionError::Encoding(e.to_string()))?;

    Ok(SessionToken {
        token,
        expires_at: claims.exp,
    })
}

/// Validate a session token at instant `now`.
///
/// Only HS256 is accepted. Expiry is judged against `now`, not the wall clock,
/// and a token is dead from the second `exp` is reached.
pub fn check(token: &str, secret: &SharedSecret, now: i64) -> Result<SessionClaims, SessionError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.leeway = 0;

    let claims = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => SessionError::InvalidSignature,
        _ => SessionError::Malformed,
    })?
    .claims;

    if claims.exp <= now {
        return Err(SessionError::Expired);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    const NOW: i64 = 1_760_000_000;

    fn secret() -> SharedSecret {
        SharedSecret::derive("123:ABC-DEF")
    }

    #[test]
    fn issued_token_checks_within_lifetime() {
        let issued = issue(12345, &secret(), NOW, DEFAULT_SESSION_LIFETIME).unwrap();
        assert_eq!(issued.expires_at, NOW + 7 * 24 * 60 * 60);

        let claims = check(&issued.token, &secret(), NOW).unwrap();
        assert_eq!(claims.user_id, 12345);
        assert_eq!(claims.iat, NOW);
        assert_eq!(claims.exp, issued.expires_at);

        let later = check(&issued.token, &secret(), issued.expires_at - 1).unwrap();
        assert_eq!(later.user_id, 12345);
    }

    #[test]
    fn token_is_dead_at_and_after_expiry() {
        let issued = issue(1, &secret(), NOW, Duration::from_secs(60)).unwrap();

        assert_eq!(
            check(&issued.token, &secret(), issued.expires_at),
            Err(SessionError::Expired)
        );
        assert_eq!(
            check(&issued.token, &secret(), issued.expires_at + 3600),
            Err(SessionError::Expired)
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issued = issue(1, &secret(), NOW, DEFAULT_SESSION_LIFETIME).unwrap();
        let other = SharedSecret::derive("999:OTHER");

        assert_eq!(
            check(&issued.token, &other, NOW),
            Err(SessionError::InvalidSignature)
        );
    }

    #[test]
    fn tampered_claims_are_rejected() {
        let issued = issue(1, &secret(), NOW, DEFAULT_SESSION_LIFETIME).unwrap();
        let parts: Vec<&str> = issued.token.split('.').collect();
        assert_eq!(parts.len(), 3);

        let forged_claims = format!(r#"{{"user_id":2,"iat":{NOW},"exp":{}}}"#, NOW + 60);
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(forged_claims.as_bytes()),
            parts[2]
        );

        assert_eq!(
            check(&forged, &secret(), NOW),
            Err(SessionError::InvalidSignature)
        );
    }

    #[test]
    fn other_algorithms_are_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(format!(
            r#"{{"user_id":1,"iat":{NOW},"exp":{}}}"#,
            NOW + 60
        ));
        let unsigned = format!("{header}.{claims}.");
        assert!(check(&unsigned, &secret(), NOW).is_err());

        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS512","typ":"JWT"}"#);
        let wrong_alg = format!("{header}.{claims}.c2lnbmF0dXJl");
        assert!(check(&wrong_alg, &secret(), NOW).is_err());
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(check("", &secret(), NOW), Err(SessionError::Malformed));
        assert_eq!(
            check("not-a-token", &secret(), NOW),
            Err(SessionError::Malformed)
        );
    }

    #[test]
    fn token_payload_carries_only_session_claims() {
        let issued = issue(42, &secret(), NOW, DEFAULT_SESSION_LIFETIME).unwrap();
        let payload = issued.token.split('.').nth(1).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();

        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["exp", "iat", "user_id"]);
    }
}
