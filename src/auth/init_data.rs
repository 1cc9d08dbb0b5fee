// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mini App launch data verification.
//!
//! The Mini App hands its backend an opaque `initData` string: URL-encoded
//! `key=value` pairs joined by `&`, one of which (`hash`) is the hex
//! HMAC-SHA256 tag over every other pair. Verification:
//!
//! 1. Split on `&`, split each token on the first `=`, percent-decode both sides.
//! 2. Require `hash` and `auth_date`.
//! 3. Build the check string: every pair except `hash` rendered as `key=value`,
//!    sorted byte-wise as whole strings, joined with `\n`.
//! 4. Compare `hex(HMAC(secret, check_string))` against `hash` in constant time.
//! 5. Enforce freshness of `auth_date` in both directions.
//! 6. Decode the `user` JSON object, if present.
//!
//! Every failure is a distinct [`InitDataError`] so callers can log the kind;
//! the HTTP layer collapses them all to a single 401.

use std::collections::{btree_map::Entry, BTreeMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use super::secret::{hmac_sha256, SharedSecret};

/// Field carrying the authentication tag.
pub const HASH_FIELD: &str = "hash";
/// Field carrying the Unix timestamp of the launch.
pub const AUTH_DATE_FIELD: &str = "auth_date";
/// Field carrying the JSON-encoded user object.
pub const USER_FIELD: &str = "user";

/// Maximum accepted payload age (15 minutes).
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(900);

/// Maximum accepted distance of `auth_date` into the future.
pub const DEFAULT_MAX_FUTURE_SKEW: Duration = Duration::from_secs(60);

/// Freshness bounds applied to `auth_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitDataPolicy {
    /// `now - auth_date` above this is [`InitDataError::Expired`]. Inclusive.
    pub max_age: Duration,
    /// `auth_date - now` above this is [`InitDataError::FromFuture`]. Inclusive.
    pub max_future_skew: Duration,
}

impl Default for InitDataPolicy {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
            max_future_skew: DEFAULT_MAX_FUTURE_SKEW,
        }
    }
}

/// Launch data rejection reasons.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitDataError {
    #[error("launch data is malformed: {0}")]
    MalformedPayload(String),

    #[error("launch data is missing the `{0}` field")]
    MissingRequiredField(&'static str),

    #[error("launch data hash does not match")]
    AuthenticationFailed,

    #[error("launch data has expired")]
    Expired,

    #[error("launch data is dated in the future")]
    FromFuture,

    #[error("launch data user object is invalid: {0}")]
    InvalidUserPayload(String),
}

impl InitDataError {
    /// Stable code for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            InitDataError::MalformedPayload(_) => "malformed_payload",
            InitDataError::MissingRequiredField(_) => "missing_required_field",
            InitDataError::AuthenticationFailed => "authentication_failed",
            InitDataError::Expired => "expired",
            InitDataError::FromFuture => "from_future",
            InitDataError::InvalidUserPayload(_) => "invalid_user_payload",
        }
    }
}

/// Telegram user as embedded in launch data.
///
/// Unknown keys are kept in `extra` so the object can be echoed back intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebAppUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bot: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allows_write_to_pm: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Authenticated launch data.
///
/// Only ever produced by [`verify`].
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedInitData {
    /// Launch timestamp (Unix seconds).
    pub auth_date: i64,
    /// Decoded `user` object, when the launch context carried one.
    pub user: Option<WebAppUser>,
    /// Remaining decoded fields (`auth_date`, `query_id`, `chat_instance`, ...),
    /// excluding `hash` and `user`.
    pub fields: BTreeMap<String, String>,
}

/// Split and percent-decode a raw payload into its fields.
pub fn parse(raw: &str) -> Result<BTreeMap<String, String>, InitDataError> {
    if raw.is_empty() {
        return Err(InitDataError::MalformedPayload("empty payload".to_string()));
    }

    let mut fields = BTreeMap::new();
    for token in raw.split('&') {
        let (key, value) = token.split_once('=').ok_or_else(|| {
            InitDataError::MalformedPayload("field without `=` separator".to_string())
        })?;

        match fields.entry(percent_decode(key)?) {
            Entry::Vacant(slot) => {
                slot.insert(percent_decode(value)?);
            }
            Entry::Occupied(slot) => {
                return Err(InitDataError::MalformedPayload(format!(
                    "duplicate field `{}`",
                    slot.key()
                )));
            }
        }
    }

    Ok(fields)
}

fn percent_decode(input: &str) -> Result<String, InitDataError> {
    // `urlencoding` passes malformed escapes through as literal text.
    if !has_valid_escapes(input.as_bytes()) {
        return Err(InitDataError::MalformedPayload(
            "invalid percent-encoding".to_string(),
        ));
    }
    urlencoding::decode(input)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| InitDataError::MalformedPayload("invalid percent-encoding".to_string()))
}

/// Every `%` must start a `%XX` escape with two hex digits.
fn has_valid_escapes(input: &[u8]) -> bool {
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'%' {
            match input.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}

/// Canonical string the tag is computed over.
///
/// Sorting is over the rendered `key=value` strings, not the keys alone.
pub fn data_check_string(fields: &BTreeMap<String, String>) -> String {
    let mut lines: Vec<String> = fields
        .iter()
        .filter(|(key, _)| key.as_str() != HASH_FIELD)
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    lines.sort_unstable();
    lines.join("\n")
}

/// Lowercase hex HMAC-SHA256 tag of a check string.
pub fn sign(secret: &SharedSecret, check_string: &str) -> String {
    hex::encode(hmac_sha256(secret.as_bytes(), check_string.as_bytes()))
}

/// Authenticate and decode a raw launch payload.
///
/// `now` is Unix seconds; callers pass the wall clock in production.
pub fn verify(
    raw: &str,
    secret: &SharedSecret,
    now: i64,
    policy: &InitDataPolicy,
) -> Result<VerifiedInitData, InitDataError> {
    let mut fields = parse(raw)?;

    let received = fields
        .remove(HASH_FIELD)
        .ok_or(InitDataError::MissingRequiredField(HASH_FIELD))?;
    let auth_date = fields
        .get(AUTH_DATE_FIELD)
        .cloned()
        .ok_or(InitDataError::MissingRequiredField(AUTH_DATE_FIELD))?;

    let check_string = data_check_string(&fields);
    let expected = sign(secret, &check_string);

    #[cfg(feature = "dev")]
    tracing::debug!(
        check_string = %check_string,
        computed = %expected,
        received = %received,
        "launch data diagnostics"
    );

    if !bool::from(expected.as_bytes().ct_eq(received.as_bytes())) {
        return Err(InitDataError::AuthenticationFailed);
    }

    let auth_date: i64 = auth_date.parse().map_err(|_| {
        InitDataError::MalformedPayload("auth_date is not an integer".to_string())
    })?;
    check_freshness(auth_date, now, policy)?;

    let user = fields
        .remove(USER_FIELD)
        .map(|raw_user| serde_json::from_str::<WebAppUser>(&raw_user))
        .transpose()
        .map_err(|e| InitDataError::InvalidUserPayload(e.to_string()))?;

    Ok(VerifiedInitData {
        auth_date,
        user,
        fields,
    })
}

fn check_freshness(auth_date: i64, now: i64, policy: &InitDataPolicy) -> Result<(), InitDataError> {
    let age = now.saturating_sub(auth_date);
    if age > secs_i64(policy.max_age) {
        return Err(InitDataError::Expired);
    }
    if age < 0 && age.unsigned_abs() > policy.max_future_skew.as_secs() {
        return Err(InitDataError::FromFuture);
    }
    Ok(())
}

fn secs_i64(duration: Duration) -> i64 {
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
}
