// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared secret derived from the bot token.
//!
//! Telegram signs Mini App launch data with `HMAC-SHA256(key = "WebAppData",
//! message = bot_token)`. The same 32-byte value keys the launch-data tag
//! and the session tokens this service issues, so it is derived once at
//! startup and handed around inside [`super::AuthContext`].

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Domain-separation label Telegram uses as the HMAC key.
pub const WEB_APP_DATA_LABEL: &[u8] = b"WebAppData";

/// Length of the derived secret in bytes.
pub const SECRET_LEN: usize = 32;

/// Keyed-hash secret used for launch-data tags and session tokens.
///
/// Never logged: `Debug` is redacted and the type is not serializable.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret([u8; SECRET_LEN]);

impl SharedSecret {
    /// Derive the secret from the bot's long-lived token.
    ///
    /// The token must already be validated as non-empty by the config loader.
    pub fn derive(bot_token: &str) -> Self {
        Self(hmac_sha256(WEB_APP_DATA_LABEL, bot_token.as_bytes()))
    }

    /// Wrap raw secret bytes (tests, injected secrets).
    pub fn from_bytes(bytes: [u8; SECRET_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

/// One-shot HMAC-SHA256.
pub(crate) fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    // HMAC accepts keys of any length; `new_from_slice` cannot fail here.
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(message);
    mac.finalize().into_bytes().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let a = SharedSecret::derive("123:ABC-DEF");
        let b = SharedSecret::derive("123:ABC-DEF");
        assert_eq!(a, b);
        assert_eq!(a.as_bytes().len(), SECRET_LEN);
    }

    #[test]
    fn derive_uses_label_as_key() {
        let secret = SharedSecret::derive("123:ABC-DEF");
        let expected = hmac_sha256(b"WebAppData", b"123:ABC-DEF");
        assert_eq!(secret.as_bytes(), &expected);

        // Swapping key and message must give a different value.
        let swapped = hmac_sha256(b"123:ABC-DEF", b"WebAppData");
        assert_ne!(secret.as_bytes(), &swapped);
    }

    #[test]
    fn different_tokens_give_different_secrets() {
        assert_ne!(
            SharedSecret::derive("123:ABC-DEF"),
            SharedSecret::derive("123:ABC-DEG")
        );
    }

    #[test]
    fn hmac_matches_rfc4231_case_2() {
        let tag = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(tag),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn debug_is_redacted() {
        let secret = SharedSecret::from_bytes([0xAB; SECRET_LEN]);
        assert_eq!(format!("{secret:?}"), "SharedSecret([REDACTED])");
    }
}
