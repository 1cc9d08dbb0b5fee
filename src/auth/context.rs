// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication configuration shared by all handlers.

use std::time::Duration;

use super::init_data::{self, InitDataError, InitDataPolicy, VerifiedInitData};
use super::secret::SharedSecret;
use super::session::{
    self, SessionClaims, SessionError, SessionToken, DEFAULT_SESSION_LIFETIME,
};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "jwt";

/// Immutable authentication state.
///
/// Built once at startup and shared behind an `Arc`; rotating the bot token
/// means building a new context (in practice, restarting the process).
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Secret derived from the bot token
    pub secret: SharedSecret,
    /// Launch data freshness bounds
    pub policy: InitDataPolicy,
    /// Lifetime of issued session tokens
    pub session_lifetime: Duration,
    /// Whether the session cookie carries the `Secure` attribute
    pub cookie_secure: bool,
}

impl AuthContext {
    /// Create a context with default policy and lifetime.
    pub fn new(secret: SharedSecret) -> Self {
        Self {
            secret,
            policy: InitDataPolicy::default(),
            session_lifetime: DEFAULT_SESSION_LIFETIME,
            cookie_secure: true,
        }
    }

    /// Derive the secret from a bot token and create a default context.
    pub fn from_bot_token(bot_token: &str) -> Self {
        Self::new(SharedSecret::derive(bot_token))
    }

    pub fn with_session_lifetime(mut self, lifetime: Duration) -> Self {
        self.session_lifetime = lifetime;
        self
    }

    pub fn with_policy(mut self, policy: InitDataPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    /// Verify raw launch data at instant `now` (Unix seconds).
    pub fn verify_init_data(&self, raw: &str, now: i64) -> Result<VerifiedInitData, InitDataError> {
        init_data::verify(raw, &self.secret, now, &self.policy)
    }

    /// Issue a session token for `user_id` starting at `now`.
    pub fn issue_session(&self, user_id: i64, now: i64) -> Result<SessionToken, SessionError> {
        session::issue(user_id, &self.secret, now, self.session_lifetime)
    }

    /// Check a session token at instant `now`.
    pub fn check_session(&self, token: &str, now: i64) -> Result<SessionClaims, SessionError> {
        session::check(token, &self.secret, now)
    }

    /// `Set-Cookie` value for a session token.
    pub fn session_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{SESSION_COOKIE}={token}; HttpOnly; Path=/; Max-Age={}",
            self.session_lifetime.as_secs()
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}
