// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for session users.
//!
//! Use the `Session` extractor in handlers to require a valid session:
//!
//! ```rust,ignore
//! async fn my_handler(Session(user): Session) -> impl IntoResponse {
//!     // user is SessionUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
};
use chrono::Utc;

use super::{AuthError, SessionUser, SESSION_COOKIE};
use crate::state::AppState;

/// Extractor for requests carrying a valid session token.
///
/// The token is read from the `jwt` cookie set by `/init`; an
/// `Authorization: Bearer` header is accepted as a fallback for clients
/// that cannot send cookies.
pub struct Session(pub SessionUser);

impl FromRequestParts<AppState> for Session {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if an upstream layer already authenticated the request
        if let Some(user) = parts.extensions.get::<SessionUser>().cloned() {
            return Ok(Session(user));
        }

        let token = session_token(&parts.headers).ok_or(AuthError::MissingSession)?;

        let claims = state
            .auth
            .check_session(&token, Utc::now().timestamp())
            .map_err(|e| {
                tracing::debug!(reason = e.kind(), "session token rejected");
                AuthError::from(e)
            })?;

        Ok(Session(claims.into()))
    }
}

/// Find the session token in the cookie header(s), then the bearer header.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
            .map(|token| token.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{test_support::TEST_BOT_TOKEN, AuthContext};
    use axum::http::Request;

    fn create_test_state() -> AppState {
        AppState::new(AuthContext::from_bot_token(TEST_BOT_TOKEN))
    }

    fn parts_with_header(name: &str, value: &str) -> Parts {
        Request::builder()
            .uri("/test")
            .header(name, value)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    fn fresh_token(state: &AppState, user_id: i64) -> String {
        state
            .auth
            .issue_session(user_id, Utc::now().timestamp())
            .unwrap()
            .token
    }

    #[tokio::test]
    async fn session_extractor_requires_token() {
        let state = create_test_state();
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Session::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingSession)));
    }

    #[tokio::test]
    async fn session_extractor_reads_cookie() {
        let state = create_test_state();
        let token = fresh_token(&state, 42);
        let mut parts = parts_with_header("Cookie", &format!("theme=dark; jwt={token}; lang=en"));

        let result = Session::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.unwrap().0.user_id, 42);
    }

    #[tokio::test]
    async fn session_extractor_falls_back_to_bearer() {
        let state = create_test_state();
        let token = fresh_token(&state, 7);
        let mut parts = parts_with_header("Authorization", &format!("Bearer {token}"));

        let result = Session::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.unwrap().0.user_id, 7);
    }

    #[tokio::test]
    async fn session_extractor_rejects_foreign_token() {
        let state = create_test_state();
        let other = AuthContext::from_bot_token("999:OTHER");
        let token = other
            .issue_session(42, Utc::now().timestamp())
            .unwrap()
            .token;
        let mut parts = parts_with_header("Cookie", &format!("jwt={token}"));

        let result = Session::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidSession)));
    }

    #[tokio::test]
    async fn session_extractor_rejects_expired_token() {
        let state = create_test_state();
        let long_ago = Utc::now().timestamp() - 30 * 24 * 60 * 60;
        let token = state.auth.issue_session(42, long_ago).unwrap().token;
        let mut parts = parts_with_header("Cookie", &format!("jwt={token}"));

        let result = Session::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::SessionExpired)));
    }

    #[tokio::test]
    async fn session_extractor_prefers_extensions() {
        let state = create_test_state();
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let user = SessionUser {
            user_id: 99,
            expires_at: 0,
        };
        parts.extensions.insert(user.clone());

        let result = Session::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.unwrap().0, user);
    }

    #[test]
    fn session_token_ignores_similarly_named_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "jwt_old=stale; xjwt=nope".parse().unwrap());
        assert_eq!(session_token(&headers), None);

        headers.insert(COOKIE, "jwt_old=stale; jwt=fresh".parse().unwrap());
        assert_eq!(session_token(&headers).as_deref(), Some("fresh"));
    }
}
