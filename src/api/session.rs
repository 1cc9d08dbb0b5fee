// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mini App launch and session endpoints.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderName},
    Json,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::{
    auth::{AuthError, Session, SessionUser},
    models::{InitRequest, InitResponse},
    state::AppState,
};

/// Exchange verified launch data for a session cookie.
///
/// Every verification failure yields the same 401 body; the specific reason
/// is only logged.
#[utoipa::path(
    post,
    path = "/api/init",
    tag = "Session",
    request_body = InitRequest,
    responses(
        (status = 200, description = "Launch data verified; `jwt` cookie set", body = InitResponse),
        (status = 401, description = "Launch data rejected"),
    )
)]
pub async fn init_session(
    State(state): State<AppState>,
    Json(request): Json<InitRequest>,
) -> Result<([(HeaderName, String); 1], Json<InitResponse>), AuthError> {
    let now = Utc::now().timestamp();

    let verified = state
        .auth
        .verify_init_data(&request.init_data, now)
        .map_err(|e| {
            warn!(reason = e.kind(), "Rejected Mini App launch data");
            AuthError::InvalidInitData(e)
        })?;

    let user = verified.user.ok_or_else(|| {
        warn!(reason = "missing_user", "Rejected Mini App launch data");
        AuthError::MissingUser
    })?;

    let session = state.auth.issue_session(user.id, now)?;

    info!(
        user_id = user.id,
        message_id = request.message_id.as_deref(),
        chat_id = request.chat_id.as_deref(),
        "Mini App session issued"
    );

    let cookie = state.auth.session_cookie(&session.token);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(InitResponse {
            user,
            session_expires_at: session.expires_at,
        }),
    ))
}

/// Get the user bound to the current session.
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Session",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Session user", body = SessionUser),
        (status = 401, description = "Missing, invalid or expired session"),
    )
)]
pub async fn current_user(Session(user): Session) -> Json<SessionUser> {
    Json(user)
}
