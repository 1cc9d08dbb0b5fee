// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::init_data::InitDataError;
use super::session::SessionError;

/// Authentication error type.
///
/// Launch data failures keep their precise [`InitDataError`] for logging but
/// all render as the same generic 401, so a caller cannot tell a bad tag from
/// a stale or malformed payload.
#[derive(Debug)]
pub enum AuthError {
    /// Launch data failed verification
    InvalidInitData(InitDataError),
    /// Launch data verified but carried no user object
    MissingUser,
    /// No session cookie or bearer token present
    MissingSession,
    /// Session token is malformed or its signature is invalid
    InvalidSession,
    /// Session token has expired
    SessionExpired,
    /// Internal error
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidInitData(_) | AuthError::MissingUser => "unauthorized",
            AuthError::MissingSession => "missing_session",
            AuthError::InvalidSession => "invalid_session",
            AuthError::SessionExpired => "session_expired",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidInitData(_)
            | AuthError::MissingUser
            | AuthError::MissingSession
            | AuthError::InvalidSession
            | AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Internal reason, for logs only.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::InvalidInitData(e) => e.kind(),
            AuthError::MissingUser => "missing_user",
            other => other.error_code(),
        }
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Expired => AuthError::SessionExpired,
            SessionError::Malformed | SessionError::InvalidSignature => AuthError::InvalidSession,
            SessionError::Encoding(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<InitDataError> for AuthError {
    fn from(err: InitDataError) -> Self {
        AuthError::InvalidInitData(err)
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidInitData(_) | AuthError::MissingUser => write!(f, "Unauthorized"),
            AuthError::MissingSession => write!(f, "Session cookie is required"),
            AuthError::InvalidSession => write!(f, "Session is invalid"),
            AuthError::SessionExpired => write!(f, "Session has expired"),
            AuthError::Internal(_) => write!(f, "Internal authentication error"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
