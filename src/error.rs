// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors returned by the bot webhook endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Why an inbound webhook call was refused.
///
/// Telegram retries non-2xx deliveries, so only calls that can never succeed
/// end up here.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// `X-Telegram-Bot-Api-Secret-Token` missing or different from the configured one
    #[error("Unauthorized")]
    InvalidSecretToken,

    /// Body is not a JSON update envelope
    #[error("Invalid update payload")]
    InvalidUpdate(#[source] serde_json::Error),
}

#[derive(Serialize)]
struct WebhookErrorBody {
    error: String,
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSecretToken => StatusCode::UNAUTHORIZED,
            WebhookError::InvalidUpdate(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // The decode error stays in the logs; callers only see the summary.
        let body = Json(WebhookErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
