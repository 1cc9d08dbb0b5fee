// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bot update webhook.

use axum::{body::Bytes, extract::State, http::HeaderMap};
use subtle::ConstantTimeEq;

use crate::{bot::Update, error::WebhookError, state::AppState};

/// Header Telegram uses to echo the webhook secret token.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Receive a bot update and hand it to the configured handler.
#[utoipa::path(
    post,
    path = "/webhook",
    tag = "Bot",
    request_body(content = Object, description = "Telegram Update object"),
    responses(
        (status = 200, description = "Update accepted", body = String),
        (status = 400, description = "Body is not a Telegram update"),
        (status = 401, description = "Secret token missing or wrong"),
    )
)]
pub async fn receive_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, WebhookError> {
    if let Some(expected) = state.webhook.secret.as_deref() {
        let presented = headers
            .get(SECRET_TOKEN_HEADER)
            .map(|value| value.as_bytes())
            .unwrap_or_default();
        if !bool::from(presented.ct_eq(expected.as_bytes())) {
            tracing::warn!("Rejected webhook call with missing or wrong secret token");
            return Err(WebhookError::InvalidSecretToken);
        }
    }

    let update: Update = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Webhook body is not a valid update");
        WebhookError::InvalidUpdate(e)
    })?;

    state.updates.handle(update);
    Ok("OK")
}
