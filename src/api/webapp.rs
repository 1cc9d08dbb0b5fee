// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Simple Mini App endpoints.

use axum::{http::StatusCode, Json};

use crate::models::{ButtonClickRequest, MessageResponse, StatusResponse};

#[utoipa::path(
    get,
    path = "/api/greeting",
    tag = "Mini App",
    responses(
        (status = 200, description = "Greeting message", body = MessageResponse)
    )
)]
pub async fn greeting() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello from the Mini App backend!".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/status",
    tag = "Mini App",
    responses(
        (status = 200, description = "Application status", body = StatusResponse)
    )
)]
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "active".to_string(),
    })
}

/// Record a button press from the Mini App.
#[utoipa::path(
    post,
    path = "/api/button_click",
    tag = "Mini App",
    request_body = ButtonClickRequest,
    responses(
        (status = 200, description = "Click recorded", body = String)
    )
)]
pub async fn button_click(Json(request): Json<ButtonClickRequest>) -> (StatusCode, &'static str) {
    tracing::info!(message = %request.message, "Mini App button clicked");
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn greeting_returns_message() {
        let Json(body) = greeting().await;
        assert!(!body.message.is_empty());
    }

    #[tokio::test]
    async fn status_is_active() {
        let Json(body) = status().await;
        assert_eq!(body.status, "active");
    }

    #[tokio::test]
    async fn button_click_acknowledges() {
        let (code, body) = button_click(Json(ButtonClickRequest {
            message: "Ok".to_string(),
        }))
        .await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body, "OK");
    }
}
