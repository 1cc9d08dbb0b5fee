// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the Mini App API. All types derive
//! `ToSchema` for the OpenAPI document served at `/docs`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::WebAppUser;

// =============================================================================
// Session Models
// =============================================================================

/// Launch request sent by the Mini App on startup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InitRequest {
    /// Raw `Telegram.WebApp.initData` string, unmodified.
    #[serde(rename = "initData")]
    pub init_data: String,
    /// Message the Mini App was opened from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Chat the Mini App was opened from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

/// Successful launch: the verified user and when their session ends.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InitResponse {
    /// Telegram user object from the launch data.
    #[schema(value_type = Object)]
    pub user: WebAppUser,
    /// Session expiry (Unix timestamp).
    pub session_expires_at: i64,
}

// =============================================================================
// Mini App Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

/// Button press reported by the Mini App.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ButtonClickRequest {
    pub message: String,
}
