// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Telegram bot boundary.
//!
//! Updates arrive on the webhook endpoint and are handed, unparsed beyond
//! their envelope, to an [`UpdateHandler`]. Command routing lives behind that
//! trait; this crate ships only [`LoggingUpdateHandler`].
//!
//! [`client::BotApiClient`] talks to the Bot API for webhook registration.

pub mod client;

use serde::{Deserialize, Serialize};

pub use client::{BotApiClient, BotApiError, WebhookInfo};

/// Incoming update envelope.
///
/// Exactly one payload key (`message`, `callback_query`, ...) accompanies
/// `update_id`; it is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl Update {
    /// Payload key naming the update type.
    pub fn kind(&self) -> &str {
        self.payload
            .keys()
            .next()
            .map(String::as_str)
            .unwrap_or("unknown")
    }
}

/// Consumer of inbound bot updates.
///
/// Called on the request task; implementations that do slow work should
/// spawn it and return.
pub trait UpdateHandler: Send + Sync {
    fn handle(&self, update: Update);
}

/// Handler that only records updates in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingUpdateHandler;

impl UpdateHandler for LoggingUpdateHandler {
    fn handle(&self, update: Update) {
        tracing::info!(
            update_id = update.update_id,
            kind = update.kind(),
            "received bot update"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_keeps_payload_and_reports_kind() {
        let update: Update = serde_json::from_str(
            r#"{"update_id":10,"message":{"message_id":1,"text":"/start","chat":{"id":5}}}"#,
        )
        .unwrap();

        assert_eq!(update.update_id, 10);
        assert_eq!(update.kind(), "message");
        assert_eq!(update.payload["message"]["text"], "/start");
    }

    #[test]
    fn update_without_payload_is_unknown() {
        let update: Update = serde_json::from_str(r#"{"update_id":1}"#).unwrap();
        assert_eq!(update.kind(), "unknown");
    }

    #[test]
    fn update_requires_id() {
        assert!(serde_json::from_str::<Update>(r#"{"message":{}}"#).is_err());
    }
}
