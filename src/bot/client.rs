// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Minimal Telegram Bot API client for webhook management.

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use tracing::info;

const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

#[derive(Debug, thiserror::Error)]
pub enum BotApiError {
    #[error("Bot API request failed: {0}")]
    Request(String),

    #[error("Bot API rejected {method}: {description}")]
    Rejected {
        method: &'static str,
        description: String,
    },

    #[error("Bot API response was invalid: {0}")]
    InvalidResponse(String),
}

/// Current webhook registration as reported by `getWebhookInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WebhookInfo {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub pending_update_count: i64,
    #[serde(default)]
    pub last_error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Clone)]
pub struct BotApiClient {
    api_base_url: String,
    bot_token: String,
    http: Client,
}

impl std::fmt::Debug for BotApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotApiClient")
            .field("api_base_url", &self.api_base_url)
            .field("bot_token", &"[REDACTED]")
            .finish()
    }
}

impl BotApiClient {
    pub fn new(bot_token: &str) -> Result<Self, BotApiError> {
        Self::with_base_url(DEFAULT_API_BASE_URL, bot_token)
    }

    pub fn with_base_url(api_base_url: &str, bot_token: &str) -> Result<Self, BotApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| BotApiError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            bot_token: bot_token.to_string(),
            http,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base_url, self.bot_token, method)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        body: Value,
    ) -> Result<T, BotApiError> {
        // The request URL embeds the token, so it is stripped from errors.
        let response = self
            .http
            .post(self.method_url(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| BotApiError::Request(e.without_url().to_string()))?;

        let parsed: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| BotApiError::InvalidResponse(e.without_url().to_string()))?;

        unpack(method, parsed)
    }

    pub async fn get_webhook_info(&self) -> Result<WebhookInfo, BotApiError> {
        self.call("getWebhookInfo", json!({})).await
    }

    pub async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
    ) -> Result<bool, BotApiError> {
        let mut body = json!({ "url": url });
        if let Some(secret) = secret_token {
            body["secret_token"] = Value::String(secret.to_string());
        }
        self.call("setWebhook", body).await
    }

    pub async fn delete_webhook(&self) -> Result<bool, BotApiError> {
        self.call("deleteWebhook", json!({})).await
    }

    /// Register `url` unless it is already the active webhook.
    ///
    /// Telegram does not report the registered secret token, so when one is
    /// configured the webhook is always re-registered. Returns whether
    /// `setWebhook` was called.
    pub async fn ensure_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
    ) -> Result<bool, BotApiError> {
        let current = self.get_webhook_info().await?;
        if !needs_registration(&current, url, secret_token) {
            info!(pending = current.pending_update_count, "Webhook already registered");
            return Ok(false);
        }

        self.set_webhook(url, secret_token).await?;
        info!(webhook_url = %url, "Webhook registered");
        Ok(true)
    }
}

fn needs_registration(current: &WebhookInfo, url: &str, secret_token: Option<&str>) -> bool {
    current.url != url || secret_token.is_some()
}

fn unpack<T>(method: &'static str, response: ApiResponse<T>) -> Result<T, BotApiError> {
    if !response.ok {
        return Err(BotApiError::Rejected {
            method,
            description: response
                .description
                .unwrap_or_else(|| "no description".to_string()),
        });
    }
    response
        .result
        .ok_or_else(|| BotApiError::InvalidResponse(format!("{method} returned no result")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_url_embeds_token() {
        let client = BotApiClient::with_base_url("https://api.example.org/", "123:ABC").unwrap();
        assert_eq!(
            client.method_url("setWebhook"),
            "https://api.example.org/bot123:ABC/setWebhook"
        );
    }

    #[test]
    fn debug_redacts_token() {
        let client = BotApiClient::new("123:SECRET").unwrap();
        let printed = format!("{client:?}");
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains("SECRET"));
    }

    #[test]
    fn unpack_ok_response() {
        let response: ApiResponse<WebhookInfo> = serde_json::from_str(
            r#"{"ok":true,"result":{"url":"https://bot.example.org/webhook","pending_update_count":3,"has_custom_certificate":false}}"#,
        )
        .unwrap();

        let info = unpack("getWebhookInfo", response).unwrap();
        assert_eq!(info.url, "https://bot.example.org/webhook");
        assert_eq!(info.pending_update_count, 3);
    }

    #[test]
    fn unpack_error_response() {
        let response: ApiResponse<bool> =
            serde_json::from_str(r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#)
                .unwrap();

        match unpack("setWebhook", response) {
            Err(BotApiError::Rejected { method, description }) => {
                assert_eq!(method, "setWebhook");
                assert_eq!(description, "Unauthorized");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unpack_missing_result() {
        let response: ApiResponse<bool> = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(matches!(
            unpack("deleteWebhook", response),
            Err(BotApiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn registration_needed_only_on_change_or_secret() {
        let current = WebhookInfo {
            url: "https://bot.example.org/webhook".to_string(),
            ..WebhookInfo::default()
        };

        assert!(!needs_registration(&current, "https://bot.example.org/webhook", None));
        assert!(needs_registration(&current, "https://bot.example.org/hook2", None));
        assert!(needs_registration(
            &current,
            "https://bot.example.org/webhook",
            Some("s3cret")
        ));
        assert!(needs_registration(&WebhookInfo::default(), "https://x.org/webhook", None));
    }
}
