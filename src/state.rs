// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::auth::AuthContext;
use crate::bot::{LoggingUpdateHandler, UpdateHandler};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthContext>,
    pub updates: Arc<dyn UpdateHandler>,
    pub webhook: WebhookState,
}

/// Webhook settings visible to request handlers.
#[derive(Clone, Default)]
pub struct WebhookState {
    /// Expected `X-Telegram-Bot-Api-Secret-Token` value, if configured.
    pub secret: Option<Arc<str>>,
    /// Whether this process registers the webhook with Telegram.
    pub managed: bool,
    registered: Arc<AtomicBool>,
}

impl WebhookState {
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    pub fn set_registered(&self, registered: bool) {
        self.registered.store(registered, Ordering::Release);
    }
}

impl AppState {
    pub fn new(auth: AuthContext) -> Self {
        Self {
            auth: Arc::new(auth),
            updates: Arc::new(LoggingUpdateHandler),
            webhook: WebhookState::default(),
        }
    }

    pub fn with_update_handler(mut self, handler: Arc<dyn UpdateHandler>) -> Self {
        self.updates = handler;
        self
    }

    pub fn with_webhook_secret(mut self, secret: Option<String>) -> Self {
        self.webhook.secret = secret.map(Arc::from);
        self
    }

    pub fn with_managed_webhook(mut self, managed: bool) -> Self {
        self.webhook.managed = managed;
        self
    }
}
