// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mini App Bot Server - Telegram Mini App backend
//!
//! This crate verifies Telegram Mini App launch data, exchanges it for a
//! signed session cookie and relays bot updates received over a webhook.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Launch data verification and sessions
//! - `bot` - Webhook updates and the Bot API client
//! - `config` - Environment configuration

pub mod api;
pub mod auth;
pub mod bot;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
