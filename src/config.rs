// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment (and an optional `.env`
//! file) once at startup. A missing bot token aborts startup; everything
//! else has a default.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `BOT_TOKEN` | Telegram bot token; source of the shared secret | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8000` |
//! | `WEBHOOK_BASE_URL` | Public HTTPS origin Telegram should call | Unset (no registration) |
//! | `WEBHOOK_PATH` | Route receiving bot updates | `/webhook` |
//! | `WEBHOOK_SECRET` | Expected `X-Telegram-Bot-Api-Secret-Token` | Unset |
//! | `WEB_APP_API_PATH` | Prefix for Mini App API routes | `/api` |
//! | `SESSION_LIFETIME_DAYS` | Session token lifetime | `7` |
//! | `SESSION_COOKIE_SECURE` | Add `Secure` to the session cookie | `true` |
//! | `TLS_CERT_PATH` | PEM certificate chain for direct HTTPS | Unset |
//! | `TLS_KEY_PATH` | PEM private key for direct HTTPS | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use url::Url;

pub const BOT_TOKEN_ENV: &str = "BOT_TOKEN";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const WEBHOOK_BASE_URL_ENV: &str = "WEBHOOK_BASE_URL";
pub const WEBHOOK_PATH_ENV: &str = "WEBHOOK_PATH";
pub const WEBHOOK_SECRET_ENV: &str = "WEBHOOK_SECRET";
pub const WEB_APP_API_PATH_ENV: &str = "WEB_APP_API_PATH";
pub const SESSION_LIFETIME_DAYS_ENV: &str = "SESSION_LIFETIME_DAYS";
pub const SESSION_COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_WEBHOOK_PATH: &str = "/webhook";
const DEFAULT_API_PATH: &str = "/api";
const DEFAULT_SESSION_LIFETIME_DAYS: u64 = 7;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Route prefixes the router is mounted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePaths {
    /// Prefix for the Mini App API (`/init`, `/greeting`, ...)
    pub api: String,
    /// Route receiving bot updates
    pub webhook: String,
}

impl Default for RoutePaths {
    fn default() -> Self {
        Self {
            api: DEFAULT_API_PATH.to_string(),
            webhook: DEFAULT_WEBHOOK_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub bind_addr: SocketAddr,
    pub webhook_base_url: Option<Url>,
    pub webhook_secret: Option<String>,
    pub routes: RoutePaths,
    pub session_lifetime: Duration,
    pub cookie_secure: bool,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"[REDACTED]")
            .field("bind_addr", &self.bind_addr)
            .field("webhook_base_url", &self.webhook_base_url.as_ref().map(Url::as_str))
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "[REDACTED]"))
            .field("routes", &self.routes)
            .field("session_lifetime", &self.session_lifetime)
            .field("cookie_secure", &self.cookie_secure)
            .field("tls", &self.tls)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A .env file is optional; production sets variables directly.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get(BOT_TOKEN_ENV).ok_or(ConfigError::MissingVar(BOT_TOKEN_ENV))?;

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get(PORT_ENV) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidValue(PORT_ENV, e.to_string()))?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue(HOST_ENV, e.to_string()))?;

        let webhook_base_url = get(WEBHOOK_BASE_URL_ENV)
            .map(|raw| parse_webhook_base_url(&raw))
            .transpose()?;

        let webhook_secret = get(WEBHOOK_SECRET_ENV)
            .map(|secret| validate_webhook_secret(&secret).map(|_| secret))
            .transpose()?;

        let routes = RoutePaths {
            api: route_path(WEB_APP_API_PATH_ENV, get(WEB_APP_API_PATH_ENV), DEFAULT_API_PATH)?,
            webhook: route_path(WEBHOOK_PATH_ENV, get(WEBHOOK_PATH_ENV), DEFAULT_WEBHOOK_PATH)?,
        };
        if routes.webhook == routes.api || routes.webhook.starts_with(&format!("{}/", routes.api)) {
            return Err(ConfigError::InvalidValue(
                WEBHOOK_PATH_ENV,
                "must not overlap the Mini App API prefix".to_string(),
            ));
        }

        let lifetime_days = match get(SESSION_LIFETIME_DAYS_ENV) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|days| (1..=365).contains(days))
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        SESSION_LIFETIME_DAYS_ENV,
                        "must be a whole number of days between 1 and 365".to_string(),
                    )
                })?,
            None => DEFAULT_SESSION_LIFETIME_DAYS,
        };

        let cookie_secure = match get(SESSION_COOKIE_SECURE_ENV) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ConfigError::InvalidValue(SESSION_COOKIE_SECURE_ENV, format!("expected a boolean, got {raw:?}"))
            })?,
            None => true,
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: PathBuf::from(cert),
                key: PathBuf::from(key),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingVar(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::MissingVar(TLS_CERT_PATH_ENV)),
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    LOG_FORMAT_ENV,
                    format!("expected `json` or `pretty`, got {other:?}"),
                ))
            }
        };

        Ok(Self {
            bot_token,
            bind_addr,
            webhook_base_url,
            webhook_secret,
            routes,
            session_lifetime: Duration::from_secs(lifetime_days * SECONDS_PER_DAY),
            cookie_secure,
            tls,
            log_format,
        })
    }

    /// Full URL Telegram should deliver updates to, when registration is enabled.
    pub fn webhook_url(&self) -> Option<String> {
        self.webhook_base_url.as_ref().map(|base| {
            format!("{}{}", base.as_str().trim_end_matches('/'), self.routes.webhook)
        })
    }
}

fn parse_webhook_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue(WEBHOOK_BASE_URL_ENV, e.to_string()))?;
    if url.scheme() != "https" {
        return Err(ConfigError::InvalidValue(
            WEBHOOK_BASE_URL_ENV,
            "Telegram only delivers webhooks over https".to_string(),
        ));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidValue(
            WEBHOOK_BASE_URL_ENV,
            "must not carry a query or fragment".to_string(),
        ));
    }
    Ok(url)
}

/// Telegram accepts 1-256 characters from `A-Z a-z 0-9 _ -`.
fn validate_webhook_secret(secret: &str) -> Result<(), ConfigError> {
    let valid_chars = secret
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if secret.len() > 256 || !valid_chars {
        return Err(ConfigError::InvalidValue(
            WEBHOOK_SECRET_ENV,
            "must be 1-256 characters of A-Z, a-z, 0-9, `_` or `-`".to_string(),
        ));
    }
    Ok(())
}

fn route_path(
    name: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<String, ConfigError> {
    let path = value.unwrap_or_else(|| default.to_string());
    if !path.starts_with('/') || path == "/" || path.ends_with('/') {
        return Err(ConfigError::InvalidValue(
            name,
            "must start with `/`, not end with `/`, and not be the root".to_string(),
        ));
    }
    Ok(path)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
