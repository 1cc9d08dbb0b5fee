// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{io, net::SocketAddr, time::Duration};

use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use miniapp_bot_server::{
    api::router,
    auth::AuthContext,
    bot::BotApiClient,
    config::{Config, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.init(),
    }
}

async fn shutdown_signal(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}

/// Serve `app` on `addr` until `handle` signals shutdown.
///
/// HTTPS when a TLS config is given, plain HTTP otherwise.
async fn serve(
    app: Router,
    addr: SocketAddr,
    tls: Option<RustlsConfig>,
    handle: Handle<SocketAddr>,
) -> io::Result<()> {
    match tls {
        Some(tls_config) => {
            info!("Mini App bot server listening on https://{addr} (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
        None => {
            info!("Mini App bot server listening on http://{addr} (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
    }
}

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    let auth = AuthContext::from_bot_token(&config.bot_token)
        .with_session_lifetime(config.session_lifetime)
        .with_cookie_secure(config.cookie_secure);

    let webhook_url = config.webhook_url();
    let state = AppState::new(auth)
        .with_webhook_secret(config.webhook_secret.clone())
        .with_managed_webhook(webhook_url.is_some());

    let bot = BotApiClient::new(&config.bot_token).expect("Failed to build Bot API client");

    if let Some(url) = webhook_url.as_deref() {
        match bot.ensure_webhook(url, config.webhook_secret.as_deref()).await {
            Ok(_) => state.webhook.set_registered(true),
            Err(e) => error!(error = %e, "Webhook registration failed"),
        }
    }

    let app = router(state.clone(), &config.routes);

    let handle = Handle::<SocketAddr>::new();
    tokio::spawn(shutdown_signal(handle.clone()));

    let tls_config = match &config.tls {
        Some(tls) => {
            // Install the ring crypto provider for rustls (must be done before any TLS operations)
            rustls::crypto::ring::default_provider()
                .install_default()
                .expect("Failed to install rustls crypto provider");

            Some(
                RustlsConfig::from_pem_file(&tls.cert, &tls.key)
                    .await
                    .expect("Failed to load TLS certificate and key"),
            )
        }
        None => None,
    };

    let served = serve(app, config.bind_addr, tls_config, handle).await;

    if let Err(e) = served {
        error!(error = %e, "Server failed");
    }

    if state.webhook.managed {
        match bot.delete_webhook().await {
            Ok(_) => info!("Webhook deleted"),
            Err(e) => warn!(error = %e, "Failed to delete webhook"),
        }
    }
}
