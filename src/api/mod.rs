// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::SessionUser,
    config::RoutePaths,
    models::{ButtonClickRequest, InitRequest, InitResponse, MessageResponse, StatusResponse},
    state::AppState,
};

pub mod health;
pub mod session;
pub mod webapp;
pub mod webhook;

pub fn router(state: AppState, paths: &RoutePaths) -> Router {
    let api_routes = Router::new()
        .route("/init", post(session::init_session))
        .route("/me", get(session::current_user))
        .route("/greeting", get(webapp::greeting))
        .route("/status", get(webapp::status))
        .route("/button_click", post(webapp::button_click));

    let routes = Router::new()
        .nest(&paths.api, api_routes)
        .route(&paths.webhook, post(webhook::receive_update))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", api_doc(paths)))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// OpenAPI document with paths rewritten to the configured prefixes.
///
/// Handlers are annotated with the default `/api` and `/webhook` locations.
fn api_doc(paths: &RoutePaths) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let annotated = std::mem::take(&mut doc.paths.paths);
    doc.paths.paths = annotated
        .into_iter()
        .map(|(path, item)| (served_path(&path, paths), item))
        .collect();
    doc
}

fn served_path(annotated: &str, paths: &RoutePaths) -> String {
    let defaults = RoutePaths::default();
    if annotated == defaults.webhook {
        return paths.webhook.clone();
    }
    match annotated.strip_prefix(defaults.api.as_str()) {
        Some(rest) if rest.starts_with('/') => format!("{}{rest}", paths.api),
        _ => annotated.to_string(),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        session::init_session,
        session::current_user,
        webapp::greeting,
        webapp::status,
        webapp::button_click,
        webhook::receive_update,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            InitRequest,
            InitResponse,
            SessionUser,
            MessageResponse,
            StatusResponse,
            ButtonClickRequest
        )
    ),
    tags(
        (name = "Session", description = "Mini App launch verification and sessions"),
        (name = "Mini App", description = "Mini App utilities"),
        (name = "Bot", description = "Telegram webhook"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
