// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{Method, Uri},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{error::ApiError, state::AppState};

pub mod body;
pub mod login;
pub mod protected;
pub mod stamp;

/// Paths answering the protected-resource check, all API versions.
pub const PROTECTED_PATHS: [&str; 6] = ["/api", "/api/", "/api/v1", "/api/v1/", "/api/v1.0", "/api/v1.0/"];

/// Paths answering login, all API versions.
pub const LOGIN_PATHS: [&str; 6] = [
    "/api/login",
    "/api/login/",
    "/api/v1/login",
    "/api/v1/login/",
    "/api/v1.0/login",
    "/api/v1.0/login/",
];

pub fn router(state: AppState) -> Router {
    let mut routes = Router::new();

    for path in PROTECTED_PATHS {
        routes = routes.route(path, get(protected::protected).fallback(not_found));
    }
    for path in LOGIN_PATHS {
        routes = routes.route(path, post(login::login).fallback(not_found));
    }

    routes
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(stamp::stamp_request))
        .layer(TraceLayer::new_for_http())
}

/// Unknown paths, and known paths hit with the wrong method.
async fn not_found(method: Method, uri: Uri) -> ApiError {
    tracing::warn!(%method, path = %uri.path(), "No route");
    ApiError::not_found()
}
