// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request stamping: correlation id, content type, request span.

use axum::{
    extract::Request,
    http::{
        header::{CONTENT_TYPE, SET_COOKIE},
        HeaderName, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::Cookie;
use tracing::Instrument;
use uuid::Uuid;

/// Response header carrying the request correlation id.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-tokengate-request-id");

/// HttpOnly cookie carrying the request correlation id.
pub const REQUEST_ID_COOKIE: &str = "tokengate-Request-Id";

/// HttpOnly cookie carrying the session token after login.
pub const TOKEN_COOKIE: &str = "tokengate-Token";

/// Render an `HttpOnly; Path=/` cookie as a `Set-Cookie` value.
pub fn http_only_cookie(name: &'static str, value: String) -> Option<HeaderValue> {
    let cookie = Cookie::build((name, value)).http_only(true).path("/").build();
    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// Middleware run before routing.
///
/// Generates a fresh request id, runs the rest of the stack inside a span
/// tagged with it, then stamps the id (header and cookie) and
/// `Content-Type: application/json` onto whatever response comes back.
pub async fn stamp_request(request: Request, next: Next) -> Response {
    // Correlation only; never consulted for authorization.
    let request_id = Uuid::new_v4();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span.clone()).await;

    let id = request_id.to_string();
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(value) = HeaderValue::from_str(&id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    if let Some(cookie) = http_only_cookie(REQUEST_ID_COOKIE, id) {
        headers.append(SET_COOKIE, cookie);
    }

    span.in_scope(|| tracing::info!(status = response.status().as_u16(), "Request completed"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { (StatusCode::IM_A_TEAPOT, "plain") }))
            .layer(middleware::from_fn(stamp_request))
    }

    async fn get_root(app: Router) -> Response {
        app.oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[test]
    fn cookie_is_http_only() {
        let value = http_only_cookie(TOKEN_COOKIE, "abc".to_string()).unwrap();
        let rendered = value.to_str().unwrap();
        assert!(rendered.starts_with("tokengate-Token=abc"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Path=/"));
    }

    #[tokio::test]
    async fn stamps_request_id_and_content_type() {
        let response = get_root(app()).await;
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

        let id = response.headers()[&REQUEST_ID_HEADER].to_str().unwrap().to_string();
        assert!(Uuid::parse_str(&id).is_ok());

        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with(&format!("{REQUEST_ID_COOKIE}={id}")));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn request_ids_are_unique_per_request() {
        let first = get_root(app()).await;
        let second = get_root(app()).await;
        assert_ne!(
            first.headers()[&REQUEST_ID_HEADER],
            second.headers()[&REQUEST_ID_HEADER]
        );
    }

    #[tokio::test]
    async fn ignores_client_supplied_request_id() {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/")
                    .header(&REQUEST_ID_HEADER, "client-chosen")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_ne!(response.headers()[&REQUEST_ID_HEADER], "client-chosen");
    }
}
