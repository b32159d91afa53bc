// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Response envelope.
//!
//! Every body this service writes has one of exactly two shapes:
//!
//! - success: `{"data": <value|null>}`
//! - failure: `{"error": {"code": <status>, "message": <reason>}}`

use axum::{
    http::{header::CONNECTION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Ask the server to drop the connection after this response.
    pub close_connection: bool,
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: u16,
    message: String,
}

impl ApiError {
    /// Error with the status code's canonical reason phrase as its message.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: status.canonical_reason().unwrap_or("Error").to_string(),
            close_connection: false,
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED)
    }

    pub fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST)
    }

    pub fn payload_too_large() -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE).closing()
    }

    pub fn request_timeout() -> Self {
        Self::new(StatusCode::REQUEST_TIMEOUT).closing()
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn closing(mut self) -> Self {
        self.close_connection = true;
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: ErrorDetail {
                code: self.status.as_u16(),
                message: self.message,
            },
        });
        let mut response = (self.status, body).into_response();
        if self.close_connection {
            response
                .headers_mut()
                .insert(CONNECTION, HeaderValue::from_static("close"));
        }
        response
    }
}

/// Success envelope, `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct Data<T: Serialize> {
    pub data: Option<T>,
}

impl Data<()> {
    /// `{"data": null}`
    pub fn empty() -> Self {
        Self { data: None }
    }
}

impl<T: Serialize> IntoResponse for Data<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(response: Response) -> String {
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body_bytes.to_vec()).unwrap()
    }

    #[test]
    fn constructors_use_reason_phrases() {
        assert_eq!(ApiError::unauthorized().message, "Unauthorized");
        assert_eq!(ApiError::not_found().message, "Not Found");
        assert_eq!(ApiError::method_not_allowed().message, "Method Not Allowed");
        assert_eq!(ApiError::payload_too_large().message, "Payload Too Large");
        assert_eq!(ApiError::request_timeout().message, "Request Timeout");
    }

    #[tokio::test]
    async fn error_renders_envelope() {
        let response = ApiError::unauthorized().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(CONNECTION).is_none());
        assert_eq!(
            body_of(response).await,
            r#"{"error":{"code":401,"message":"Unauthorized"}}"#
        );
    }

    #[tokio::test]
    async fn oversized_payload_closes_connection() {
        let response = ApiError::payload_too_large().into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.headers()[CONNECTION], "close");
    }

    #[tokio::test]
    async fn empty_data_renders_null() {
        let response = Data::empty().into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, r#"{"data":null}"#);
    }
}
