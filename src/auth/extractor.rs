// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for bearer-authenticated requests.
//!
//! Use the `Auth` extractor in handlers to require a valid session token:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims.sub is the authenticated user
//! }
//! ```
//!
//! The token is read from `Authorization: Bearer <token>` only. The scheme
//! name is matched case-insensitively.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{Claims, TokenError};
use crate::{error::ApiError, state::AppState};

const BEARER_PREFIX: &str = "bearer ";

/// Pull the raw token out of the `Authorization` header.
///
/// Returns `Ok(None)` when the header is absent, and `Err(Malformed)` when it
/// is present but is not a bearer credential.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, TokenError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| TokenError::Malformed)?;
    let token = value
        .get(..BEARER_PREFIX.len())
        .filter(|scheme| scheme.eq_ignore_ascii_case(BEARER_PREFIX))
        .map(|_| &value[BEARER_PREFIX.len()..])
        .ok_or(TokenError::Malformed)?;
    Ok(Some(token.trim().to_string()))
}

/// Extractor for requests carrying a valid session token.
///
/// Every rejection is a plain `401 Unauthorized`; the reason is only logged.
pub struct Auth(pub Claims);

impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let method = parts.method.clone();
        let path = parts.uri.path().to_string();

        let token = match bearer_token(&parts.headers) {
            Ok(Some(found)) => found,
            Ok(None) => {
                tracing::warn!(%method, %path, bearer = false, "Rejected request without token");
                return Err(ApiError::unauthorized());
            }
            Err(e) => {
                tracing::warn!(
                    %method,
                    %path,
                    bearer = false,
                    reason = e.error_code(),
                    "Rejected request with non-bearer authorization"
                );
                return Err(ApiError::unauthorized());
            }
        };

        match state.authority.verify(&token) {
            Ok(claims) => Ok(Auth(claims)),
            Err(e) => {
                tracing::warn!(
                    %method,
                    %path,
                    bearer = true,
                    token_len = token.len(),
                    reason = e.error_code(),
                    "Rejected request with invalid token"
                );
                Err(ApiError::unauthorized())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stamp::TOKEN_COOKIE;
    use axum::http::{header::COOKIE, Request, StatusCode};
    use chrono::{Duration, Utc};

    fn parts_with(headers: &[(&str, String)]) -> Parts {
        let mut builder = Request::builder().uri("/api");
        for (name, value) in headers {
            builder = builder.header(*name, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn issue(state: &AppState, ttl: Duration) -> String {
        let claims = Claims::new("iss", "alice", vec!["api".to_string()], Utc::now(), ttl);
        state.authority.issue(&claims).unwrap()
    }

    #[test]
    fn bearer_token_reads_header() {
        let parts = parts_with(&[("Authorization", "Bearer abc.def.ghi".to_string())]);
        assert_eq!(bearer_token(&parts.headers).unwrap(), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn bearer_token_scheme_is_case_insensitive() {
        for scheme in ["bearer", "BEARER", "bEaReR"] {
            let parts = parts_with(&[("Authorization", format!("{scheme} abc.def.ghi"))]);
            assert_eq!(bearer_token(&parts.headers).unwrap(), Some("abc.def.ghi".to_string()));
        }
    }

    #[test]
    fn bearer_token_rejects_other_schemes() {
        let parts = parts_with(&[("Authorization", "Basic YWxpY2U6cHc=".to_string())]);
        assert_eq!(bearer_token(&parts.headers), Err(TokenError::Malformed));
    }

    #[test]
    fn bearer_token_rejects_short_header() {
        let parts = parts_with(&[("Authorization", "Bear".to_string())]);
        assert_eq!(bearer_token(&parts.headers), Err(TokenError::Malformed));
    }

    #[test]
    fn bearer_token_ignores_session_cookie() {
        let parts = parts_with(&[(COOKIE.as_str(), format!("other=1; {TOKEN_COOKIE}=abc.def.ghi"))]);
        assert_eq!(bearer_token(&parts.headers).unwrap(), None);
    }

    #[test]
    fn bearer_token_absent() {
        let parts = parts_with(&[]);
        assert_eq!(bearer_token(&parts.headers).unwrap(), None);
    }

    #[tokio::test]
    async fn auth_extractor_requires_token() {
        let state = AppState::default();
        let mut parts = parts_with(&[]);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.err().unwrap().status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn auth_extractor_accepts_issued_token() {
        let state = AppState::default();
        let token = issue(&state, Duration::minutes(5));
        let mut parts = parts_with(&[("Authorization", format!("Bearer {token}"))]);

        let Auth(claims) = Auth::from_request_parts(&mut parts, &state).await.ok().unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[tokio::test]
    async fn auth_extractor_accepts_lowercase_scheme() {
        let state = AppState::default();
        let token = issue(&state, Duration::minutes(5));
        let mut parts = parts_with(&[("Authorization", format!("bearer {token}"))]);

        let Auth(claims) = Auth::from_request_parts(&mut parts, &state).await.ok().unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[tokio::test]
    async fn auth_extractor_rejects_cookie_only_request() {
        let state = AppState::default();
        let token = issue(&state, Duration::minutes(5));
        let mut parts = parts_with(&[(COOKIE.as_str(), format!("{TOKEN_COOKIE}={token}"))]);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.err().unwrap().status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn auth_extractor_rejects_expired_token() {
        let state = AppState::default();
        let token = issue(&state, Duration::seconds(-10));
        let mut parts = parts_with(&[("Authorization", format!("Bearer {token}"))]);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.err().unwrap().status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn auth_extractor_rejects_token_from_other_key() {
        let token = issue(&AppState::default(), Duration::minutes(5));
        let state = AppState::default();
        let mut parts = parts_with(&[("Authorization", format!("Bearer {token}"))]);

        assert!(Auth::from_request_parts(&mut parts, &state).await.is_err());
    }
}
