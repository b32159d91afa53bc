// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoint: credentials in, session token out.

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    response::{IntoResponse, Response},
};
use chrono::Utc;
use uuid::Uuid;

use super::{
    body::{read_bounded, BodyError},
    stamp::{http_only_cookie, TOKEN_COOKIE},
};
use crate::{
    auth::{Claims, Credential, TokenError},
    config::MAX_LOGIN_BODY_BYTES,
    error::{ApiError, Data},
    state::AppState,
};

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// `POST /api/login`
///
/// Reads a JSON [`Credential`], asks the configured verifier about it and, on
/// success, answers `{"data": null}` with the new token in both the
/// `Authorization` header and an HttpOnly cookie.
pub async fn login(State(state): State<AppState>, request: Request) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();
    let method = parts.method;
    let path = parts.uri.path().to_string();

    if !is_json(&parts.headers) {
        tracing::warn!(
            %method,
            %path,
            content_type = ?parts.headers.get(CONTENT_TYPE),
            "Rejected login with non-JSON content type"
        );
        return Err(ApiError::method_not_allowed());
    }

    let raw = read_bounded(body, MAX_LOGIN_BODY_BYTES, state.config.body_read_timeout)
        .await
        .map_err(|e| {
            tracing::warn!(%method, %path, error = %e, "Aborted login body");
            match e {
                BodyError::TooLarge { .. } => ApiError::payload_too_large(),
                BodyError::TimedOut(_) => ApiError::request_timeout(),
                BodyError::Read(_) => ApiError::bad_request(),
            }
        })?;

    let credential: Credential = serde_json::from_slice(&raw).map_err(|e| {
        tracing::warn!(
            %method,
            %path,
            body_len = raw.len(),
            error = %e,
            "Rejected malformed login body"
        );
        ApiError::bad_request()
    })?;
    let shape = credential.shape();

    let Some(identity) = state.verifier.verify(&credential).await else {
        tracing::warn!(
            %method,
            %path,
            user_name_len = shape.user_name_len,
            has_password = shape.has_password,
            "Rejected login with bad credentials"
        );
        return Err(ApiError::unauthorized());
    };

    if identity.roles.is_empty() {
        tracing::warn!(
            %method,
            %path,
            user_name_len = shape.user_name_len,
            "Rejected login for identity without roles"
        );
        return Err(ApiError::unauthorized());
    }

    let ttl = chrono::Duration::from_std(state.config.token_ttl).map_err(|_| ApiError::internal())?;
    let claims = Claims::new(
        state.config.issuer(),
        identity.name,
        identity.roles,
        Utc::now(),
        ttl,
    )
    .with_token_id(Uuid::new_v4().to_string());

    let token = state.authority.issue(&claims).map_err(|e| match e {
        TokenError::MissingSubject => {
            tracing::warn!(
                %method,
                %path,
                user_name_len = shape.user_name_len,
                has_password = shape.has_password,
                "Rejected login without a user name"
            );
            ApiError::unauthorized()
        }
        other => {
            tracing::error!(%method, %path, error = %other, "Failed to sign session token");
            ApiError::internal()
        }
    })?;

    let bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| ApiError::internal())?;
    let cookie = http_only_cookie(TOKEN_COOKIE, token).ok_or_else(ApiError::internal)?;

    tracing::info!(
        jti = claims.jti.as_deref().unwrap_or_default(),
        scopes = claims.scope.len(),
        exp = claims.exp,
        "Issued session token"
    );

    let mut response = Data::empty().into_response();
    response.headers_mut().insert(AUTHORIZATION, bearer);
    response.headers_mut().append(SET_COOKIE, cookie);
    Ok(response)
}
