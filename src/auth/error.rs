// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token authority errors.

use thiserror::Error;

/// Failure issuing or verifying a session token.
///
/// The variants are only ever seen inside the process. At the HTTP boundary
/// every one of them collapses to a generic `401 Unauthorized`, so callers
/// can never tell a forged token from an expired one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Claims have an empty subject and cannot be signed
    #[error("claims are missing a subject")]
    MissingSubject,
    /// The signer itself failed (serialization or key problem)
    #[error("failed to sign token: {0}")]
    Signing(String),
    /// Token could not be split or decoded into header, payload and signature
    #[error("token is malformed")]
    Malformed,
    /// Signature does not match the payload under the current key
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Signature is valid but `exp` has passed
    #[error("token has expired")]
    Expired,
}

impl TokenError {
    /// Short machine-readable code used in log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::MissingSubject => "missing_subject",
            TokenError::Signing(_) => "signing_failed",
            TokenError::Malformed => "malformed_token",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Expired => "token_expired",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}
