// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token claims.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried inside a session token.
///
/// Serialized with the registered JWT claim names so any standard JWT
/// tooling can read an issued token. Field order is fixed, which keeps the
/// signed payload byte-identical for identical claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer, the base URL of this gateway
    pub iss: String,

    /// Subject, the authenticated user name
    pub sub: String,

    /// Granted scopes (the principal's roles), order preserved
    #[serde(default)]
    pub scope: Vec<String>,

    /// Unique token ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expiration (Unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Build claims valid from `now` for `ttl`.
    pub fn new(
        issuer: impl Into<String>,
        subject: impl Into<String>,
        scope: Vec<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            iss: issuer.into(),
            sub: subject.into(),
            scope,
            jti: None,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Attach a unique token ID.
    pub fn with_token_id(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn new_sets_validity_window() {
        let claims = Claims::new(
            "http://127.0.0.1:3000/",
            "alice",
            vec!["api".to_string()],
            fixed_now(),
            Duration::hours(1),
        );
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_003_600);
        assert!(claims.jti.is_none());
    }

    #[test]
    fn serializes_with_registered_names() {
        let claims = Claims::new("iss", "bob", vec!["api".into()], fixed_now(), Duration::seconds(60))
            .with_token_id("tok-1");
        let json = serde_json::to_string(&claims).unwrap();
        assert_eq!(
            json,
            r#"{"iss":"iss","sub":"bob","scope":["api"],"jti":"tok-1","iat":1700000000,"exp":1700000060}"#
        );
    }
}
