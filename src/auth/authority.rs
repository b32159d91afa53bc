// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token authority: the sole holder of the signing secret.
//!
//! ## Token Format
//!
//! Tokens are compact HS256 JWTs: `base64url(header).base64url(claims).base64url(mac)`.
//! The MAC is HMAC-SHA-256 over the first two segments, so issuing the same
//! claims under the same key always yields the same token.
//!
//! ## Key Provisioning
//!
//! The key is chosen once at startup:
//!
//! 1. `SIGNING_KEY_B64` set and decodes to at least one byte: use it
//! 2. Otherwise: draw 256 bytes from the system CSPRNG
//!
//! A configured value that decodes to zero bytes is treated as absent. A
//! value that is not valid base64 is a startup error, never a silent
//! fallback.

use std::fmt;

use base64ct::{Base64, Encoding};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;

use super::{claims::Claims, error::TokenError};

/// Length of a generated signing key in bytes.
pub const GENERATED_KEY_LEN: usize = 256;

/// Errors provisioning the signing key.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("configured signing key is not valid base64")]
    InvalidEncoding,
    #[error("system random source failed to produce a signing key")]
    Entropy,
}

/// Symmetric signing secret.
///
/// Deliberately has no `Display`/`Serialize` and a redacting `Debug`.
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Decode a base64 secret. Returns `Ok(None)` when it decodes to nothing.
    pub fn from_base64(encoded: &str) -> Result<Option<Self>, KeyError> {
        let bytes = Base64::decode_vec(encoded.trim()).map_err(|_| KeyError::InvalidEncoding)?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self(bytes)))
    }

    /// Generate a fresh random key of [`GENERATED_KEY_LEN`] bytes.
    pub fn generate() -> Result<Self, KeyError> {
        let mut bytes = vec![0u8; GENERATED_KEY_LEN];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|_| KeyError::Entropy)?;
        Ok(Self(bytes))
    }

    /// Pick the process key: the configured secret if it is non-empty,
    /// a generated one otherwise.
    pub fn provision(configured: Option<&str>) -> Result<Self, KeyError> {
        if let Some(encoded) = configured {
            if let Some(key) = Self::from_base64(encoded)? {
                tracing::info!(key_len = key.len(), "Using configured signing key");
                return Ok(key);
            }
            tracing::warn!("Configured signing key is empty, generating a random key");
        }

        let key = Self::generate()?;
        tracing::info!(key_len = key.len(), "Generated random signing key");
        Ok(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey(<{} bytes redacted>)", self.0.len())
    }
}

/// Issues and verifies session tokens.
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenAuthority {
    pub fn new(key: SigningKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(&key.0),
            decoding_key: DecodingKey::from_secret(&key.0),
            validation,
        }
    }

    /// Sign `claims` into a bearer token.
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        if claims.sub.trim().is_empty() {
            return Err(TokenError::MissingSubject);
        }

        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check the signature and expiry of `token` and return its claims.
    ///
    /// The signature is compared in constant time and checked before the
    /// payload is deserialized or any claim is looked at.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Malformed);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}
