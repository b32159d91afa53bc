// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Session token issuance and verification for the gateway.
//!
//! ## Auth Flow
//!
//! 1. Client posts `{"userName", "password"}` to `/api/login`
//! 2. The configured `CredentialVerifier` returns an identity and its roles
//! 3. `TokenAuthority` signs `{iss, sub, scope, jti, iat, exp}` into an HS256 JWT
//! 4. Client presents `Authorization: Bearer <token>` on protected routes
//! 5. `TokenAuthority` checks the MAC (constant time) and expiry before any
//!    claim is trusted
//!
//! ## Security
//!
//! - Exactly one signing key per process, immutable after startup
//! - The key is never logged or serialized
//! - Verification failures are indistinguishable to the client (always 401)
//! - Tokens are stateless; nothing is stored server-side

pub mod authority;
pub mod claims;
pub mod credentials;
pub mod error;
pub mod extractor;

pub use authority::{KeyError, SigningKey, TokenAuthority};
pub use claims::Claims;
pub use credentials::{AlwaysAccept, Credential, CredentialVerifier, Identity, UserStore};
pub use error::TokenError;
pub use extractor::Auth;
