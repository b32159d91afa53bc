// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tokengate - Bearer Token Authentication Gateway
//!
//! Issues signed session tokens on login and verifies them on protected
//! routes. Tokens are stateless HS256 JWTs; the only shared state is the
//! signing key, fixed at startup.
//!
//! ## Modules
//!
//! - `api` - HTTP routes, body limits and request stamping (Axum)
//! - `auth` - Token authority, claims and credential verification
//! - `config` - Environment configuration
//! - `error` - `{data}` / `{error}` response envelope
//! - `telemetry` - Tracing subscriber setup

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod telemetry;
