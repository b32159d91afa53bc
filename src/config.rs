// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `127.0.0.1` |
//! | `PORT` | Server bind port | `3000` |
//! | `SIGNING_KEY_B64` | Base64 HMAC signing secret | Random 256-byte key |
//! | `TOKEN_TTL_SECS` | Lifetime of issued tokens | `3600` |
//! | `BODY_READ_TIMEOUT_SECS` | Max time to receive a login body | `30` |
//! | `USERS_FILE` | JSON user store; when unset every login is accepted | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{fmt, net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Base64-encoded signing secret.
///
/// An empty value, or one that decodes to zero bytes, counts as unset and a
/// random key is generated instead. Tokens issued under a generated key do
/// not survive a restart.
pub const SIGNING_KEY_ENV: &str = "SIGNING_KEY_B64";

pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECS";
pub const BODY_READ_TIMEOUT_ENV: &str = "BODY_READ_TIMEOUT_SECS";
pub const USERS_FILE_ENV: &str = "USERS_FILE";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
pub const DEFAULT_BODY_READ_TIMEOUT_SECS: u64 = 30;

/// Largest login body accepted, in bytes.
pub const MAX_LOGIN_BODY_BYTES: usize = 1_000_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("HOST:PORT is not a valid socket address: {0}")]
    InvalidAddress(String),
}

/// Process configuration.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub signing_key_b64: Option<String>,
    pub token_ttl: Duration,
    pub body_read_timeout: Duration,
    pub users_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match get(PORT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|p| *p > 0)
                .ok_or(ConfigError::InvalidNumber {
                    var: PORT_ENV,
                    value: raw,
                })?,
            None => DEFAULT_PORT,
        };

        let config = Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            signing_key_b64: get(SIGNING_KEY_ENV),
            token_ttl: Duration::from_secs(parse_secs(
                get(TOKEN_TTL_ENV),
                TOKEN_TTL_ENV,
                DEFAULT_TOKEN_TTL_SECS,
            )?),
            body_read_timeout: Duration::from_secs(parse_secs(
                get(BODY_READ_TIMEOUT_ENV),
                BODY_READ_TIMEOUT_ENV,
                DEFAULT_BODY_READ_TIMEOUT_SECS,
            )?),
            users_file: get(USERS_FILE_ENV).map(PathBuf::from),
        };
        config.bind_addr()?;
        Ok(config)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }

    /// Issuer claim placed in every token: `http://<host>:<port>/`.
    pub fn issuer(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            signing_key_b64: None,
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            body_read_timeout: Duration::from_secs(DEFAULT_BODY_READ_TIMEOUT_SECS),
            users_file: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("signing_key_b64", &self.signing_key_b64.as_ref().map(|_| "<redacted>"))
            .field("token_ttl", &self.token_ttl)
            .field("body_read_timeout", &self.body_read_timeout)
            .field("users_file", &self.users_file)
            .finish()
    }
}

fn parse_secs(raw: Option<String>, var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidNumber { var, value }),
    }
}
