// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential verification.
//!
//! The gateway never decides on its own whether a user name and password are
//! good. It hands the [`Credential`] to a [`CredentialVerifier`] and gets back
//! either an [`Identity`] or `None`.
//!
//! Two verifiers ship with the crate:
//!
//! - [`AlwaysAccept`] - every credential authenticates with a fixed role set
//!   (demo and test deployments)
//! - [`UserStore`] - users loaded from a JSON file with Argon2id password hashes

use std::{collections::HashMap, fmt, path::Path};

use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Role granted by [`AlwaysAccept`] when none is configured.
pub const DEFAULT_ROLE: &str = "api";

/// Login request body.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub user_name: String,
    #[serde(default)]
    pub password: Option<String>,
}

impl Credential {
    /// Log-safe description of what was presented.
    pub fn shape(&self) -> CredentialShape {
        CredentialShape {
            user_name_len: self.user_name.chars().count(),
            has_password: self.password.as_deref().is_some_and(|p| !p.is_empty()),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("user_name", &self.user_name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// What a credential looked like, without its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialShape {
    pub user_name_len: usize,
    pub has_password: bool,
}

/// A verified principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub roles: Vec<String>,
}

/// Authenticates raw credentials.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns the identity for a good credential, `None` otherwise.
    async fn verify(&self, credential: &Credential) -> Option<Identity>;
}

/// Accepts every credential.
#[derive(Debug, Clone)]
pub struct AlwaysAccept {
    roles: Vec<String>,
}

impl AlwaysAccept {
    pub fn new(roles: Vec<String>) -> Self {
        Self { roles }
    }
}

impl Default for AlwaysAccept {
    fn default() -> Self {
        Self::new(vec![DEFAULT_ROLE.to_string()])
    }
}

#[async_trait]
impl CredentialVerifier for AlwaysAccept {
    async fn verify(&self, credential: &Credential) -> Option<Identity> {
        Some(Identity {
            name: credential.user_name.clone(),
            roles: self.roles.clone(),
        })
    }
}

/// Errors loading a user store.
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("failed to read user store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse user store: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("user {0:?} has no roles")]
    NoRoles(String),
    #[error("user {0:?} has an invalid password hash")]
    InvalidHash(String),
    #[error("user {0:?} is listed more than once")]
    Duplicate(String),
}

#[derive(Deserialize)]
struct UserStoreFile {
    users: Vec<UserRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    user_name: String,
    password_hash: String,
    roles: Vec<String>,
}

struct StoredUser {
    password_hash: String,
    roles: Vec<String>,
}

/// File-backed user store with Argon2id password hashes.
///
/// File format:
///
/// ```json
/// { "users": [ { "userName": "alice", "passwordHash": "$argon2id$...", "roles": ["api"] } ] }
/// ```
pub struct UserStore {
    users: HashMap<String, StoredUser>,
}

impl UserStore {
    pub fn from_json(raw: &str) -> Result<Self, UserStoreError> {
        let file: UserStoreFile = serde_json::from_str(raw)?;
        let mut users = HashMap::with_capacity(file.users.len());

        for record in file.users {
            if record.roles.is_empty() {
                return Err(UserStoreError::NoRoles(record.user_name));
            }
            if PasswordHash::new(&record.password_hash).is_err() {
                return Err(UserStoreError::InvalidHash(record.user_name));
            }
            if users.contains_key(&record.user_name) {
                return Err(UserStoreError::Duplicate(record.user_name));
            }
            users.insert(
                record.user_name,
                StoredUser {
                    password_hash: record.password_hash,
                    roles: record.roles,
                },
            );
        }

        Ok(Self { users })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, UserStoreError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialVerifier for UserStore {
    async fn verify(&self, credential: &Credential) -> Option<Identity> {
        let user = self.users.get(&credential.user_name)?;
        let password = credential.password.as_deref()?;

        // Hashes were validated at load time.
        let parsed = PasswordHash::new(&user.password_hash).ok()?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .ok()?;

        Some(Identity {
            name: credential.user_name.clone(),
            roles: user.roles.clone(),
        })
    }
}
