// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    auth::{CredentialVerifier, TokenAuthority},
    config::Config,
};

/// Shared, read-only state. Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub authority: Arc<TokenAuthority>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        authority: TokenAuthority,
        verifier: Arc<dyn CredentialVerifier>,
        config: Config,
    ) -> Self {
        Self {
            authority: Arc::new(authority),
            verifier,
            config: Arc::new(config),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Arc::new(config);
        self
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.verifier = verifier;
        self
    }
}

#[cfg(test)]
impl Default for AppState {
    /// Random key, accept-all verifier, default config.
    fn default() -> Self {
        use crate::auth::{AlwaysAccept, SigningKey};

        let key = SigningKey::generate().expect("test signing key");
        Self::new(
            TokenAuthority::new(key),
            Arc::new(AlwaysAccept::default()),
            Config::default(),
        )
    }
}
