// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{process::ExitCode, sync::Arc};

use thiserror::Error;
use tokengate::{
    api::router,
    auth::{
        credentials::UserStoreError, AlwaysAccept, CredentialVerifier, KeyError, SigningKey,
        TokenAuthority, UserStore,
    },
    config::{Config, ConfigError},
    state::AppState,
    telemetry,
};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Users(#[from] UserStoreError),
    #[error("server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Gateway failed to run");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    // No key, no service: entropy failure is fatal here.
    let key = SigningKey::provision(config.signing_key_b64.as_deref())?;
    let authority = TokenAuthority::new(key);

    let verifier: Arc<dyn CredentialVerifier> = match &config.users_file {
        Some(path) => {
            let store = UserStore::load(path)?;
            tracing::info!(users = store.len(), path = %path.display(), "Loaded user store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("No user store configured, every login will be accepted");
            Arc::new(AlwaysAccept::default())
        }
    };

    let addr = config.bind_addr()?;
    let state = AppState::new(authority, verifier, config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running at http://{addr}/");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
