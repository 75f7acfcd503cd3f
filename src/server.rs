// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Server Bootstrap
//!
//! Wires configuration, storage, token signing and the media client into an
//! [`AppState`], then serves the router over HTTP, or HTTPS when TLS paths
//! are configured, until the shutdown token is cancelled.

use std::{net::SocketAddr, time::Duration};

use axum_server::tls_rustls::RustlsConfig;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    api::router,
    auth::TokenService,
    config::{Config, TlsPaths},
    providers::{CloudinaryClient, MediaError},
    state::AppState,
    storage::{Database, StorageError, DATABASE_FILE},
};

/// How long in-flight HTTPS connections get to finish after shutdown starts.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("media client error: {0}")]
    Media(#[from] MediaError),

    #[error("invalid bind address {0:?}")]
    Address(String),

    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the shared application state from configuration.
pub fn build_state(config: &Config) -> Result<AppState, ServerError> {
    let db = Database::open(&config.data_dir.join(DATABASE_FILE))?;
    let tokens = TokenService::new(&config.jwt_secret, config.token_ttl);
    let state = AppState::new(db, tokens);

    match &config.media {
        Some(media) => {
            info!(cloud_name = %media.cloud_name, folder = %media.folder, "Media host configured");
            Ok(state.with_media(CloudinaryClient::new(media.clone())?))
        }
        None => {
            warn!("Media host credentials missing; image upload is disabled");
            Ok(state)
        }
    }
}

/// Serve the API until `shutdown` is cancelled, then drain and close storage.
pub async fn serve(config: Config, shutdown: CancellationToken) -> Result<(), ServerError> {
    let bind = config.bind_address();
    let addr: SocketAddr = bind.parse().map_err(|_| ServerError::Address(bind.clone()))?;

    let state = build_state(&config)?;
    let db = state.db.clone();
    let app = router(state, &config.cors_origins);

    match &config.tls {
        Some(tls) => serve_https(addr, tls, app, shutdown).await?,
        None => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!(addr = %listener.local_addr()?, "Relief Hub server listening on http (docs at /docs)");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await?;
        }
    }

    drop(db);
    info!("Server stopped; document database closed");
    Ok(())
}

async fn serve_https(
    addr: SocketAddr,
    tls: &TlsPaths,
    app: axum::Router,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    // Another component may have installed a provider already; either is fine
    let _ = rustls::crypto::ring::default_provider().install_default();

    let tls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await
        .map_err(|e| ServerError::Tls(format!("{}: {e}", tls.cert_path.display())))?;

    let handle = axum_server::Handle::new();
    let drain = handle.clone();
    tokio::spawn(async move {
        shutdown.cancelled().await;
        drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
    });

    info!(addr = %addr, "Relief Hub server listening on https (docs at /docs)");
    axum_server::bind_rustls(addr, tls_config)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_for(dir: &std::path::Path, extra: &[(&str, &str)]) -> Config {
        let mut vars: HashMap<String, String> = HashMap::from([
            ("HOST".to_string(), "127.0.0.1".to_string()),
            ("PORT".to_string(), "0".to_string()),
            ("DATA_DIR".to_string(), dir.display().to_string()),
            ("JWT_SECRET".to_string(), "test-secret".to_string()),
        ]);
        for (k, v) in extra {
            vars.insert(k.to_string(), v.to_string());
        }
        Config::from_lookup(|name| vars.get(name).cloned()).unwrap()
    }

    #[test]
    fn build_state_opens_database_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let state = build_state(&config_for(dir.path(), &[])).unwrap();

        assert!(state.media.is_none());
        assert!(dir.path().join(DATABASE_FILE).exists());
        state.db.health_check().unwrap();
    }

    #[test]
    fn build_state_enables_media_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(
            dir.path(),
            &[("CLOUD_NAME", "demo"), ("API_KEY", "k"), ("API_SECRET", "s")],
        );
        let state = build_state(&config).unwrap();
        assert!(state.media.is_some());
    }

    #[tokio::test]
    async fn serve_stops_when_token_is_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), &[]);
        let shutdown = CancellationToken::new();

        let server = tokio::spawn(serve(config, shutdown.clone()));
        shutdown.cancel();

        let result = tokio::time::timeout(Duration::from_secs(10), server)
            .await
            .expect("server exits after cancellation")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn missing_tls_files_fail_startup() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(
            dir.path(),
            &[
                ("TLS_CERT_PATH", "/nonexistent/cert.pem"),
                ("TLS_KEY_PATH", "/nonexistent/key.pem"),
            ],
        );

        let result = serve(config, CancellationToken::new()).await;
        assert!(matches!(result, Err(ServerError::Tls(_))));
    }
}
