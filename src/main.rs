use std::{process::ExitCode, sync::Arc};

use ledger_app::{LedgerSettings, build_application, domain::RepoError};
use ledger_identity::AnonymousIdentityProvider;
use ledger_store_sqlite::SqliteDocumentStore;
use log::{error, info};
use thiserror::Error;

use crate::config::AppConfig;

mod config;
mod logs;

#[derive(Debug, Error)]
enum StartupError {
    #[error("failed to open the document store: {0}")]
    Store(#[from] RepoError),
    #[error("failed to start the process session")]
    SignIn,
    #[error("HTTP server failed: {0}")]
    Http(#[from] std::io::Error),
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    let store = Arc::new(SqliteDocumentStore::connect(&config.database_url).await?);
    let identity = Arc::new(AnonymousIdentityProvider::new(
        &config.jwt_secret,
        config.session_ttl,
    ));
    let settings = LedgerSettings {
        stake_presets: config.stake_presets.clone(),
        max_photo_bytes: config.max_photo_bytes,
    };

    let (app, feed) = build_application(store.clone(), identity, settings);
    let app = Arc::new(app);

    // the feed only starts reading once a session exists
    let session = app
        .session_use_case
        .sign_in()
        .await
        .map_err(|_| StartupError::SignIn)?;
    info!("Process session {} started", session.session_id);

    info!("Starting application");
    let served = ledger_http_api::run(
        app,
        &config.http_host,
        config.http_port,
        shutdown_signal(),
    )
    .await;

    feed.shutdown().await;
    store.close().await;
    info!("Ledger stopped");

    served.map_err(StartupError::from)
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env file: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logs::init_logger(&config.log_file_path, &config.log_archive_pattern) {
        eprintln!("Failed to initialize logger: {}", e);
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
