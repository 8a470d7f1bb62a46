//! HTTP server initialization and runtime setup.
//!
//! Handles store loading, checker wiring, the Axum server lifecycle and the
//! final store flush on shutdown.

use crate::application::services::{LinksService, ReportService};
use crate::config::Config;
use crate::infrastructure::checker::{ConcurrentChecker, HttpProber};
use crate::infrastructure::persistence::FileBatchRepository;
use crate::infrastructure::report::TextReportGenerator;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Builds the application state from configuration.
///
/// # Errors
///
/// Returns an error if the batch store exists but cannot be loaded, or the
/// HTTP client cannot be built.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let repository = Arc::new(
        FileBatchRepository::open(&config.state_path)
            .await
            .with_context(|| format!("Failed to load batch store {}", config.state_path.display()))?,
    );

    let prober = Arc::new(HttpProber::new(config.probe_timeout())?);
    let checker = Arc::new(ConcurrentChecker::new(
        repository.clone(),
        prober,
        config.max_workers,
    ));
    let links_service = Arc::new(
        LinksService::new(repository.clone(), checker).with_batch_deadline(config.batch_deadline()),
    );

    let generator = Arc::new(TextReportGenerator::new(
        config.report_title.clone(),
        "%Y-%m-%dT%H:%M:%S%:z",
    ));
    let report_service = Arc::new(ReportService::new(repository.clone(), generator));

    Ok(AppState {
        links_service,
        report_service,
        repository,
        shutdown: CancellationToken::new(),
        checks: TaskTracker::new(),
    })
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Batch store (load-or-create)
/// - HTTP prober and concurrent checker
/// - Axum HTTP server with graceful shutdown
///
/// On SIGINT/SIGTERM, running checks are cancelled, in-flight requests are
/// drained and the store is flushed.
///
/// # Errors
///
/// Returns an error if:
/// - The store file is corrupt
/// - Server bind fails
/// - The final flush fails
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config).await?;
    let shutdown = state.shutdown.clone();

    let app = app_router(state.clone());

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown))
    .await?;

    finish(&state).await?;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Waits for every tracked batch check to save its final state, then
/// flushes the store.
///
/// Checks detached from their request (client gone during shutdown) may
/// still be saving when this is called.
///
/// # Errors
///
/// Returns an error if the flush fails.
pub async fn finish(state: &AppState) -> Result<()> {
    state.shutdown.cancel();
    state.checks.close();
    if !state.checks.is_empty() {
        tracing::info!(running = state.checks.len(), "Waiting for batch checks to finish");
    }
    state.checks.wait().await;

    state
        .repository
        .flush()
        .await
        .context("Failed to flush batch store on shutdown")?;

    Ok(())
}

/// Resolves on SIGINT or SIGTERM, after cancelling `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutting down server...");
    shutdown.cancel();
}
