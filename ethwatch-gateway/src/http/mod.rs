//! # HTTP Query Interface
//!
//! This module exposes the query facade over a small JSON API and wires the gateway's
//! background services together.
//!
//! | Method | Path                        | Response                          |
//! |--------|-----------------------------|-----------------------------------|
//! | POST   | `/subscribe`                | `{success, message}`              |
//! | GET    | `/transactions?address=X`   | `{address, transactions}`         |
//! | GET    | `/current-block`            | `{currentBlock}`                  |
//!
//! Any other method on these paths is answered with 405. Client errors carry a
//! `{"error": "..."}` body.

pub mod routes;

use crate::config::GatewayConfig;
use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use ethwatch_connector::{
    client::{ChainClient, HttpChainClient},
    facade::{QueryFacade, TransactionQuery},
    storage::{MemoryStorage, Storage},
    workers::{IngestionEngine, IngestionHandle},
};
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

/// A container for the application's shared, thread-safe state.
///
/// It is cloned for every request; handlers only ever see the query facade.
#[derive(Clone)]
pub struct AppState {
    pub query: Arc<dyn TransactionQuery>,
}

/// Builds the API router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/subscribe",
            post(routes::subscribe).fallback(routes::method_not_allowed),
        )
        .route(
            "/transactions",
            get(routes::transactions).fallback(routes::method_not_allowed),
        )
        .route(
            "/current-block",
            get(routes::current_block).fallback(routes::method_not_allowed),
        )
        .with_state(state)
}

/// Owns the running services started by [`start`].
pub struct GatewayHandle {
    local_addr: SocketAddr,
    ingestion: IngestionHandle,
    shutdown_tx: oneshot::Sender<()>,
    server_task: JoinHandle<()>,
    engine_task: JoinHandle<()>,
}

impl GatewayHandle {
    /// The address the HTTP server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops the poll loop and the HTTP server and waits for both to finish.
    pub async fn stop(self) {
        self.ingestion.stop();
        let _ = self.shutdown_tx.send(());

        if let Err(e) = self.engine_task.await {
            tracing::error!(error = %e, "Ingestion task ended abnormally");
        }
        if let Err(e) = self.server_task.await {
            tracing::error!(error = %e, "HTTP server task ended abnormally");
        }
    }
}

/// The main entry point to initialize and start the HTTP server and the block poller.
pub async fn start(config: &GatewayConfig) -> Result<GatewayHandle> {
    // --- 1. Initialize dependencies ---
    let client: Arc<dyn ChainClient> =
        Arc::new(HttpChainClient::new(config.connector.chain.rpc_url.clone()));
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let addr = format!("{}:{}", config.gateway.http.host, config.gateway.http.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {}", addr))?;
    let local_addr = listener.local_addr()?;

    // --- 2. Seed the cursor and spawn the ingestion engine ---
    let (engine, ingestion) =
        IngestionEngine::new(Arc::new(config.connector.clone()), client, storage.clone());
    engine
        .initialize()
        .await
        .context("Failed to seed the block cursor from the chain node")?;
    let engine_task = tokio::spawn(engine.run());

    // --- 3. Serve the API ---
    let state = AppState {
        query: Arc::new(QueryFacade::new(storage)),
    };
    let app = router(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tracing::info!("HTTP API listening on {}", local_addr);

    let server_task = tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        if let Err(e) = server.await {
            tracing::error!("HTTP server failed: {}", e);
        }
    });

    Ok(GatewayHandle {
        local_addr,
        ingestion,
        shutdown_tx,
        server_task,
        engine_task,
    })
}
