//! # Ingestion Engine & Background Workers
//!
//! This module defines the `IngestionEngine`, which owns the background poll loop that
//! keeps the state store in step with the chain.
//!
//! ## Core Components
//!
//! - [`IngestionEngine`]: Owns the `CatchupWorker`. It seeds the cursor with
//!   [`IngestionEngine::initialize`] and is consumed by [`IngestionEngine::run`].
//! - [`IngestionHandle`]: A clonable handle used to stop the running loop.
//! - **Workers**:
//!   - `CatchupWorker`: On every tick compares the chain head with the cursor and
//!     filters each unprocessed block against the current subscriptions.
//!

mod catchup;

pub use catchup::CatchupReport;

use crate::{
    client::{ChainClient, ClientError},
    config::ConnectorConfig,
    storage::Storage,
    workers::catchup::CatchupWorker,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// A shared context containing all dependencies required by the workers.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub config: Arc<ConnectorConfig>,
    pub client: Arc<dyn ChainClient>,
    pub storage: Arc<dyn Storage>,
}

/// A clonable handle for stopping the [`IngestionEngine`]'s poll loop.
///
/// Dropping every handle has the same effect as calling [`IngestionHandle::stop`].
#[derive(Debug, Clone)]
pub struct IngestionHandle {
    stop_tx: Arc<watch::Sender<bool>>,
}

impl IngestionHandle {
    /// Signals the poll loop to exit. The loop observes the signal before the next
    /// block of a running catch-up pass, or immediately if it is waiting between ticks.
    /// The block being processed when the signal arrives is finished first.
    pub fn stop(&self) {
        if self.stop_tx.send(true).is_err() {
            debug!("Stop requested but the ingestion loop is not running");
        }
    }

    /// Returns whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }
}

/// The background ingestion service.
///
/// It is created once, optionally seeded with [`initialize`](Self::initialize), and its
/// [`run`](Self::run) method is spawned as a long-running task. The returned
/// [`IngestionHandle`] is then the only way to interact with it.
pub struct IngestionEngine {
    ctx: WorkerContext,
    worker: CatchupWorker,
}

impl IngestionEngine {
    /// Creates a new `IngestionEngine` and its associated [`IngestionHandle`].
    ///
    /// # Arguments
    ///
    /// * `config` - The shared connector configuration.
    /// * `client` - The chain node client.
    /// * `storage` - The state store shared with query callers.
    pub fn new(
        config: Arc<ConnectorConfig>,
        client: Arc<dyn ChainClient>,
        storage: Arc<dyn Storage>,
    ) -> (Self, IngestionHandle) {
        let (stop_tx, stop_rx) = watch::channel(false);
        let ctx = WorkerContext {
            config,
            client,
            storage,
        };
        let worker = CatchupWorker::new(ctx.clone(), stop_rx);

        let engine = Self { ctx, worker };
        let handle = IngestionHandle {
            stop_tx: Arc::new(stop_tx),
        };

        (engine, handle)
    }

    /// Seeds the cursor before the first tick.
    ///
    /// With a configured `start-block` the cursor is set just below it. Otherwise the
    /// node's current head becomes the cursor, so only blocks produced from now on are
    /// scanned. Returns the seeded cursor.
    pub async fn initialize(&self) -> Result<u64, ClientError> {
        let cursor = match self.ctx.config.synchronizer.start_block {
            Some(start) => start.saturating_sub(1),
            None => self.ctx.client.block_number().await?,
        };

        self.ctx.storage.set_current_block(cursor).await;
        info!(cursor, "Ingestion cursor seeded");
        Ok(cursor)
    }

    /// Runs a single head check and catch-up pass without waiting for the interval.
    pub async fn tick(&mut self) -> CatchupReport {
        self.worker.tick().await
    }

    /// Runs the poll loop until the [`IngestionHandle`] requests a stop.
    pub async fn run(self) {
        info!(
            interval_secs = self.ctx.config.synchronizer.poll_interval_secs,
            "Ingestion engine is running."
        );
        self.worker.run().await;
        info!("Ingestion engine has shut down.");
    }
}
