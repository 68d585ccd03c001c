use crate::{
    client::ClientError,
    quantity::parse_quantity,
    types::{MatchedTransaction, RpcTransaction},
    workers::WorkerContext,
};
use std::collections::BTreeSet;
use tokio::sync::watch;
use tokio::time::{sleep, Duration};

/// Outcome of one head check and catch-up pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatchupReport {
    /// The head reported by the node, `None` if the head check failed.
    pub head: Option<u64>,
    /// Blocks fetched and filtered during this pass, in order.
    pub processed: Vec<u64>,
    /// Blocks whose fetch or decode failed during this pass.
    pub failed: Vec<u64>,
    /// The cursor after the pass.
    pub cursor: u64,
    /// Blocks above the cursor already filtered behind a failed block.
    pub held_ahead: usize,
    /// The pass ended early because a stop was requested.
    pub stopped: bool,
}

pub struct CatchupWorker {
    ctx: WorkerContext,
    /// Blocks above the cursor that were already filtered in an earlier pass but sit
    /// behind a failed block. The cursor walks through them once the gap is filled.
    ///
    /// While a block keeps failing this grows by one entry per block the chain
    /// produces, and every tick walks the whole held range again. Its size is
    /// reported in [`CatchupReport::held_ahead`] and logged at warn level.
    applied_ahead: BTreeSet<u64>,
    stop_rx: watch::Receiver<bool>,
}

impl CatchupWorker {
    pub fn new(ctx: WorkerContext, stop_rx: watch::Receiver<bool>) -> Self {
        Self {
            ctx,
            applied_ahead: BTreeSet::new(),
            stop_rx,
        }
    }

    /// True once a stop was sent or every handle is gone.
    fn stop_requested(&self) -> bool {
        *self.stop_rx.borrow() || self.stop_rx.has_changed().is_err()
    }

    /// Runs the main poll loop.
    /// Each iteration waits one interval, then checks the head and catches up.
    /// A stop is observed between ticks and between two blocks of a pass.
    pub async fn run(mut self) {
        let interval = Duration::from_secs(self.ctx.config.synchronizer.poll_interval_secs);
        let mut stop_rx = self.stop_rx.clone();

        loop {
            if *stop_rx.borrow() {
                tracing::info!("CatchupWorker: shutdown signal received, exiting.");
                return;
            }

            tokio::select! {
                _ = sleep(interval) => {
                    self.tick().await;
                },
                changed = stop_rx.changed() => {
                    if changed.is_err() {
                        tracing::info!("CatchupWorker: all handles dropped, exiting.");
                        return;
                    }
                }
            }
        }
    }

    pub async fn tick(&mut self) -> CatchupReport {
        let cursor = self.ctx.storage.get_current_block().await;
        let mut report = CatchupReport {
            cursor,
            ..Default::default()
        };

        let head = match self.ctx.client.block_number().await {
            Ok(head) => head,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to get latest block, skipping tick");
                return report;
            }
        };
        report.head = Some(head);

        // Anything at or below the cursor is settled.
        self.applied_ahead = self.applied_ahead.split_off(&(cursor.saturating_add(1)));

        if head <= cursor {
            tracing::debug!(head, cursor, "No new blocks to process");
            return report;
        }

        tracing::info!(from = cursor + 1, to = head, "Processing blocks");

        let mut advancing = true;
        for number in cursor + 1..=head {
            if self.stop_requested() {
                tracing::info!(
                    cursor = report.cursor,
                    next = number,
                    "Stop requested, leaving catch-up pass"
                );
                report.stopped = true;
                break;
            }

            if self.applied_ahead.contains(&number) {
                if advancing {
                    self.applied_ahead.remove(&number);
                    self.ctx.storage.set_current_block(number).await;
                    report.cursor = number;
                }
                continue;
            }

            match self.process_block(number).await {
                Ok(found) => {
                    tracing::debug!(block = number, found, "Block processed");
                    report.processed.push(number);
                    if advancing {
                        self.ctx.storage.set_current_block(number).await;
                        report.cursor = number;
                    } else {
                        self.applied_ahead.insert(number);
                    }
                }
                Err(e) => {
                    tracing::warn!(block = number, error = %e, "Failed to process block");
                    report.failed.push(number);
                    advancing = false;
                }
            }
        }

        report.held_ahead = self.applied_ahead.len();
        if !report.failed.is_empty() {
            tracing::warn!(
                cursor = report.cursor,
                failed = report.failed.len(),
                held_ahead = report.held_ahead,
                "Cursor held behind failed blocks; they will be retried next tick"
            );
        }

        report
    }

    /// Fetches one block and appends its relevant transactions to the store.
    /// Returns the number of matched transactions.
    async fn process_block(&self, number: u64) -> Result<usize, ClientError> {
        let block = self.ctx.client.block_by_number(number).await?;
        let timestamp = parse_quantity(&block.timestamp)?;

        tracing::debug!(
            block = number,
            transactions = block.transactions.len(),
            "Filtering block"
        );

        let mut found = 0;
        for tx in &block.transactions {
            if !self.is_relevant(tx).await {
                continue;
            }
            tracing::info!(block = number, hash = %tx.hash, "Found relevant transaction");
            self.ctx
                .storage
                .add_transaction(MatchedTransaction::from_rpc(tx, number, timestamp))
                .await;
            found += 1;
        }

        Ok(found)
    }

    async fn is_relevant(&self, tx: &RpcTransaction) -> bool {
        if self.ctx.storage.is_subscribed(&tx.from).await {
            return true;
        }
        match tx.to.as_deref() {
            Some(to) => self.ctx.storage.is_subscribed(to).await,
            None => false,
        }
    }
}
