use crate::types::{Address, MatchedTransaction};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// A trait defining the state shared between the ingestion engine and query callers.
///
/// Addresses are accepted as raw strings and case-folded by the implementation, so
/// every operation agrees on a single normalization.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Adds `address` to the subscription set.
    /// Returns `false` if it was already subscribed or is blank.
    async fn subscribe(&self, address: &str) -> bool;

    /// Returns whether `address` is subscribed.
    async fn is_subscribed(&self, address: &str) -> bool;

    /// Appends `tx` to the log of its sender and of its recipient, for each of the
    /// two that is subscribed. A transaction between two subscribed addresses lands
    /// in both logs.
    async fn add_transaction(&self, tx: MatchedTransaction);

    /// Returns the matched transactions of `address` in insertion order.
    async fn get_transactions(&self, address: &str) -> Vec<MatchedTransaction>;

    /// Stores the highest fully processed block.
    async fn set_current_block(&self, block: u64);

    /// Retrieves the highest fully processed block. Returns 0 before the first write.
    async fn get_current_block(&self) -> u64;
}

#[derive(Debug, Default)]
struct StorageState {
    subscribers: HashSet<Address>,
    transactions: HashMap<Address, Vec<MatchedTransaction>>,
    current_block: u64,
}

/// An in-memory `Storage` guarded by a single readers-writer lock.
///
/// Subscriptions, logs and the cursor live in one structure so that there is exactly
/// one lock to reason about. Nothing is persisted across restarts.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: RwLock<StorageState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn subscribe(&self, address: &str) -> bool {
        let address = Address::new(address);
        if address.is_empty() {
            debug!("Ignoring subscription for a blank address");
            return false;
        }

        let mut state = self.state.write().await;
        if state.subscribers.contains(&address) {
            debug!(%address, "Address is already subscribed");
            return false;
        }
        state.subscribers.insert(address.clone());
        info!(%address, total = state.subscribers.len(), "Subscribed address");
        true
    }

    async fn is_subscribed(&self, address: &str) -> bool {
        let address = Address::new(address);
        if address.is_empty() {
            return false;
        }
        self.state.read().await.subscribers.contains(&address)
    }

    async fn add_transaction(&self, tx: MatchedTransaction) {
        let from = Address::new(&tx.from);
        let to = Address::new(&tx.to);

        let mut state = self.state.write().await;
        debug!(hash = %tx.hash, %from, %to, "Adding transaction");

        if !from.is_empty() && state.subscribers.contains(&from) {
            state
                .transactions
                .entry(from.clone())
                .or_default()
                .push(tx.clone());
            debug!(address = %from, "Added outgoing transaction");
        }

        if !to.is_empty() && state.subscribers.contains(&to) {
            state.transactions.entry(to.clone()).or_default().push(tx);
            debug!(address = %to, "Added incoming transaction");
        }
    }

    async fn get_transactions(&self, address: &str) -> Vec<MatchedTransaction> {
        let address = Address::new(address);
        let state = self.state.read().await;
        let txs = state.transactions.get(&address).cloned().unwrap_or_default();
        debug!(%address, count = txs.len(), "Fetched transactions");
        txs
    }

    async fn set_current_block(&self, block: u64) {
        let mut state = self.state.write().await;
        debug!(from = state.current_block, to = block, "Updating current block");
        state.current_block = block;
    }

    async fn get_current_block(&self) -> u64 {
        self.state.read().await.current_block
    }
}
