use crate::{storage::Storage, types::MatchedTransaction};
use async_trait::async_trait;
use std::sync::Arc;

/// The operations external interfaces may call.
///
/// The HTTP layer depends on this trait only, never on the storage directly.
#[async_trait]
pub trait TransactionQuery: Send + Sync {
    /// Adds an address to the observed set. Returns `false` if it already was.
    async fn subscribe(&self, address: &str) -> bool;

    /// Lists inbound and outbound matched transactions of an address.
    async fn get_transactions(&self, address: &str) -> Vec<MatchedTransaction>;

    /// Returns the last fully processed block.
    async fn get_current_block(&self) -> u64;
}

/// Pass-through [`TransactionQuery`] backed by a shared [`Storage`].
#[derive(Clone)]
pub struct QueryFacade {
    storage: Arc<dyn Storage>,
}

impl QueryFacade {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl TransactionQuery for QueryFacade {
    async fn subscribe(&self, address: &str) -> bool {
        self.storage.subscribe(address).await
    }

    async fn get_transactions(&self, address: &str) -> Vec<MatchedTransaction> {
        self.storage.get_transactions(address).await
    }

    async fn get_current_block(&self) -> u64 {
        self.storage.get_current_block().await
    }
}
