//! Wire schema for the consumed JSON-RPC results and the records kept by the
//! state store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block as returned by `eth_getBlockByNumber` with full transaction objects.
///
/// Quantities are kept as the node's hex strings; only the fields the engine
/// reads are decoded, everything else in the payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    pub number: String,
    pub hash: String,
    pub timestamp: String,
    #[serde(default)]
    pub transactions: Vec<RpcTransaction>,
}

/// A transaction object embedded in an [`RpcBlock`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    pub hash: String,
    pub from: String,
    /// `None` for contract creations.
    #[serde(default)]
    pub to: Option<String>,
    pub value: String,
    #[serde(default)]
    pub block_number: Option<String>,
}

/// A transaction whose sender or recipient is a subscribed address.
///
/// `value` is the node's representation, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedTransaction {
    pub hash: String,
    pub from: String,
    /// Empty for contract creations.
    pub to: String,
    pub value: String,
    pub block_number: u64,
    /// Seconds since the Unix epoch, taken from the enclosing block.
    pub timestamp: u64,
}

impl MatchedTransaction {
    /// Builds a record from a raw transaction and the decoded block fields.
    pub fn from_rpc(tx: &RpcTransaction, block_number: u64, timestamp: u64) -> Self {
        Self {
            hash: tx.hash.clone(),
            from: tx.from.clone(),
            to: tx.to.clone().unwrap_or_default(),
            value: tx.value.clone(),
            block_number,
            timestamp,
        }
    }
}

/// A case-folded account address used as the key for subscriptions and logs.
///
/// Nodes may return checksummed (mixed-case) addresses while clients usually
/// subscribe in lowercase, so every lookup goes through this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(String);

impl Address {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Address {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
