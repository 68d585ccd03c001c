use serde::{Deserialize, Serialize};

/// The top-level configuration for the `ethwatch-connector` library.
///
/// This struct aggregates the chain endpoint and the poll loop settings. It is
/// typically deserialized from the gateway's configuration file and handed to the
/// `IngestionEngine` upon initialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConnectorConfig {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub synchronizer: SynchronizerConfig,
}

/// Defines the connection settings for the chain node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ChainConfig {
    /// JSON-RPC HTTP endpoint of the node.
    pub rpc_url: String,
}

/// Defines behavior for the ingestion poll loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SynchronizerConfig {
    /// The interval in seconds between two head checks.
    pub poll_interval_secs: u64,
    /// The first block to scan. `None` starts from the node's head at startup.
    pub start_block: Option<u64>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://ethereum-rpc.publicnode.com".to_string(),
        }
    }
}

impl Default for SynchronizerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            start_block: None,
        }
    }
}
