//! # Chain Client
//!
//! This module provides the [`ChainClient`] trait, the only way the ingestion engine
//! talks to the chain node, and [`HttpChainClient`], its JSON-RPC 2.0 over HTTP
//! implementation.
//!
//! ## Contract
//!
//! - **Single primitive**: implementors only provide [`ChainClient::call`]. The typed
//!   helpers [`ChainClient::block_number`] and [`ChainClient::block_by_number`] decode
//!   the two consumed result shapes on top of it, so test doubles stay small.
//! - **Uniform failures**: transport errors, non-2xx statuses, malformed bodies, RPC
//!   error objects and schema mismatches all surface as a [`ClientError`].
//! - **No policy**: no retries and no timeout beyond the transport default. The caller
//!   decides what a failure means.

use crate::{
    quantity::{format_quantity, parse_quantity, QuantityError},
    types::RpcBlock,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Errors surfaced by a [`ChainClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status: {0}")]
    Status(StatusCode),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("no result returned for {0}")]
    MissingResult(String),

    #[error("invalid quantity: {0}")]
    Quantity(#[from] QuantityError),
}

/// A trait abstracting over the chain node's JSON-RPC interface.
///
/// This allows the ingestion engine to run against a live node or an in-process
/// fake in tests.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Invokes `method` with `params` and returns the raw `result` member.
    async fn call(&self, method: &str, params: Value) -> Result<Value, ClientError>;

    /// Fetches the node's latest block height via `eth_blockNumber`.
    async fn block_number(&self) -> Result<u64, ClientError> {
        let result = self.call("eth_blockNumber", json!([])).await?;
        let raw: String = serde_json::from_value(result)?;
        Ok(parse_quantity(&raw)?)
    }

    /// Fetches a block with full transaction objects via `eth_getBlockByNumber`.
    async fn block_by_number(&self, number: u64) -> Result<RpcBlock, ClientError> {
        let result = self
            .call(
                "eth_getBlockByNumber",
                json!([format_quantity(number), true]),
            )
            .await?;
        if result.is_null() {
            return Err(ClientError::MissingResult(format!("block {number}")));
        }
        Ok(serde_json::from_value(result)?)
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC 2.0 client that posts requests to a single HTTP endpoint.
#[derive(Debug)]
pub struct HttpChainClient {
    /// The underlying HTTP client.
    http_client: Client,
    /// The node's JSON-RPC endpoint.
    endpoint: String,
    next_id: AtomicU64,
}

impl HttpChainClient {
    /// Creates a client for `endpoint` using reqwest's default transport settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    /// Creates a client that reuses an existing `reqwest::Client`.
    pub fn with_client(http_client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChainClient for HttpChainClient {
    async fn call(&self, method: &str, params: Value) -> Result<Value, ClientError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };
        debug!(method, id = request.id, "Sending JSON-RPC request");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let body = response.bytes().await?;
        let decoded: JsonRpcResponse = serde_json::from_slice(&body)?;

        if let Some(error) = decoded.error {
            return Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        decoded
            .result
            .ok_or_else(|| ClientError::MissingResult(method.to_string()))
    }
}
