//! A Rust library for watching an EVM chain for transactions touching a set of
//! subscribed addresses.
//!
//! The crate owns the ingestion side of the service: it polls a JSON-RPC node for
//! the chain head, walks every unprocessed block, keeps the transactions whose
//! sender or recipient is subscribed, and exposes them through a small query API.
//!
//! # Key Components
//!
//! *   [`client`]: The [`client::ChainClient`] trait and its JSON-RPC over HTTP implementation.
//! *   [`storage`]: The [`storage::Storage`] trait and the in-memory state store holding
//!     subscriptions, matched transactions and the block cursor.
//! *   [`workers::IngestionEngine`]: The background poll loop. It is started once and
//!     stopped through its [`workers::IngestionHandle`].
//! *   [`facade`]: The [`facade::TransactionQuery`] seam used by external interfaces.
/// The JSON-RPC chain client.
pub mod client;
/// Defines configuration structures for the connector.
pub mod config;
/// Read and subscribe operations exposed to external interfaces.
pub mod facade;
/// Hex quantity decoding and encoding.
pub mod quantity;
/// A trait and in-memory implementation of the ingestion state.
pub mod storage;
/// Wire schema types and matched transaction records.
pub mod types;
/// The background workers responsible for chain ingestion.
pub mod workers;
