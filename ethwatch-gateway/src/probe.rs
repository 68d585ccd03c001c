//! A small client for the gateway's HTTP API, used by the `probe` subcommand to check
//! a running instance end to end.

use crate::{
    cli::ProbeCmd,
    http::routes::{
        CurrentBlockResponse, SubscribeRequest, SubscribeResponse, TransactionsResponse,
    },
};
use anyhow::{bail, Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Typed access to a gateway's API.
#[derive(Debug, Clone)]
pub struct ProbeClient {
    http_client: Client,
    base_url: String,
}

impl ProbeClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn subscribe(&self, address: &str) -> Result<SubscribeResponse> {
        let response = self
            .http_client
            .post(format!("{}/subscribe", self.base_url))
            .json(&SubscribeRequest {
                address: address.to_string(),
            })
            .send()
            .await
            .context("Failed to send subscribe request")?;
        decode(response).await
    }

    pub async fn current_block(&self) -> Result<u64> {
        let response = self
            .http_client
            .get(format!("{}/current-block", self.base_url))
            .send()
            .await
            .context("Failed to send current-block request")?;
        let body: CurrentBlockResponse = decode(response).await?;
        Ok(body.current_block)
    }

    pub async fn transactions(&self, address: &str) -> Result<TransactionsResponse> {
        let response = self
            .http_client
            .get(format!("{}/transactions", self.base_url))
            .query(&[("address", address)])
            .send()
            .await
            .context("Failed to send transactions request")?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("unexpected status code: {}, body: {}", status, body);
    }
    response
        .json()
        .await
        .context("Failed to decode response body")
}

/// What one probe round observed for an address.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub subscription: SubscribeResponse,
    pub initial_block: u64,
    pub final_block: u64,
    pub transactions: TransactionsResponse,
}

impl ProbeReport {
    pub fn blocks_processed(&self) -> u64 {
        self.final_block.saturating_sub(self.initial_block)
    }
}

/// Subscribes `address`, waits, then collects its transactions and the cursor movement.
pub async fn probe_address(client: &ProbeClient, address: &str, wait: Duration) -> Result<ProbeReport> {
    let subscription = client.subscribe(address).await?;
    let initial_block = client.current_block().await?;

    tokio::time::sleep(wait).await;

    let transactions = client.transactions(address).await?;
    let final_block = client.current_block().await?;

    Ok(ProbeReport {
        subscription,
        initial_block,
        final_block,
        transactions,
    })
}

/// Runs the `probe` subcommand, printing one report per address.
pub async fn run_probe(cmd: ProbeCmd) -> Result<()> {
    let client = ProbeClient::new(&cmd.url)?;
    let wait = Duration::from_secs(cmd.wait_secs);

    for address in &cmd.addresses {
        println!("\n=== Probing address: {} ===", address);
        println!("Waiting {} seconds for blocks to be processed...", cmd.wait_secs);

        let report = match probe_address(&client, address, wait).await {
            Ok(report) => report,
            Err(e) => {
                eprintln!("Probe failed for {}: {:#}", address, e);
                continue;
            }
        };

        println!(
            "Subscribe: success={} message={}",
            report.subscription.success,
            report.subscription.message.as_deref().unwrap_or("")
        );
        println!("Found {} transactions", report.transactions.transactions.len());
        for (i, tx) in report.transactions.transactions.iter().enumerate() {
            println!("\nTransaction {}:", i + 1);
            println!("  Hash:  {}", tx.hash);
            println!("  From:  {}", tx.from);
            println!("  To:    {}", tx.to);
            println!("  Value: {}", tx.value);
            println!("  Block: {}", tx.block_number);
            println!("  Time:  {}", tx.timestamp);
        }
        println!(
            "\nBlocks {} -> {} ({} processed)",
            report.initial_block,
            report.final_block,
            report.blocks_processed()
        );
    }

    Ok(())
}
