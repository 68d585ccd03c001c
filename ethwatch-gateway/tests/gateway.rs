use anyhow::Result;
use ethwatch_gateway::{
    cli::RunCmd,
    config::GatewayConfig,
    http::start,
    load_config_from_cli,
    probe::ProbeClient,
};
use mockito::{Matcher, Server};
use serde_json::json;
use std::{fs, time::Duration};

const WATCHED: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";

fn local_config(rpc_url: String) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.connector.chain.rpc_url = rpc_url;
    config.connector.synchronizer.poll_interval_secs = 1;
    config.gateway.http.host = "127.0.0.1".to_string();
    config.gateway.http.port = portpicker::pick_unused_port().expect("no free port");
    config
}

#[tokio::test]
async fn gateway_indexes_a_block_end_to_end() -> Result<()> {
    let mut node = Server::new_async().await;
    let _head = node
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": "eth_blockNumber" })))
        .with_status(200)
        .with_body(json!({ "jsonrpc": "2.0", "id": 1, "result": "0x3e8" }).to_string())
        .expect_at_least(1)
        .create_async()
        .await;
    let _block = node
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "eth_getBlockByNumber",
            "params": ["0x3e8", true],
        })))
        .with_status(200)
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {
                    "number": "0x3e8",
                    "hash": "0x123",
                    "timestamp": "0x60c88c32",
                    "transactions": [
                        {
                            "hash": "0xabc",
                            "from": "0x123456",
                            "to": "0xdAC17F958D2ee523a2206206994597C13D831ec7",
                            "value": "0x0",
                            "blockNumber": "0x3e8"
                        },
                        {
                            "hash": "0xdef",
                            "from": "0x777",
                            "to": "0x888",
                            "value": "0x1",
                            "blockNumber": "0x3e8"
                        }
                    ]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut config = local_config(node.url());
    config.connector.synchronizer.start_block = Some(1000);

    let handle = start(&config).await?;
    let client = ProbeClient::new(format!("http://{}", handle.local_addr()))?;

    assert_eq!(client.current_block().await?, 999);
    assert!(client.subscribe(WATCHED).await?.success);

    let mut cursor = 0;
    for _ in 0..50 {
        cursor = client.current_block().await?;
        if cursor == 1000 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    assert_eq!(cursor, 1000);

    let listed = client.transactions(WATCHED).await?;
    assert_eq!(listed.transactions.len(), 1);
    let tx = &listed.transactions[0];
    assert_eq!(tx.hash, "0xabc");
    assert_eq!(tx.block_number, 1000);
    assert_eq!(tx.timestamp, 1623755826);

    handle.stop().await;
    Ok(())
}

#[tokio::test]
async fn gateway_seeds_the_cursor_from_the_head() -> Result<()> {
    let mut node = Server::new_async().await;
    let _head = node
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": "eth_blockNumber" })))
        .with_status(200)
        .with_body(json!({ "jsonrpc": "2.0", "id": 1, "result": "0x10d4f" }).to_string())
        .create_async()
        .await;

    let handle = start(&local_config(node.url())).await?;
    let client = ProbeClient::new(format!("http://{}", handle.local_addr()))?;

    assert_eq!(client.current_block().await?, 68943);

    handle.stop().await;
    Ok(())
}

#[tokio::test]
async fn gateway_refuses_to_start_without_a_node() {
    let dead_port = portpicker::pick_unused_port().expect("no free port");
    let config = local_config(format!("http://127.0.0.1:{dead_port}"));

    assert!(start(&config).await.is_err());
}

#[tokio::test]
async fn command_line_overrides_the_config_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("gateway.toml");
    fs::write(
        &path,
        r#"
[connector.chain]
rpc-url = "http://file-node:8545"

[connector.synchronizer]
start-block = 100

[gateway.http]
port = 9100
"#,
    )?;

    let from_file = load_config_from_cli(&RunCmd {
        config: path.to_str().map(str::to_string),
        ..Default::default()
    })?;
    assert_eq!(from_file.gateway.http.port, 9100);
    assert_eq!(from_file.connector.chain.rpc_url, "http://file-node:8545");
    assert_eq!(from_file.connector.synchronizer.start_block, Some(100));
    assert_eq!(from_file.connector.synchronizer.poll_interval_secs, 5);
    assert_eq!(from_file.gateway.http.host, "0.0.0.0");

    let overridden = load_config_from_cli(&RunCmd {
        config: path.to_str().map(str::to_string),
        port: Some(9300),
        rpc_url: Some("http://flag-node:8545".to_string()),
        poll_interval_secs: Some(2),
        start_block: Some(200),
    })?;
    assert_eq!(overridden.gateway.http.port, 9300);
    assert_eq!(overridden.connector.chain.rpc_url, "http://flag-node:8545");
    assert_eq!(overridden.connector.synchronizer.poll_interval_secs, 2);
    assert_eq!(overridden.connector.synchronizer.start_block, Some(200));
    Ok(())
}
