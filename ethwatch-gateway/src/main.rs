use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    ethwatch_gateway::run().await?;
    Ok(())
}
