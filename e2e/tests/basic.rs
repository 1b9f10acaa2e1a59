//! Node level API checks against a running chain.
//!
//! ```bash
//! MUTA_ENDPOINT=http://127.0.0.1:8000/graphql cargo test -p huobi_e2e --test basic -- --ignored
//! ```

mod common;

use anyhow::{ensure, Result};
use serde_json::json;

use huobi_common::config::ASSET_SERVICE;
use huobi_e2e::{
    assertions::assert_graphql_error_contains,
    client::ChainClient,
    transaction::{wait_for_receipt, CallError},
};

use common::TestEnv;

const MAX_CYCLES_LIMIT_EXCEEDED: u64 = 0xE8D4A51FFF;

fn create_asset_payload() -> serde_json::Value {
    json!({
        "name": "Muta Token",
        "symbol": "MT",
        "supply": 1_000_000_000u64,
    })
}

#[tokio::test]
#[ignore] // Run explicitly with: cargo test --test basic -- --ignored
async fn test_get_latest_block_height() -> Result<()> {
    let env = TestEnv::new()?;
    let height = env.client.get_latest_block_height().await?;
    ensure!(height > 0, "Chain is still at height {}", height);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_get_block() -> Result<()> {
    let env = TestEnv::new()?;
    let block = env.client.get_block(Some(1)).await?;
    ensure!(block.header.height == 1, "Asked block 1, got {}", block.header.height);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_send_tx_exceed_cycles_limit() -> Result<()> {
    let env = TestEnv::new()?;
    let result = env
        .admin
        .write_raw(
            ASSET_SERVICE,
            "create_asset",
            create_asset_payload().to_string(),
            |raw| raw.cycles_limit = MAX_CYCLES_LIMIT_EXCEEDED,
        )
        .await;
    assert_graphql_error_contains(&result, "ExceedCyclesLimit")
}

#[tokio::test]
#[ignore]
async fn test_send_tx_exceed_tx_size_limit() -> Result<()> {
    let env = TestEnv::new()?;
    let mut payload = create_asset_payload();
    payload["bigdata"] = json!("a".repeat(300_000));

    let raw = env
        .admin
        .compose(ASSET_SERVICE, "create_asset", payload.to_string())
        .await?;
    let signed = raw.sign(env.admin.account())?;

    let result = env.client.send_transaction(&signed).await.map_err(CallError::from);
    assert_graphql_error_contains(&result, "ExceedSizeLimit")
}

#[tokio::test]
#[ignore]
async fn test_send_tx_get_tx_and_receipt() -> Result<()> {
    let env = TestEnv::new()?;
    let raw = env
        .admin
        .compose(ASSET_SERVICE, "create_asset", create_asset_payload().to_string())
        .await?;
    let signed = raw.sign(env.admin.account())?;

    let hash = env.client.send_transaction(&signed).await?;
    ensure!(hash == signed.tx_hash, "Node hashed the transaction as {}", hash);

    let receipt = wait_for_receipt(env.client.as_ref(), &hash, env.admin.config()).await?;
    ensure!(receipt.tx_hash == hash, "Receipt belongs to {}", receipt.tx_hash);

    let committed = env.client.get_transaction(&hash).await?;
    ensure!(committed.tx_hash == hash, "Transaction view belongs to {}", committed.tx_hash);
    ensure!(committed.sender == *env.admin.address(), "Unexpected sender {}", committed.sender);
    Ok(())
}
