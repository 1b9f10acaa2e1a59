//! Node manager suite, run against a live chain with `--ignored`.

mod common;

use anyhow::{ensure, Result};

use huobi_common::service::node_manager::UpdateRatioPayload;
use huobi_e2e::{
    assertions::{assert_code, read_data},
    fixtures::gen_random_account,
    helpers,
    services::{MetadataService, NodeManagerService},
};

use common::TestEnv;

const ACCOUNT_NUM: usize = 3;
const ACCOUNT_FUNDS: u64 = 10_000;

#[tokio::test]
#[ignore] // Run explicitly with: cargo test --test node_manager -- --ignored
async fn test_regular_progress() -> Result<()> {
    let env = TestEnv::new()?;
    let _admin = env.admin_exclusive().await;
    let accounts: Vec<_> = (0..ACCOUNT_NUM).map(|_| gen_random_account()).collect();
    let addresses: Vec<_> = accounts.iter().map(|a| a.address().clone()).collect();
    helpers::seed_accounts(&env.admin, &addresses, ACCOUNT_FUNDS).await?;

    let preset = NodeManagerService::new(env.admin.clone());
    let metadata = MetadataService::new(env.admin.clone());

    let outcome = preset.set_admin(&addresses[0]).await?;
    assert_code(&outcome, 0)?;
    let admin = preset.get_admin().await?;
    ensure!(*read_data(&admin)? == addresses[0], "Admin was not handed over");

    let manager = NodeManagerService::new(env.caller(accounts[0].clone()));

    let outcome = manager.update_interval(666).await?;
    assert_code(&outcome, 0)?;
    let current = metadata.get_metadata().await?;
    let interval = read_data(&current)?.interval;
    ensure!(interval == 666, "Interval is {}", interval);

    let ratio = UpdateRatioPayload {
        propose_ratio: 16,
        prevote_ratio: 16,
        precommit_ratio: 16,
        brake_ratio: 6,
    };
    let outcome = manager.update_ratio(&ratio).await?;
    assert_code(&outcome, 0)?;
    let current = metadata.get_metadata().await?;
    let current = read_data(&current)?;
    ensure!(
        (current.propose_ratio, current.prevote_ratio, current.precommit_ratio, current.brake_ratio) == (16, 16, 16, 6),
        "Ratios are {}/{}/{}/{}",
        current.propose_ratio,
        current.prevote_ratio,
        current.precommit_ratio,
        current.brake_ratio
    );

    let outcome = manager.set_admin(env.admin.address()).await?;
    assert_code(&outcome, 0)
}

#[tokio::test]
#[ignore]
async fn test_non_admin_is_rejected() -> Result<()> {
    let env = TestEnv::new()?;
    let _admin = env.admin_shared().await;
    let outsider = NodeManagerService::new(env.funded_caller(99_999_999).await?);

    let outcome = outsider.update_interval(666).await?;
    ensure!(!outcome.is_success(), "Non admin updated the interval");
    Ok(())
}
