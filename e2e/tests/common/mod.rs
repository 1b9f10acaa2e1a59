// Each suite only uses part of this module
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{RwLockReadGuard, RwLockWriteGuard};

use huobi_common::{crypto::KeyPair, fee::FeeSchedule};
use huobi_e2e::{
    client::ChainClient,
    config::E2eConfig,
    fixtures::{gen_random_account, AdminLock},
    helpers,
    transaction::ServiceCaller,
};

// Tests of a binary run concurrently, one lock per suite binary
static ADMIN_LOCK: AdminLock = AdminLock::new();

/// Connection to the node under test, shared by one test
pub struct TestEnv {
    pub config: E2eConfig,
    pub client: Arc<dyn ChainClient>,
    pub admin: ServiceCaller,
}

impl TestEnv {
    pub fn new() -> Result<Self> {
        let _ = env_logger::builder().is_test(true).try_init();

        let config = E2eConfig::from_env().context("Invalid e2e configuration")?;
        let client = config.connect()?;
        let admin = config.caller(client.clone(), config.admin()?);

        Ok(Self { config, client, admin })
    }

    /// Held by tests that rely on the genesis admin keeping its roles
    pub async fn admin_shared(&self) -> RwLockReadGuard<'static, ()> {
        ADMIN_LOCK.shared().await
    }

    /// Held by tests that hand an admin role to another account
    pub async fn admin_exclusive(&self) -> RwLockWriteGuard<'static, ()> {
        ADMIN_LOCK.exclusive().await
    }

    /// Caller signing with `account` on the same node
    pub fn caller(&self, account: KeyPair) -> ServiceCaller {
        self.admin.with_account(account)
    }

    /// A fresh account holding `balance` native tokens
    pub async fn funded_caller(&self, balance: u64) -> Result<ServiceCaller> {
        let caller = self.caller(gen_random_account());
        helpers::transfer(&self.admin, caller.address(), balance).await?;
        Ok(caller)
    }

    pub fn fee_schedule(&self) -> Result<FeeSchedule> {
        let genesis = self.config.genesis().context("Failed to load genesis")?;
        let info = genesis.governance_info()?;
        Ok(FeeSchedule::from(&info))
    }

    pub fn contract(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.config.contract_path(name);
        std::fs::read(&path).with_context(|| format!("Failed to read contract {}", path.display()))
    }
}
