//! Multi-step helpers shared by the suites, run as the given (usually admin) caller.

use anyhow::{Context, Result};
use futures::future::try_join_all;
use log::info;

use huobi_common::{crypto::Address, service::asset::TransferPayload};

use crate::{
    assertions::{assert_code, read_data, write_data},
    fixtures::NATIVE_ASSET_ID,
    services::{AssetService, RiscvService},
    transaction::ServiceCaller,
};

/// Transfer native tokens from the caller, requiring success
pub async fn transfer(caller: &ServiceCaller, to: &Address, value: u64) -> Result<()> {
    let outcome = AssetService::new(caller.clone())
        .transfer(&TransferPayload {
            asset_id: NATIVE_ASSET_ID,
            to: to.clone(),
            value,
            memo: "transfer".to_string(),
        })
        .await
        .with_context(|| format!("Failed to transfer {} to {}", value, to))?;
    assert_code(&outcome, 0)
}

/// Native token balance of `user`
pub async fn get_balance(caller: &ServiceCaller, user: &Address) -> Result<u64> {
    let outcome = AssetService::new(caller.clone())
        .get_balance(&NATIVE_ASSET_ID, user)
        .await
        .with_context(|| format!("Failed to query balance of {}", user))?;
    Ok(read_data(&outcome)?.balance)
}

/// Grant the caller deploy rights, deploy `code` and approve the contract.
/// Returns the contract address.
pub async fn deploy(caller: &ServiceCaller, code: &[u8], init_args: &str) -> Result<Address> {
    let riscv = RiscvService::new(caller.clone());

    let granted = riscv.grant_deploy_auth(vec![caller.address().clone()]).await?;
    assert_code(&granted, 0).context("grant_deploy_auth failed")?;

    let deployed = riscv.deploy(code, init_args).await?;
    let address = write_data(&deployed).context("deploy failed")?.address.clone();

    let approved = riscv.approve_contracts(vec![address.clone()]).await?;
    assert_code(&approved, 0).context("approve_contracts failed")?;

    info!("Deployed contract {}", address);
    Ok(address)
}

/// Fund every account concurrently, in no particular order
pub async fn seed_accounts(caller: &ServiceCaller, accounts: &[Address], value: u64) -> Result<()> {
    try_join_all(accounts.iter().map(|account| transfer(caller, account, value))).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use huobi_common::{api::ServiceResponse, config::RISCV_SERVICE, service::asset::codes};

    use super::*;
    use crate::{client::mock::MockOutcome, services::test_utils::mock_caller};

    #[tokio::test]
    async fn test_deploy_runs_three_writes() {
        let (chain, caller) = mock_caller();
        let contract = Address::new([0xc0; 20]);
        chain.push_outcome(MockOutcome::success(""));
        chain.push_outcome(MockOutcome::success(format!(r#"{{"address":"{}"}}"#, contract)));
        chain.push_outcome(MockOutcome::success(""));

        let address = deploy(&caller, b"\x7fELF", "").await.unwrap();
        assert_eq!(address, contract);

        let methods: Vec<_> = chain
            .sent_transactions()
            .into_iter()
            .map(|tx| tx.raw.request.method)
            .collect();
        assert_eq!(methods, vec!["grant_deploy_auth", "deploy", "approve_contracts"]);
        assert!(chain.sent_transactions().iter().all(|tx| tx.raw.request.service_name == RISCV_SERVICE));
    }

    #[tokio::test]
    async fn test_deploy_stops_on_failure() {
        let (chain, caller) = mock_caller();
        chain.push_outcome(MockOutcome::failure(0x6d, "non authorized"));

        assert!(deploy(&caller, b"\x7fELF", "").await.is_err());
        assert_eq!(chain.sent_transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_transfer_and_balance() {
        let (chain, caller) = mock_caller();
        let user = Address::new([1; 20]);
        chain.push_outcome(MockOutcome::failure(codes::LACK_OF_BALANCE, "lack of balance"));
        assert!(transfer(&caller, &user, 10).await.is_err());

        chain.set_query_response(
            "asset",
            "get_balance",
            ServiceResponse {
                code: 0,
                succeed_data: format!(
                    r#"{{"asset_id":"{}","user":"{}","balance":1048575}}"#,
                    NATIVE_ASSET_ID, user
                ),
                error_message: String::new(),
            },
        );
        assert_eq!(get_balance(&caller, &user).await.unwrap(), 0xfffff);
    }

    #[tokio::test]
    async fn test_seed_accounts() {
        let (chain, caller) = mock_caller();
        let accounts: Vec<_> = (1..=4u8).map(|i| Address::new([i; 20])).collect();
        seed_accounts(&caller, &accounts, 10_000).await.unwrap();

        let sent = chain.sent_transactions();
        assert_eq!(sent.len(), 4);
        for account in &accounts {
            assert!(sent.iter().any(|tx| tx.raw.request.payload.contains(&account.to_hex())));
        }
    }
}
