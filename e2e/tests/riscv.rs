//! RISC-V contract suite, run against a live chain with `--ignored`.
//!
//! Contract binaries are read from `HUOBI_CONTRACTS_DIR`.

mod common;

use anyhow::{ensure, Context, Result};

use huobi_common::{crypto::Address, service::riscv::codes};
use huobi_e2e::{
    assertions::{assert_balance_change, assert_code, assert_query_code, read_data, write_data},
    fixtures::gen_random_account,
    helpers,
    services::RiscvService,
};

use common::TestEnv;

const SIMPLE_STORAGE: &str = "simple_storage";
const CONTRACT_TEST: &str = "contract_test";
const ACCOUNT_FUNDS: u64 = 9_999_999;

async fn deploy(service: &RiscvService, code: &[u8], init_args: &str, expected: u64) -> Result<Option<Address>> {
    let outcome = service.deploy(code, init_args).await?;
    assert_code(&outcome, expected)?;
    if outcome.is_success() {
        Ok(Some(write_data(&outcome)?.address.clone()))
    } else {
        Ok(None)
    }
}

async fn check_deploy_auth(service: &RiscvService, address: &Address, granted: bool) -> Result<()> {
    let outcome = service.check_deploy_auth(vec![address.clone()]).await?;
    let list = read_data(&outcome)?;
    ensure!(
        list.contains(address) == granted,
        "Deploy auth of {} should be {}",
        address,
        granted
    );
    Ok(())
}

async fn call(service: &RiscvService, contract: &Address, args: &str, expected: u64) -> Result<String> {
    let outcome = service.call(contract, args).await?;
    assert_query_code(&outcome, expected)?;
    Ok(outcome.data.unwrap_or_default())
}

async fn exec(service: &RiscvService, contract: &Address, args: &str, expected: u64) -> Result<()> {
    let outcome = service.exec(contract, args).await?;
    assert_code(&outcome, expected)
}

/// Deploy `code` from a fresh funded account granted deploy rights
async fn deploy_from_new_account(env: &TestEnv, admin: &RiscvService, code: &[u8]) -> Result<(RiscvService, Address)> {
    let user = RiscvService::new(env.funded_caller(ACCOUNT_FUNDS).await?);
    let granted = admin.grant_deploy_auth(vec![user.caller().address().clone()]).await?;
    assert_code(&granted, 0)?;

    let address = deploy(&user, code, "set k init", 0)
        .await?
        .context("Deploy returned no address")?;
    Ok((user, address))
}

#[tokio::test]
#[ignore] // Run explicitly with: cargo test --test riscv -- --ignored
async fn test_deploy_auth() -> Result<()> {
    let env = TestEnv::new()?;
    let code = env.contract(SIMPLE_STORAGE)?;
    let admin = RiscvService::new(env.admin.clone());
    let user = RiscvService::new(env.funded_caller(ACCOUNT_FUNDS).await?);
    let user_address = user.caller().address().clone();

    deploy(&user, &code, "set k init", codes::NON_AUTHORIZED).await?;

    check_deploy_auth(&admin, &user_address, false).await?;
    assert_code(&admin.grant_deploy_auth(vec![user_address.clone()]).await?, 0)?;
    check_deploy_auth(&admin, &user_address, true).await?;

    deploy(&user, &code, "set k init", 0).await?;

    assert_code(&admin.revoke_deploy_auth(vec![user_address.clone()]).await?, 0)?;
    deploy(&user, &code, "set k init", codes::NON_AUTHORIZED).await?;
    check_deploy_auth(&admin, &user_address, false).await
}

#[tokio::test]
#[ignore]
async fn test_contract_auth() -> Result<()> {
    let env = TestEnv::new()?;
    let code = env.contract(SIMPLE_STORAGE)?;
    let admin = RiscvService::new(env.admin.clone());
    let (_, contract) = deploy_from_new_account(&env, &admin, &code).await?;

    call(&admin, &contract, "get k", codes::NON_AUTHORIZED).await?;
    exec(&admin, &contract, "set k v", codes::NON_AUTHORIZED).await?;

    assert_code(&admin.approve_contracts(vec![contract.clone()]).await?, 0)?;
    call(&admin, &contract, "get k", 0).await?;
    exec(&admin, &contract, "set k v", 0).await?;

    assert_code(&admin.revoke_contracts(vec![contract.clone()]).await?, 0)?;
    call(&admin, &contract, "get k", codes::NON_AUTHORIZED).await?;
    exec(&admin, &contract, "set k v", codes::NON_AUTHORIZED).await
}

#[tokio::test]
#[ignore]
async fn test_normal_process() -> Result<()> {
    let env = TestEnv::new()?;
    let code = env.contract(SIMPLE_STORAGE)?;
    let admin = RiscvService::new(env.admin.clone());
    let (user, contract) = deploy_from_new_account(&env, &admin, &code).await?;
    assert_code(&admin.approve_contracts(vec![contract.clone()]).await?, 0)?;

    let value = call(&admin, &contract, "get k", 0).await?;
    ensure!(value == "init", "Initial value is {}", value);
    exec(&user, &contract, "set k v", 0).await?;
    let value = call(&admin, &contract, "get k", 0).await?;
    ensure!(value == "v", "Stored value is {}", value);

    let keys = vec![hex::encode("k"), String::new(), "1a".to_string()];
    let outcome = admin.get_contract(&contract, true, keys).await?;
    let stored = read_data(&outcome)?;
    ensure!(stored.code == hex::encode(&code), "Stored code differs from the deployed binary");
    ensure!(
        stored.storage_values == vec![hex::encode("v"), String::new(), String::new()],
        "Storage values are {:?}",
        stored.storage_values
    );
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_service_call() -> Result<()> {
    let env = TestEnv::new()?;
    let code = env.contract(CONTRACT_TEST)?;
    let admin = RiscvService::new(env.admin.clone());
    let contract = helpers::deploy(&env.admin, &code, "").await?;

    exec(&admin, &contract, "test_service_call_read_fail", codes::SERVICE_CALL_FAILED).await?;
    call(&admin, &contract, "test_service_read", 0).await?;

    let amount = 0x76_8762;
    helpers::transfer(&env.admin, &contract, amount).await?;
    let balance = helpers::get_balance(&env.admin, &contract).await?;
    ensure!(balance == amount, "Contract holds {}", balance);

    let recipient: Address = "0x0000000000000000000000000000000000000001".parse()?;
    let before = helpers::get_balance(&env.admin, &recipient).await?;
    exec(&admin, &contract, "test_transfer_from_contract", 0).await?;
    let after = helpers::get_balance(&env.admin, &recipient).await?;
    assert_balance_change("recipient", before, after, 100)
}

#[tokio::test]
#[ignore]
async fn test_invalid_contract() -> Result<()> {
    let env = TestEnv::new()?;
    let admin = RiscvService::new(env.admin.clone());
    assert_code(&admin.grant_deploy_auth(vec![env.admin.address().clone()]).await?, 0)?;

    deploy(&admin, b"invalid contract", "invalid params", codes::INVALID_CONTRACT).await?;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_unknown_account_has_no_deploy_auth() -> Result<()> {
    let env = TestEnv::new()?;
    let admin = RiscvService::new(env.admin.clone());
    check_deploy_auth(&admin, gen_random_account().address(), false).await
}
