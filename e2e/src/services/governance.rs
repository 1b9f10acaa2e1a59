use huobi_common::{
    config::GOVERNANCE_SERVICE,
    crypto::Address,
    service::{
        governance::{AccumulateProfitPayload, GovernanceInfo, SetAdminPayload, SetGovernInfoPayload},
        node_manager::{UpdateIntervalPayload, UpdateRatioPayload},
        UpdateValidatorsPayload,
    },
};

use super::{read_empty, write, ReadOutcome, WriteOutcome};
use crate::transaction::{CallError, ServiceCaller};

#[derive(Clone)]
pub struct GovernanceService {
    caller: ServiceCaller,
}

impl GovernanceService {
    pub fn new(caller: ServiceCaller) -> Self {
        Self { caller }
    }

    pub fn caller(&self) -> &ServiceCaller {
        &self.caller
    }

    pub async fn get_admin(&self) -> Result<ReadOutcome<Address>, CallError> {
        read_empty(&self.caller, GOVERNANCE_SERVICE, "get_admin").await
    }

    pub async fn get_govern_info(&self) -> Result<ReadOutcome<GovernanceInfo>, CallError> {
        read_empty(&self.caller, GOVERNANCE_SERVICE, "get_govern_info").await
    }

    pub async fn get_tx_failure_fee(&self) -> Result<ReadOutcome<u64>, CallError> {
        read_empty(&self.caller, GOVERNANCE_SERVICE, "get_tx_failure_fee").await
    }

    pub async fn get_tx_floor_fee(&self) -> Result<ReadOutcome<u64>, CallError> {
        read_empty(&self.caller, GOVERNANCE_SERVICE, "get_tx_floor_fee").await
    }

    pub async fn set_admin(&self, admin: &Address) -> Result<WriteOutcome<()>, CallError> {
        let payload = SetAdminPayload { admin: admin.clone() };
        write(&self.caller, GOVERNANCE_SERVICE, "set_admin", &payload).await
    }

    pub async fn set_govern_info(&self, info: GovernanceInfo) -> Result<WriteOutcome<()>, CallError> {
        let payload = SetGovernInfoPayload { inner: info };
        write(&self.caller, GOVERNANCE_SERVICE, "set_govern_info", &payload).await
    }

    pub async fn update_validators(&self, payload: &UpdateValidatorsPayload) -> Result<WriteOutcome<()>, CallError> {
        write(&self.caller, GOVERNANCE_SERVICE, "update_validators", payload).await
    }

    pub async fn update_interval(&self, interval: u64) -> Result<WriteOutcome<()>, CallError> {
        let payload = UpdateIntervalPayload { interval };
        write(&self.caller, GOVERNANCE_SERVICE, "update_interval", &payload).await
    }

    pub async fn update_ratio(&self, payload: &UpdateRatioPayload) -> Result<WriteOutcome<()>, CallError> {
        write(&self.caller, GOVERNANCE_SERVICE, "update_ratio", payload).await
    }

    /// Record profit for `address`; the fee is deducted from the transaction sender
    pub async fn accumulate_profit(
        &self,
        address: &Address,
        accumulated_profit: u64,
    ) -> Result<WriteOutcome<()>, CallError> {
        let payload = AccumulateProfitPayload {
            address: address.clone(),
            accumulated_profit,
        };
        write(&self.caller, GOVERNANCE_SERVICE, "accumulate_profit", &payload).await
    }
}
