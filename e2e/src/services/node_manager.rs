use huobi_common::{
    config::NODE_MANAGER_SERVICE,
    crypto::Address,
    service::node_manager::{SetAdminPayload, UpdateIntervalPayload, UpdateRatioPayload, UpdateValidatorsPayload},
};

use super::{read_empty, write, ReadOutcome, WriteOutcome};
use crate::transaction::{CallError, ServiceCaller};

/// Consensus parameter updates, restricted to the node manager admin
#[derive(Clone)]
pub struct NodeManagerService {
    caller: ServiceCaller,
}

impl NodeManagerService {
    pub fn new(caller: ServiceCaller) -> Self {
        Self { caller }
    }

    pub fn caller(&self) -> &ServiceCaller {
        &self.caller
    }

    pub async fn get_admin(&self) -> Result<ReadOutcome<Address>, CallError> {
        read_empty(&self.caller, NODE_MANAGER_SERVICE, "get_admin").await
    }

    pub async fn set_admin(&self, admin: &Address) -> Result<WriteOutcome<()>, CallError> {
        let payload = SetAdminPayload { admin: admin.clone() };
        write(&self.caller, NODE_MANAGER_SERVICE, "set_admin", &payload).await
    }

    pub async fn update_interval(&self, interval: u64) -> Result<WriteOutcome<()>, CallError> {
        let payload = UpdateIntervalPayload { interval };
        write(&self.caller, NODE_MANAGER_SERVICE, "update_interval", &payload).await
    }

    pub async fn update_ratio(&self, payload: &UpdateRatioPayload) -> Result<WriteOutcome<()>, CallError> {
        write(&self.caller, NODE_MANAGER_SERVICE, "update_ratio", payload).await
    }

    pub async fn update_validators(&self, payload: &UpdateValidatorsPayload) -> Result<WriteOutcome<()>, CallError> {
        write(&self.caller, NODE_MANAGER_SERVICE, "update_validators", payload).await
    }
}
