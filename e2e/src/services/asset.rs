use huobi_common::{
    config::ASSET_SERVICE,
    crypto::{Address, Hash},
    service::asset::{
        ApprovePayload, Asset, BurnPayload, ChangeAdminPayload, CreateAssetPayload,
        GetAllowancePayload, GetAllowanceResponse, GetAssetPayload, GetBalancePayload,
        GetBalanceResponse, MintPayload, RelayPayload, TransferFromPayload, TransferPayload,
    },
};

use super::{read, write, ReadOutcome, WriteOutcome};
use crate::transaction::{CallError, ServiceCaller};

#[derive(Clone)]
pub struct AssetService {
    caller: ServiceCaller,
}

impl AssetService {
    pub fn new(caller: ServiceCaller) -> Self {
        Self { caller }
    }

    pub fn caller(&self) -> &ServiceCaller {
        &self.caller
    }

    pub async fn create_asset(&self, payload: &CreateAssetPayload) -> Result<WriteOutcome<Asset>, CallError> {
        write(&self.caller, ASSET_SERVICE, "create_asset", payload).await
    }

    pub async fn get_asset(&self, id: &Hash) -> Result<ReadOutcome<Asset>, CallError> {
        let payload = GetAssetPayload { id: id.clone() };
        read(&self.caller, ASSET_SERVICE, "get_asset", &payload).await
    }

    pub async fn get_balance(
        &self,
        asset_id: &Hash,
        user: &Address,
    ) -> Result<ReadOutcome<GetBalanceResponse>, CallError> {
        let payload = GetBalancePayload {
            asset_id: asset_id.clone(),
            user: user.clone(),
        };
        read(&self.caller, ASSET_SERVICE, "get_balance", &payload).await
    }

    pub async fn get_allowance(
        &self,
        asset_id: &Hash,
        grantor: &Address,
        grantee: &Address,
    ) -> Result<ReadOutcome<GetAllowanceResponse>, CallError> {
        let payload = GetAllowancePayload {
            asset_id: asset_id.clone(),
            grantor: grantor.clone(),
            grantee: grantee.clone(),
        };
        read(&self.caller, ASSET_SERVICE, "get_allowance", &payload).await
    }

    pub async fn transfer(&self, payload: &TransferPayload) -> Result<WriteOutcome<()>, CallError> {
        write(&self.caller, ASSET_SERVICE, "transfer", payload).await
    }

    pub async fn approve(&self, payload: &ApprovePayload) -> Result<WriteOutcome<()>, CallError> {
        write(&self.caller, ASSET_SERVICE, "approve", payload).await
    }

    pub async fn transfer_from(&self, payload: &TransferFromPayload) -> Result<WriteOutcome<()>, CallError> {
        write(&self.caller, ASSET_SERVICE, "transfer_from", payload).await
    }

    /// Admin only
    pub async fn mint(&self, payload: &MintPayload) -> Result<WriteOutcome<()>, CallError> {
        write(&self.caller, ASSET_SERVICE, "mint", payload).await
    }

    pub async fn burn(&self, payload: &BurnPayload) -> Result<WriteOutcome<()>, CallError> {
        write(&self.caller, ASSET_SERVICE, "burn", payload).await
    }

    /// Burn for a cross-chain relay, only allowed on relayable assets
    pub async fn relay(&self, payload: &RelayPayload) -> Result<WriteOutcome<()>, CallError> {
        write(&self.caller, ASSET_SERVICE, "relay", payload).await
    }

    pub async fn change_admin(&self, addr: &Address) -> Result<WriteOutcome<()>, CallError> {
        let payload = ChangeAdminPayload { addr: addr.clone() };
        write(&self.caller, ASSET_SERVICE, "change_admin", &payload).await
    }
}
