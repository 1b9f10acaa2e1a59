use serde::{Deserialize, Serialize};

use crate::crypto::{Address, Hash};

/// Result codes the asset service reports
pub mod codes {
    pub const ASSET_NOT_FOUND: u64 = 101;
    pub const LACK_OF_BALANCE: u64 = 102;
    pub const TRANSFER_TO_SELF: u64 = 107;
    pub const APPROVE_TO_SELF: u64 = 108;
    // Caller is not the asset admin
    pub const UNAUTHORIZED: u64 = 0x6d;
    // Relay attempted on an asset created with `relayable = false`
    pub const UNRELAYABLE: u64 = 0x6f;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAssetPayload {
    pub name: String,
    pub symbol: String,
    pub supply: u64,
    pub precision: u64,
    pub relayable: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Hash,
    pub name: String,
    pub symbol: String,
    pub supply: u64,
    pub precision: u64,
    #[serde(default)]
    pub issuers: Vec<Address>,
    #[serde(default)]
    pub relayable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAssetPayload {
    pub id: Hash,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPayload {
    pub asset_id: Hash,
    pub to: Address,
    pub value: u64,
    pub memo: String,
}

pub type ApprovePayload = TransferPayload;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFromPayload {
    pub asset_id: Hash,
    pub sender: Address,
    pub recipient: Address,
    pub value: u64,
    pub memo: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintPayload {
    pub asset_id: Hash,
    pub to: Address,
    pub amount: u64,
    pub proof: String,
    pub memo: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnPayload {
    pub asset_id: Hash,
    pub amount: u64,
    pub proof: String,
    pub memo: String,
}

pub type RelayPayload = BurnPayload;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeAdminPayload {
    pub addr: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBalancePayload {
    pub asset_id: Hash,
    pub user: Address,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBalanceResponse {
    pub asset_id: Hash,
    pub user: Address,
    pub balance: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAllowancePayload {
    pub asset_id: Hash,
    pub grantor: Address,
    pub grantee: Address,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAllowanceResponse {
    pub asset_id: Hash,
    pub grantor: Address,
    pub grantee: Address,
    pub value: u64,
}

// Events

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub asset_id: Hash,
    pub from: Address,
    pub to: Address,
    pub value: u64,
    #[serde(default)]
    pub memo: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveEvent {
    pub asset_id: Hash,
    pub grantor: Address,
    pub grantee: Address,
    pub value: u64,
    #[serde(default)]
    pub memo: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFromEvent {
    pub asset_id: Hash,
    pub caller: Address,
    pub sender: Address,
    pub recipient: Address,
    pub value: u64,
    #[serde(default)]
    pub memo: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintEvent {
    pub asset_id: Hash,
    pub to: Address,
    pub amount: u64,
    #[serde(default)]
    pub proof: String,
    #[serde(default)]
    pub memo: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnEvent {
    pub asset_id: Hash,
    pub from: Address,
    pub amount: u64,
    #[serde(default)]
    pub proof: String,
    #[serde(default)]
    pub memo: String,
}

pub type RelayEvent = BurnEvent;
