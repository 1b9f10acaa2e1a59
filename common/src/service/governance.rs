use serde::{Deserialize, Serialize};

use crate::crypto::Address;

pub use super::{SetAdminPayload, UpdateValidatorsPayload};

pub mod codes {
    pub const NON_AUTHORIZED: u64 = 101;
    pub const JSON_PARSE: u64 = 102;
    pub const MISSING_INFO: u64 = 103;
    pub const OVERFLOW: u64 = 104;
    pub const QUERY_BALANCE: u64 = 105;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountLevel {
    pub threshold: u64,
    pub discount_percent: u64,
}

/// Fee parameters held by the governance service
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceInfo {
    pub admin: Address,
    pub tx_failure_fee: u64,
    pub tx_floor_fee: u64,
    pub profit_deduct_rate_per_million: u64,
    #[serde(default)]
    pub tx_fee_discount: Vec<DiscountLevel>,
    #[serde(default)]
    pub miner_benefit: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerChargeConfig {
    pub address: Address,
    pub miner_charge_address: Address,
}

/// Governance entry of the genesis file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceGenesis {
    pub info: GovernanceInfo,
    #[serde(default)]
    pub tx_fee_inlet_address: Option<Address>,
    #[serde(default)]
    pub miner_profit_outlet_address: Option<Address>,
    #[serde(default)]
    pub miner_charge_map: Vec<MinerChargeConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetGovernInfoPayload {
    pub inner: GovernanceInfo,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulateProfitPayload {
    pub address: Address,
    pub accumulated_profit: u64,
}
