use serde::{Deserialize, Serialize};

use super::ValidatorExtend;
use crate::{api::number::flexible_u64, crypto::Hash};

/// Chain metadata returned by `metadata.get_metadata`.
/// Numbers may come back as hex strings depending on the node version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub chain_id: Hash,
    #[serde(default)]
    pub common_ref: String,
    #[serde(with = "flexible_u64")]
    pub timeout_gap: u64,
    #[serde(with = "flexible_u64")]
    pub cycles_limit: u64,
    #[serde(with = "flexible_u64")]
    pub cycles_price: u64,
    #[serde(with = "flexible_u64")]
    pub interval: u64,
    pub verifier_list: Vec<ValidatorExtend>,
    #[serde(with = "flexible_u64")]
    pub propose_ratio: u64,
    #[serde(with = "flexible_u64")]
    pub prevote_ratio: u64,
    #[serde(with = "flexible_u64")]
    pub precommit_ratio: u64,
    #[serde(with = "flexible_u64")]
    pub brake_ratio: u64,
    #[serde(default, with = "flexible_u64")]
    pub tx_num_limit: u64,
    #[serde(default, with = "flexible_u64")]
    pub max_tx_size: u64,
}
