//! Typed payloads, responses and events of the chain's services.
//!
//! Every struct mirrors the JSON the remote service reads or writes, so the
//! field names are snake_case exactly as on the wire.

pub mod asset;
pub mod governance;
pub mod kyc;
pub mod metadata;
pub mod node_manager;
pub mod riscv;

use serde::{Deserialize, Serialize};

use crate::crypto::Address;

/// Consensus participant as configured through governance or metadata
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorExtend {
    pub bls_pub_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_key: Option<String>,
    pub address: Address,
    pub propose_weight: u32,
    pub vote_weight: u32,
}

impl ValidatorExtend {
    pub fn with_unit_weights(bls_pub_key: String, address: Address) -> Self {
        Self {
            bls_pub_key,
            pub_key: None,
            address,
            propose_weight: 1,
            vote_weight: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAdminPayload {
    pub admin: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateValidatorsPayload {
    pub verifier_list: Vec<ValidatorExtend>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validator_wire_names() {
        let address: Address = "0xd2d268749ffe54def4e2e73e5e06a4ebf0d6f585".parse().unwrap();
        let payload = UpdateValidatorsPayload {
            verifier_list: vec![ValidatorExtend::with_unit_weights("0x04aa".to_string(), address)],
        };
        let json = serde_json::to_value(&payload).unwrap();
        let validator = &json["verifier_list"][0];
        assert_eq!(validator["bls_pub_key"], "0x04aa");
        assert_eq!(validator["propose_weight"], 1);
        assert!(validator.get("pub_key").is_none());
    }
}
