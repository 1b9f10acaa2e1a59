use serde::{Deserialize, Serialize};

use crate::crypto::{Address, Hash};

pub mod codes {
    pub const CONTRACT_NOT_FOUND: u64 = 102;
    pub const NON_ZERO_EXIT: u64 = 104;
    // Raised by the VM when the code is not a loadable RISC-V binary
    pub const INVALID_CONTRACT: u64 = 0x69;
    pub const NON_AUTHORIZED: u64 = 0x6d;
    pub const OUT_OF_CYCLES: u64 = 110;
    // Exit code a contract returns when a nested service write is rejected in a read
    pub const SERVICE_CALL_FAILED: u64 = 0x2;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpreterType {
    #[default]
    Binary,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployPayload {
    // Hex without prefix
    pub code: String,
    pub intp_type: InterpreterType,
    pub init_args: String,
}

impl DeployPayload {
    pub fn binary(code: &[u8], init_args: &str) -> Self {
        Self {
            code: hex::encode(code),
            intp_type: InterpreterType::Binary,
            init_args: init_args.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployResp {
    pub address: Address,
    #[serde(default)]
    pub init_ret: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecPayload {
    pub address: Address,
    pub args: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressList {
    pub addresses: Vec<Address>,
}

impl AddressList {
    pub fn single(address: Address) -> Self {
        Self {
            addresses: vec![address],
        }
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.addresses.contains(address)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetContractPayload {
    pub address: Address,
    #[serde(default)]
    pub get_code: bool,
    // Hex-encoded storage keys
    #[serde(default)]
    pub storage_keys: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetContractResp {
    pub code_hash: Hash,
    pub intp_type: InterpreterType,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub storage_values: Vec<String>,
    #[serde(default)]
    pub authorizer: Option<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_payload_json() {
        let payload = DeployPayload::binary(b"\x7fELF", "set k init");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["code"], "7f454c46");
        assert_eq!(json["intp_type"], "Binary");
        assert_eq!(json["init_args"], "set k init");
    }

    #[test]
    fn test_get_contract_resp() {
        let json = r#"{
            "code_hash": "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470",
            "intp_type": "Binary",
            "code": "",
            "storage_values": ["76", "", ""],
            "authorizer": null
        }"#;
        let resp: GetContractResp = serde_json::from_str(json).unwrap();
        assert_eq!(resp.storage_values, vec!["76", "", ""]);
        assert!(resp.authorizer.is_none());
    }
}
