//! Genesis file parsing.
//!
//! The genesis TOML lists every service with its init payload as an embedded
//! JSON string. Tests read it to learn the fee parameters and the native asset.

use std::{fs, path::Path};

use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::{ASSET_SERVICE, GOVERNANCE_SERVICE},
    crypto::Hash,
    service::governance::{GovernanceGenesis, GovernanceInfo},
};

#[derive(Error, Debug)]
pub enum GenesisError {
    #[error("Failed to read genesis file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid genesis TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Service '{0}' is missing from genesis")]
    MissingService(String),
    #[error("Invalid payload for service '{service}': {source}")]
    Payload {
        service: String,
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceParam {
    pub name: String,
    pub payload: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    pub timestamp: u64,
    pub prevhash: Hash,
    #[serde(default)]
    pub services: Vec<ServiceParam>,
}

// Only the id matters here, the rest of the asset genesis is ignored
#[derive(Deserialize)]
struct AssetGenesis {
    id: Hash,
}

impl Genesis {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GenesisError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| GenesisError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let genesis = Self::parse(&content)?;
        debug!(
            "Loaded genesis {} with {} services",
            path.display(),
            genesis.services.len()
        );
        Ok(genesis)
    }

    pub fn parse(content: &str) -> Result<Self, GenesisError> {
        Ok(toml::from_str(content)?)
    }

    pub fn service(&self, name: &str) -> Option<&ServiceParam> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn service_payload<T: DeserializeOwned>(&self, name: &str) -> Result<T, GenesisError> {
        let service = self
            .service(name)
            .ok_or_else(|| GenesisError::MissingService(name.to_string()))?;

        serde_json::from_str(&service.payload).map_err(|source| GenesisError::Payload {
            service: name.to_string(),
            source,
        })
    }

    pub fn governance_info(&self) -> Result<GovernanceInfo, GenesisError> {
        self.service_payload::<GovernanceGenesis>(GOVERNANCE_SERVICE)
            .map(|genesis| genesis.info)
    }

    pub fn native_asset_id(&self) -> Result<Hash, GenesisError> {
        self.service_payload::<AssetGenesis>(ASSET_SERVICE)
            .map(|genesis| genesis.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NATIVE_ASSET_ID;

    const GENESIS: &str = r#"
timestamp = 0
prevhash = "0x44915be5b6c20b0678cf05fcddbbaa832e25d7e6ac538784cd5c24de00d47472"

[[services]]
name = "asset"
payload = '''
{
    "id": "0xf56924db538e77bb5951eb5ff0d02b88983c49c45eea30e8ae3e7234b311436c",
    "name": "HuobiToken",
    "symbol": "HT",
    "supply": 1000000000000000,
    "precision": 18,
    "issuers": [],
    "fee_account": "0xcff1002107105460941f797828f468667aa1a2db",
    "fee": 1,
    "admin": "0xcff1002107105460941f797828f468667aa1a2db",
    "relayable": true
}
'''

[[services]]
name = "governance"
payload = '''
{
    "info": {
        "admin": "0xcff1002107105460941f797828f468667aa1a2db",
        "tx_failure_fee": 10,
        "tx_floor_fee": 20,
        "profit_deduct_rate_per_million": 3,
        "tx_fee_discount": [
            {"threshold": 1000, "discount_percent": 90},
            {"threshold": 10000, "discount_percent": 70},
            {"threshold": 100000, "discount_percent": 50}
        ],
        "miner_benefit": 20
    },
    "tx_fee_inlet_address": "0x503492a9b8b4e4c2d8e37ba71c1d45c6aaa7e8c2",
    "miner_profit_outlet_address": "0x503492a9b8b4e4c2d8e37ba71c1d45c6aaa7e8c2",
    "miner_charge_map": []
}
'''

[[services]]
name = "kyc"
payload = "not json"
"#;

    #[test]
    fn test_parse_genesis() {
        let genesis = Genesis::parse(GENESIS).unwrap();
        assert_eq!(genesis.timestamp, 0);
        assert_eq!(genesis.services.len(), 3);
        assert_eq!(genesis.native_asset_id().unwrap(), NATIVE_ASSET_ID);

        let info = genesis.governance_info().unwrap();
        assert_eq!(info.tx_failure_fee, 10);
        assert_eq!(info.profit_deduct_rate_per_million, 3);
        assert_eq!(info.tx_fee_discount.len(), 3);
    }

    #[test]
    fn test_missing_and_invalid_services() {
        let genesis = Genesis::parse(GENESIS).unwrap();
        assert!(matches!(
            genesis.service_payload::<serde_json::Value>("riscv"),
            Err(GenesisError::MissingService(name)) if name == "riscv"
        ));
        assert!(matches!(
            genesis.service_payload::<serde_json::Value>("kyc"),
            Err(GenesisError::Payload { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Genesis::load("/definitely/not/here/genesis.toml").unwrap_err();
        assert!(matches!(err, GenesisError::Io { .. }));
    }
}
