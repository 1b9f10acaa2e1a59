//! Response shapes returned by the node's GraphQL API.
//!
//! Field names follow the GraphQL schema (camelCase); `Uint64` scalars go
//! through [`number::uint64`] so both hex strings and numbers are accepted.

pub mod number;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::{Address, Hash};

pub use number::{format_uint64, parse_uint64};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid service data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Service returned code {code}: {message}")]
    ServiceFailed { code: u64, message: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validator {
    pub address: Address,
    #[serde(with = "number::uint64")]
    pub propose_weight: u64,
    #[serde(with = "number::uint64")]
    pub vote_weight: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    pub chain_id: Hash,
    #[serde(with = "number::uint64")]
    pub height: u64,
    #[serde(with = "number::uint64")]
    pub exec_height: u64,
    pub prev_hash: Hash,
    #[serde(with = "number::uint64")]
    pub timestamp: u64,
    pub state_root: Hash,
    pub proposer: Address,
    #[serde(default)]
    pub validators: Vec<Validator>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub hash: Hash,
    #[serde(default)]
    pub ordered_tx_hashes: Vec<Hash>,
    pub header: BlockHeader,
}

impl Block {
    pub fn validator_addresses(&self) -> Vec<Address> {
        self.header
            .validators
            .iter()
            .map(|v| v.address.clone())
            .collect()
    }
}

/// Result of a service call, both for reads and inside receipts
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    #[serde(with = "number::uint64")]
    pub code: u64,
    #[serde(default)]
    pub succeed_data: String,
    #[serde(default)]
    pub error_message: String,
}

impl ServiceResponse {
    pub fn is_error(&self) -> bool {
        self.code != 0
    }

    /// Decode `succeedData`, failing when the call itself failed.
    /// An empty payload decodes as JSON `null` so unit results work.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if self.is_error() {
            return Err(ApiError::ServiceFailed {
                code: self.code,
                message: self.error_message.clone(),
            });
        }

        let data = if self.succeed_data.is_empty() {
            "null"
        } else {
            self.succeed_data.as_str()
        };
        Ok(serde_json::from_str(data)?)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub service_name: String,
    pub method: String,
    pub response: ServiceResponse,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub service: String,
    #[serde(default)]
    pub name: String,
    pub data: String,
}

impl Event {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_str(&self.data)?)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub state_root: Hash,
    #[serde(with = "number::uint64")]
    pub height: u64,
    pub tx_hash: Hash,
    #[serde(with = "number::uint64")]
    pub cycles_used: u64,
    #[serde(default)]
    pub events: Vec<Event>,
    pub response: ReceiptResponse,
}

impl Receipt {
    pub fn code(&self) -> u64 {
        self.response.response.code
    }

    pub fn service_response(&self) -> &ServiceResponse {
        &self.response.response
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        self.response.response.decode()
    }

    // Events are emitted in order, most writes emit exactly one
    pub fn first_event(&self) -> Option<&Event> {
        self.events.first()
    }
}

/// A committed transaction as returned by `getTransaction`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub chain_id: Hash,
    #[serde(with = "number::uint64")]
    pub cycles_limit: u64,
    #[serde(with = "number::uint64")]
    pub cycles_price: u64,
    pub nonce: Hash,
    #[serde(with = "number::uint64")]
    pub timeout: u64,
    pub sender: Address,
    pub service_name: String,
    pub method: String,
    pub payload: String,
    pub tx_hash: Hash,
    pub pubkey: String,
    pub signature: String,
}
