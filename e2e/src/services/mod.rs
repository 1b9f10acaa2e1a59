//! Typed wrappers over the chain's services.
//!
//! Each wrapper binds a [`ServiceCaller`] and exposes one method per service
//! method. Writes resolve to a [`WriteOutcome`], reads to a [`ReadOutcome`];
//! neither fails on a non-zero service code since the suites assert on it.

mod asset;
mod governance;
mod kyc;
mod metadata;
mod node_manager;
mod riscv;

use serde::{de::DeserializeOwned, Serialize};

use huobi_common::api::{Event, Receipt, ServiceResponse};

use crate::transaction::{CallError, ServiceCaller};

pub use asset::AssetService;
pub use governance::GovernanceService;
pub use kyc::KycService;
pub use metadata::MetadataService;
pub use node_manager::NodeManagerService;
pub use riscv::RiscvService;

/// Executed transaction with its decoded result
#[derive(Clone, Debug)]
pub struct WriteOutcome<T> {
    pub code: u64,
    pub cycles_used: u64,
    pub error_message: String,
    // Only decoded when the call succeeded
    pub data: Option<T>,
    pub events: Vec<Event>,
    pub receipt: Receipt,
}

impl<T: DeserializeOwned> WriteOutcome<T> {
    pub fn from_receipt(receipt: Receipt) -> Result<Self, CallError> {
        let response = receipt.service_response();
        let data = if response.is_error() {
            None
        } else {
            Some(response.decode()?)
        };

        Ok(Self {
            code: response.code,
            cycles_used: receipt.cycles_used,
            error_message: response.error_message.clone(),
            data,
            events: receipt.events.clone(),
            receipt,
        })
    }
}

impl<T> WriteOutcome<T> {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Decode the body of the event at `index`
    pub fn event<E: DeserializeOwned>(&self, index: usize) -> Result<E, CallError> {
        let event = self.events.get(index).ok_or(CallError::MissingEvent {
            index,
            count: self.events.len(),
        })?;
        Ok(event.decode()?)
    }
}

/// Answer of a read-only service call
#[derive(Clone, Debug)]
pub struct ReadOutcome<T> {
    pub code: u64,
    pub error_message: String,
    pub data: Option<T>,
    pub response: ServiceResponse,
}

impl<T: DeserializeOwned> ReadOutcome<T> {
    pub fn from_response(response: ServiceResponse) -> Result<Self, CallError> {
        let data = if response.is_error() {
            None
        } else {
            Some(response.decode()?)
        };

        Ok(Self {
            code: response.code,
            error_message: response.error_message.clone(),
            data,
            response,
        })
    }
}

impl<T> ReadOutcome<T> {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

pub(crate) async fn write<P, T>(
    caller: &ServiceCaller,
    service: &str,
    method: &str,
    payload: &P,
) -> Result<WriteOutcome<T>, CallError>
where
    P: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let receipt = caller.write(service, method, payload).await?;
    WriteOutcome::from_receipt(receipt)
}

pub(crate) async fn read<P, T>(
    caller: &ServiceCaller,
    service: &str,
    method: &str,
    payload: &P,
) -> Result<ReadOutcome<T>, CallError>
where
    P: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let response = caller.read(service, method, payload).await?;
    ReadOutcome::from_response(response)
}

pub(crate) async fn read_empty<T: DeserializeOwned>(
    caller: &ServiceCaller,
    service: &str,
    method: &str,
) -> Result<ReadOutcome<T>, CallError> {
    let response = caller.read_empty(service, method).await?;
    ReadOutcome::from_response(response)
}
