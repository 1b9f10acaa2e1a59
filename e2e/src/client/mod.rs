mod graphql;
pub mod mock;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use huobi_common::{
    api::{Block, Receipt, ServiceResponse, TransactionView},
    crypto::{Address, Hash},
    transaction::SignedTransaction,
};

pub use graphql::{normalize_endpoint, GraphQlClient, GraphQlClientConfig};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error {status}: {reason}")]
    Http { status: u16, reason: String },
    #[error("GraphQL error: {}", messages.join("; "))]
    GraphQl { messages: Vec<String> },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Receipt of {hash} not available after {waited:?}")]
    ReceiptTimeout { hash: Hash, waited: Duration },
}

impl ClientError {
    /// Transport failures are worth retrying, anything the node answered is not
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connection(_) | Self::Network(_) => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn graphql_message_contains(&self, needle: &str) -> bool {
        match self {
            Self::GraphQl { messages } => messages.iter().any(|m| m.contains(needle)),
            _ => false,
        }
    }
}

/// Arguments of a read-only service call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceQuery {
    pub service_name: String,
    pub method: String,
    pub payload: String,
    pub caller: Address,
    // Latest block when unset
    pub height: Option<u64>,
    pub cycles_limit: Option<u64>,
    pub cycles_price: Option<u64>,
}

impl ServiceQuery {
    pub fn new<S: Into<String>, M: Into<String>>(
        service_name: S,
        method: M,
        payload: String,
        caller: Address,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            method: method.into(),
            payload,
            caller,
            height: None,
            cycles_limit: None,
            cycles_price: None,
        }
    }

    pub fn at_height(mut self, height: u64) -> Self {
        self.height = Some(height);
        self
    }
}

/// Operations the suites need from a chain node.
///
/// Implemented over GraphQL for live nodes and by [`mock::MockChain`] for
/// exercising the harness without one.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Height of the latest committed block
    async fn get_latest_block_height(&self) -> Result<u64, ClientError> {
        Ok(self.get_block(None).await?.header.height)
    }

    /// Fetch a block, the latest one when `height` is `None`
    async fn get_block(&self, height: Option<u64>) -> Result<Block, ClientError>;

    async fn get_transaction(&self, hash: &Hash) -> Result<TransactionView, ClientError>;

    /// `Ok(None)` while the transaction is not executed yet
    async fn get_receipt(&self, hash: &Hash) -> Result<Option<Receipt>, ClientError>;

    /// Submit a signed transaction, returning the hash the node accepted
    async fn send_transaction(&self, tx: &SignedTransaction) -> Result<Hash, ClientError>;

    async fn query_service(&self, query: &ServiceQuery) -> Result<ServiceResponse, ClientError>;
}
