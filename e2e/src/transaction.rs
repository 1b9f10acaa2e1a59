//! Transaction lifecycle: compose, sign, submit and wait for the receipt.

use std::{sync::Arc, time::Duration};

use log::{debug, trace};
use rand::RngCore;
use serde::Serialize;
use thiserror::Error;
use tokio::time::{sleep, Instant};

use huobi_common::{
    api::{ApiError, Receipt, ServiceResponse},
    config::{DEFAULT_CHAIN_ID, DEFAULT_CYCLES_LIMIT, DEFAULT_CYCLES_PRICE, DEFAULT_TIMEOUT_GAP},
    crypto::{Address, Hash, KeyPair, HASH_SIZE},
    transaction::{RawTransaction, SignedTransaction, TransactionError, TransactionRequest},
};

use crate::client::{ChainClient, ClientError, ServiceQuery};

/// Chain parameters stamped on composed transactions and receipt polling settings
#[derive(Clone, Debug)]
pub struct TxConfig {
    pub chain_id: Hash,
    pub cycles_limit: u64,
    pub cycles_price: u64,
    // Blocks after the latest height until the transaction expires
    pub timeout_gap: u64,
    pub receipt_poll_interval: Duration,
    pub receipt_timeout: Duration,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            cycles_limit: DEFAULT_CYCLES_LIMIT,
            cycles_price: DEFAULT_CYCLES_PRICE,
            timeout_gap: DEFAULT_TIMEOUT_GAP,
            receipt_poll_interval: Duration::from_millis(500),
            receipt_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Error, Debug)]
pub enum CallError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Receipt has no event {index}, it carries {count}")]
    MissingEvent { index: usize, count: usize },
}

pub fn random_nonce() -> Hash {
    let mut bytes = [0u8; HASH_SIZE];
    rand::thread_rng().fill_bytes(&mut bytes);
    Hash::new(bytes)
}

/// Build an unsigned transaction valid for `timeout_gap` blocks from now
pub async fn compose_transaction(
    client: &dyn ChainClient,
    config: &TxConfig,
    request: TransactionRequest,
    sender: Address,
) -> Result<RawTransaction, ClientError> {
    let height = client.get_latest_block_height().await?;

    Ok(RawTransaction {
        chain_id: config.chain_id.clone(),
        cycles_price: config.cycles_price,
        cycles_limit: config.cycles_limit,
        nonce: random_nonce(),
        request,
        timeout: height.saturating_add(config.timeout_gap),
        sender,
    })
}

/// Poll until the receipt of `hash` shows up or `receipt_timeout` elapses
pub async fn wait_for_receipt(
    client: &dyn ChainClient,
    hash: &Hash,
    config: &TxConfig,
) -> Result<Receipt, ClientError> {
    let started = Instant::now();
    loop {
        if let Some(receipt) = client.get_receipt(hash).await? {
            debug!(
                "Receipt of {} at height {}: code {}, cycles {}",
                hash,
                receipt.height,
                receipt.code(),
                receipt.cycles_used
            );
            return Ok(receipt);
        }

        let waited = started.elapsed();
        if waited >= config.receipt_timeout {
            return Err(ClientError::ReceiptTimeout {
                hash: hash.clone(),
                waited,
            });
        }

        trace!("Receipt of {} not ready yet", hash);
        sleep(config.receipt_poll_interval).await;
    }
}

/// An account bound to a client, issuing service calls on its behalf
#[derive(Clone)]
pub struct ServiceCaller {
    client: Arc<dyn ChainClient>,
    account: KeyPair,
    config: TxConfig,
}

impl ServiceCaller {
    pub fn new(client: Arc<dyn ChainClient>, account: KeyPair, config: TxConfig) -> Self {
        Self {
            client,
            account,
            config,
        }
    }

    /// Same client and settings, another signer
    pub fn with_account(&self, account: KeyPair) -> Self {
        Self {
            client: self.client.clone(),
            account,
            config: self.config.clone(),
        }
    }

    pub fn address(&self) -> &Address {
        self.account.address()
    }

    pub fn account(&self) -> &KeyPair {
        &self.account
    }

    pub fn client(&self) -> &dyn ChainClient {
        self.client.as_ref()
    }

    pub fn config(&self) -> &TxConfig {
        &self.config
    }

    pub async fn compose(
        &self,
        service: &str,
        method: &str,
        payload: String,
    ) -> Result<RawTransaction, CallError> {
        let request = TransactionRequest::new(service, method, payload);
        let raw = compose_transaction(
            self.client.as_ref(),
            &self.config,
            request,
            self.address().clone(),
        )
        .await?;
        Ok(raw)
    }

    /// Sign, send and wait for the receipt
    pub async fn submit(&self, raw: RawTransaction) -> Result<Receipt, CallError> {
        let signed: SignedTransaction = raw.sign(&self.account)?;
        debug!(
            "Sending {}.{} from {} as {}",
            signed.raw.request.service_name,
            signed.raw.request.method,
            self.address(),
            signed.tx_hash
        );

        let hash = self.client.send_transaction(&signed).await?;
        let receipt = wait_for_receipt(self.client.as_ref(), &hash, &self.config).await?;
        Ok(receipt)
    }

    pub async fn write<P: Serialize + ?Sized>(
        &self,
        service: &str,
        method: &str,
        payload: &P,
    ) -> Result<Receipt, CallError> {
        let payload = serde_json::to_string(payload)?;
        self.write_raw(service, method, payload, |_| {}).await
    }

    /// Write with a raw payload string, letting `adjust` edit the composed
    /// transaction (e.g. its cycles limit) before it is signed
    pub async fn write_raw<F>(
        &self,
        service: &str,
        method: &str,
        payload: String,
        adjust: F,
    ) -> Result<Receipt, CallError>
    where
        F: FnOnce(&mut RawTransaction),
    {
        let mut raw = self.compose(service, method, payload).await?;
        adjust(&mut raw);
        self.submit(raw).await
    }

    pub async fn read<P: Serialize + ?Sized>(
        &self,
        service: &str,
        method: &str,
        payload: &P,
    ) -> Result<ServiceResponse, CallError> {
        let payload = serde_json::to_string(payload)?;
        self.read_raw(service, method, payload).await
    }

    /// Read a method that takes no payload
    pub async fn read_empty(&self, service: &str, method: &str) -> Result<ServiceResponse, CallError> {
        self.read_raw(service, method, String::new()).await
    }

    pub async fn read_raw(
        &self,
        service: &str,
        method: &str,
        payload: String,
    ) -> Result<ServiceResponse, CallError> {
        let query = ServiceQuery::new(service, method, payload, self.address().clone());
        let response = self.client.query_service(&query).await?;
        trace!(
            "{}.{} answered code {}: {}",
            service,
            method,
            response.code,
            response.succeed_data
        );
        Ok(response)
    }
}
