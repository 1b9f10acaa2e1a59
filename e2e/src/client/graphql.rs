use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace, warn};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::time::sleep;
use url::Url;

use huobi_common::{
    api::{format_uint64, Block, Receipt, ServiceResponse, TransactionView},
    crypto::{encode_hex, Hash},
    transaction::{RawTransaction, SignedTransaction},
};

use super::{ChainClient, ClientError, ServiceQuery};

const GET_BLOCK: &str = r#"
query GetBlock($height: Uint64) {
  getBlock(height: $height) {
    hash
    orderedTxHashes
    header {
      chainId
      height
      execHeight
      prevHash
      timestamp
      stateRoot
      proposer
      validators { address proposeWeight voteWeight }
    }
  }
}"#;

const GET_TRANSACTION: &str = r#"
query GetTransaction($txHash: Hash!) {
  getTransaction(txHash: $txHash) {
    chainId
    cyclesLimit
    cyclesPrice
    nonce
    timeout
    sender
    serviceName
    method
    payload
    txHash
    pubkey
    signature
  }
}"#;

const GET_RECEIPT: &str = r#"
query GetReceipt($txHash: Hash!) {
  getReceipt(txHash: $txHash) {
    stateRoot
    height
    txHash
    cyclesUsed
    events { service name data }
    response {
      serviceName
      method
      response { code succeedData errorMessage }
    }
  }
}"#;

const QUERY_SERVICE: &str = r#"
query QueryService(
  $height: Uint64
  $cyclesLimit: Uint64
  $cyclesPrice: Uint64
  $caller: Address!
  $serviceName: String!
  $method: String!
  $payload: String!
) {
  queryService(
    height: $height
    cyclesLimit: $cyclesLimit
    cyclesPrice: $cyclesPrice
    caller: $caller
    serviceName: $serviceName
    method: $method
    payload: $payload
  ) {
    code
    succeedData
    errorMessage
  }
}"#;

const SEND_TRANSACTION: &str = r#"
mutation SendTransaction(
  $inputRaw: InputRawTransaction!
  $inputEncryption: InputTransactionEncryption!
) {
  sendTransaction(inputRaw: $inputRaw, inputEncryption: $inputEncryption)
}"#;

// Storage error the node reports for a receipt that does not exist yet
const MISSING_RECORD_MARKERS: [&str; 2] = ["GetNone", "not found"];

/// Retry and timeout settings of [`GraphQlClient`]
#[derive(Debug, Clone)]
pub struct GraphQlClientConfig {
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub connection_timeout: Duration,
}

impl Default for GraphQlClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            connection_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlErrorItem>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorItem {
    message: String,
}

/// Node client speaking the GraphQL API over HTTP
pub struct GraphQlClient {
    client: Client,
    endpoint: Url,
    config: GraphQlClientConfig,
}

/// Accept `host:port`, a bare base URL or a full GraphQL URL
pub fn normalize_endpoint(endpoint: &str) -> Result<Url, ClientError> {
    let with_scheme = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| ClientError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    if url.path() == "/" || url.path().is_empty() {
        url.set_path("graphql");
    }

    Ok(url)
}

impl GraphQlClient {
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        Self::with_config(endpoint, GraphQlClientConfig::default())
    }

    pub fn with_config(endpoint: &str, config: GraphQlClientConfig) -> Result<Self, ClientError> {
        let endpoint = normalize_endpoint(endpoint)?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connection_timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    // Returns the `data` object of the response, retrying transport failures
    async fn request(&self, operation: &str, query: &str, variables: Value) -> Result<Value, ClientError> {
        let request = GraphQlRequest { query, variables };
        debug!("GraphQL {} to {}", operation, self.endpoint);

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                warn!(
                    "Retrying {} against {} (attempt {}/{})",
                    operation, self.endpoint, attempt, self.config.max_retries
                );
                sleep(self.config.retry_delay).await;
            }

            match self.make_single_request(&request).await {
                Ok(data) => return Ok(data),
                Err(e) if !e.is_retryable() => {
                    debug!("Not retrying {}: {}", operation, e);
                    return Err(e);
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ClientError::Network("Unknown error during request".into())))
    }

    async fn make_single_request(&self, request: &GraphQlRequest<'_>) -> Result<Value, ClientError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout(self.config.request_timeout)
                } else if e.is_connect() {
                    ClientError::Connection(e.to_string())
                } else {
                    ClientError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        trace!("GraphQL response ({}): {}", status, body);

        // GraphQL errors may come with a non-2xx status, prefer them when present
        match serde_json::from_str::<GraphQlResponse>(&body) {
            Ok(parsed) if status.is_success() || !parsed.errors.is_empty() => into_data(parsed),
            _ if !status.is_success() => Err(ClientError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown error").to_string(),
            }),
            Ok(parsed) => into_data(parsed),
            Err(e) => Err(ClientError::InvalidResponse(format!(
                "Failed to parse JSON response: {}",
                e
            ))),
        }
    }
}

fn into_data(response: GraphQlResponse) -> Result<Value, ClientError> {
    if !response.errors.is_empty() {
        return Err(ClientError::GraphQl {
            messages: response.errors.into_iter().map(|e| e.message).collect(),
        });
    }

    response
        .data
        .ok_or_else(|| ClientError::InvalidResponse("No data in response".into()))
}

fn take_field<T: DeserializeOwned>(mut data: Value, name: &str) -> Result<T, ClientError> {
    let value = data.get_mut(name).map(Value::take).unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|e| ClientError::InvalidResponse(format!("Invalid '{}' field: {}", name, e)))
}

fn is_missing_record(err: &ClientError) -> bool {
    MISSING_RECORD_MARKERS
        .iter()
        .any(|marker| err.graphql_message_contains(marker))
}

pub(crate) fn input_raw(raw: &RawTransaction) -> Value {
    json!({
        "chainId": raw.chain_id.to_hex(),
        "cyclesLimit": format_uint64(raw.cycles_limit),
        "cyclesPrice": format_uint64(raw.cycles_price),
        "nonce": raw.nonce.to_hex(),
        "timeout": format_uint64(raw.timeout),
        "serviceName": raw.request.service_name,
        "method": raw.request.method,
        "payload": raw.request.payload,
        "sender": raw.sender.to_hex(),
    })
}

pub(crate) fn input_encryption(tx: &SignedTransaction) -> Value {
    json!({
        "txHash": tx.tx_hash.to_hex(),
        "pubkey": encode_hex(tx.encoded_pubkey()),
        "signature": encode_hex(tx.encoded_signature()),
    })
}

pub(crate) fn query_variables(query: &ServiceQuery) -> Value {
    json!({
        "height": query.height.map(format_uint64),
        "cyclesLimit": query.cycles_limit.map(format_uint64),
        "cyclesPrice": query.cycles_price.map(format_uint64),
        "caller": query.caller.to_hex(),
        "serviceName": query.service_name,
        "method": query.method,
        "payload": query.payload,
    })
}

#[async_trait]
impl ChainClient for GraphQlClient {
    async fn get_block(&self, height: Option<u64>) -> Result<Block, ClientError> {
        let variables = json!({ "height": height.map(format_uint64) });
        let data = self.request("getBlock", GET_BLOCK, variables).await?;
        take_field(data, "getBlock")
    }

    async fn get_transaction(&self, hash: &Hash) -> Result<TransactionView, ClientError> {
        let variables = json!({ "txHash": hash.to_hex() });
        let data = self
            .request("getTransaction", GET_TRANSACTION, variables)
            .await?;
        take_field(data, "getTransaction")
    }

    async fn get_receipt(&self, hash: &Hash) -> Result<Option<Receipt>, ClientError> {
        let variables = json!({ "txHash": hash.to_hex() });
        match self.request("getReceipt", GET_RECEIPT, variables).await {
            Ok(data) => take_field(data, "getReceipt"),
            Err(e) if is_missing_record(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn send_transaction(&self, tx: &SignedTransaction) -> Result<Hash, ClientError> {
        let variables = json!({
            "inputRaw": input_raw(&tx.raw),
            "inputEncryption": input_encryption(tx),
        });
        let data = self
            .request("sendTransaction", SEND_TRANSACTION, variables)
            .await?;
        take_field(data, "sendTransaction")
    }

    async fn query_service(&self, query: &ServiceQuery) -> Result<ServiceResponse, ClientError> {
        let data = self
            .request("queryService", QUERY_SERVICE, query_variables(query))
            .await?;
        take_field(data, "queryService")
    }
}
