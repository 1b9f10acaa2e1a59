use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
    time::Duration,
};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use huobi_common::{
    config::{DEFAULT_CHAIN_ID, DEFAULT_CYCLES_LIMIT, DEFAULT_CYCLES_PRICE, DEFAULT_TIMEOUT_GAP},
    crypto::{CryptoError, Hash, KeyPair},
    genesis::{Genesis, GenesisError},
};

use crate::{
    client::{normalize_endpoint, ChainClient, ClientError, GraphQlClient, GraphQlClientConfig},
    fixtures::ADMIN_PRIVATE_KEY,
    transaction::{ServiceCaller, TxConfig},
};

/// Environment variables overriding the configuration
pub mod env {
    pub const CONFIG_FILE: &str = "E2E_CONFIG";
    pub const ENDPOINT: &str = "MUTA_ENDPOINT";
    pub const CHAIN_ID: &str = "MUTA_CHAIN_ID";
    pub const GENESIS: &str = "HUOBI_GENESIS";
    pub const CONTRACTS_DIR: &str = "HUOBI_CONTRACTS_DIR";
    pub const ADMIN_KEY: &str = "HUOBI_ADMIN_KEY";
}

/// Default values for configuration
pub mod defaults {
    pub const ENDPOINT: &str = "http://127.0.0.1:8000/graphql";
    pub const GENESIS_PATH: &str = "genesis.toml";
    pub const CONTRACTS_DIR: &str = "riscv_contracts";

    // Client defaults
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;
    pub const MAX_RETRIES: u32 = 3;
    pub const RETRY_DELAY_MS: u64 = 1000;

    // Receipt polling
    pub const RECEIPT_POLL_INTERVAL_MS: u64 = 500;
    pub const RECEIPT_TIMEOUT_SECS: u64 = 30;

    // Validation limits
    pub const MIN_TIMEOUT_SECS: u64 = 1;
    pub const MAX_TIMEOUT_SECS: u64 = 300;
    pub const MAX_RETRIES_LIMIT: u32 = 10;
    pub const MIN_RETRY_DELAY_MS: u64 = 100;
    pub const MAX_RETRY_DELAY_MS: u64 = 30000;
    pub const MIN_POLL_INTERVAL_MS: u64 = 10;
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid endpoint '{0}': must be a valid HTTP/HTTPS URL")]
    InvalidEndpoint(String),
    #[error("Invalid {field}: {value} - must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
    #[error("Invalid chain id '{value}': {source}")]
    InvalidChainId { value: String, source: CryptoError },
    #[error("Invalid admin private key: {0}")]
    InvalidAdminKey(CryptoError),
    #[error("Invalid value for {name}: '{value}'")]
    InvalidOverride { name: &'static str, value: String },
}

/// Settings shared by the live suites and the validator tool
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct E2eConfig {
    /// GraphQL endpoint of the node under test
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_chain_id")]
    pub chain_id: Hash,

    #[serde(default = "default_genesis_path")]
    pub genesis_path: PathBuf,

    /// Directory holding the prebuilt RISC-V test contracts
    #[serde(default = "default_contracts_dir")]
    pub contracts_dir: PathBuf,

    #[serde(default = "default_admin_private_key")]
    pub admin_private_key: String,

    #[serde(default = "default_cycles_limit")]
    pub cycles_limit: u64,

    #[serde(default = "default_cycles_price")]
    pub cycles_price: u64,

    #[serde(default = "default_timeout_gap")]
    pub timeout_gap: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,

    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,
}

// Default functions for serde
fn default_endpoint() -> String {
    defaults::ENDPOINT.to_string()
}
fn default_chain_id() -> Hash {
    DEFAULT_CHAIN_ID
}
fn default_genesis_path() -> PathBuf {
    PathBuf::from(defaults::GENESIS_PATH)
}
fn default_contracts_dir() -> PathBuf {
    PathBuf::from(defaults::CONTRACTS_DIR)
}
fn default_admin_private_key() -> String {
    ADMIN_PRIVATE_KEY.to_string()
}
fn default_cycles_limit() -> u64 {
    DEFAULT_CYCLES_LIMIT
}
fn default_cycles_price() -> u64 {
    DEFAULT_CYCLES_PRICE
}
fn default_timeout_gap() -> u64 {
    DEFAULT_TIMEOUT_GAP
}
fn default_request_timeout_secs() -> u64 {
    defaults::REQUEST_TIMEOUT_SECS
}
fn default_connection_timeout_secs() -> u64 {
    defaults::CONNECTION_TIMEOUT_SECS
}
fn default_max_retries() -> u32 {
    defaults::MAX_RETRIES
}
fn default_retry_delay_ms() -> u64 {
    defaults::RETRY_DELAY_MS
}
fn default_receipt_poll_interval_ms() -> u64 {
    defaults::RECEIPT_POLL_INTERVAL_MS
}
fn default_receipt_timeout_secs() -> u64 {
    defaults::RECEIPT_TIMEOUT_SECS
}

impl Default for E2eConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            chain_id: default_chain_id(),
            genesis_path: default_genesis_path(),
            contracts_dir: default_contracts_dir(),
            admin_private_key: default_admin_private_key(),
            cycles_limit: default_cycles_limit(),
            cycles_price: default_cycles_price(),
            timeout_gap: default_timeout_gap(),
            request_timeout_secs: default_request_timeout_secs(),
            connection_timeout_secs: default_connection_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
            receipt_timeout_secs: default_receipt_timeout_secs(),
        }
    }
}

fn check_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

impl E2eConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Loaded e2e config from {}", path.display());
        Ok(serde_json::from_str(&content)?)
    }

    /// Defaults, or the file named by `E2E_CONFIG`, then the environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` with variables read through `lookup`. The result is validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(env::CONFIG_FILE) {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(env::ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(chain_id) = lookup(env::CHAIN_ID) {
            self.chain_id = Hash::from_str(&chain_id)
                .map_err(|source| ConfigError::InvalidChainId { value: chain_id, source })?;
        }
        if let Some(genesis) = lookup(env::GENESIS) {
            self.genesis_path = PathBuf::from(genesis);
        }
        if let Some(dir) = lookup(env::CONTRACTS_DIR) {
            self.contracts_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup(env::ADMIN_KEY) {
            if key.trim().is_empty() {
                return Err(ConfigError::InvalidOverride {
                    name: env::ADMIN_KEY,
                    value: key,
                });
            }
            self.admin_private_key = key;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_endpoint(&self.endpoint)
            .map_err(|_| ConfigError::InvalidEndpoint(self.endpoint.clone()))?;

        check_range(
            "request_timeout_secs",
            self.request_timeout_secs,
            defaults::MIN_TIMEOUT_SECS,
            defaults::MAX_TIMEOUT_SECS,
        )?;
        check_range(
            "connection_timeout_secs",
            self.connection_timeout_secs,
            defaults::MIN_TIMEOUT_SECS,
            defaults::MAX_TIMEOUT_SECS,
        )?;
        check_range(
            "receipt_timeout_secs",
            self.receipt_timeout_secs,
            defaults::MIN_TIMEOUT_SECS,
            defaults::MAX_TIMEOUT_SECS,
        )?;
        check_range(
            "max_retries",
            self.max_retries as u64,
            0,
            defaults::MAX_RETRIES_LIMIT as u64,
        )?;
        check_range(
            "retry_delay_ms",
            self.retry_delay_ms,
            defaults::MIN_RETRY_DELAY_MS,
            defaults::MAX_RETRY_DELAY_MS,
        )?;
        check_range(
            "receipt_poll_interval_ms",
            self.receipt_poll_interval_ms,
            defaults::MIN_POLL_INTERVAL_MS,
            self.receipt_timeout_secs * 1000,
        )?;

        self.admin()?;
        Ok(())
    }

    pub fn tx_config(&self) -> TxConfig {
        TxConfig {
            chain_id: self.chain_id.clone(),
            cycles_limit: self.cycles_limit,
            cycles_price: self.cycles_price,
            timeout_gap: self.timeout_gap,
            receipt_poll_interval: Duration::from_millis(self.receipt_poll_interval_ms),
            receipt_timeout: Duration::from_secs(self.receipt_timeout_secs),
        }
    }

    pub fn client_config(&self) -> GraphQlClientConfig {
        GraphQlClientConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            connection_timeout: Duration::from_secs(self.connection_timeout_secs),
        }
    }

    pub fn admin(&self) -> Result<KeyPair, ConfigError> {
        KeyPair::from_private_key_hex(&self.admin_private_key).map_err(ConfigError::InvalidAdminKey)
    }

    pub fn genesis(&self) -> Result<Genesis, GenesisError> {
        Genesis::load(&self.genesis_path)
    }

    pub fn contract_path(&self, name: &str) -> PathBuf {
        self.contracts_dir.join(name)
    }

    pub fn connect(&self) -> Result<Arc<dyn ChainClient>, ClientError> {
        let client = GraphQlClient::with_config(&self.endpoint, self.client_config())?;
        info!("Using node {}", client.endpoint());
        Ok(Arc::new(client))
    }

    /// A caller on `client` signing with `account`
    pub fn caller(&self, client: Arc<dyn ChainClient>, account: KeyPair) -> ServiceCaller {
        ServiceCaller::new(client, account, self.tx_config())
    }
}
