//! End-to-end harness for Huobi chain services.
//!
//! Every suite follows the same pattern: compose a transaction, sign it,
//! submit it over GraphQL, poll its receipt and assert on the decoded result.

pub mod assertions;
pub mod client;
pub mod config;
pub mod fixtures;
pub mod helpers;
pub mod logger;
pub mod services;
pub mod transaction;
pub mod validators;

pub use client::{ChainClient, ClientError};
pub use config::E2eConfig;
pub use transaction::{CallError, ServiceCaller, TxConfig};
