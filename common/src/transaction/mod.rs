use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    crypto::{keccak256, verify_signature, Address, CryptoError, Hash, KeyPair},
    serializer::{encode_bytes_list, RlpWriter},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Transaction sender {expected} does not match signer {found}")]
    SenderMismatch { expected: Address, found: Address },
    #[error("Transaction hash mismatch: expected {expected}, got {found}")]
    HashMismatch { expected: Hash, found: Hash },
    #[error("Invalid transaction signature")]
    InvalidSignature,
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Which service method a transaction calls, and with what JSON payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub service_name: String,
    pub method: String,
    pub payload: String,
}

impl TransactionRequest {
    pub fn new<S: Into<String>, M: Into<String>>(service_name: S, method: M, payload: String) -> Self {
        Self {
            service_name: service_name.into(),
            method: method.into(),
            payload,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTransaction {
    pub chain_id: Hash,
    pub cycles_price: u64,
    pub cycles_limit: u64,
    pub nonce: Hash,
    pub request: TransactionRequest,
    // Last block height at which the transaction may be committed
    pub timeout: u64,
    pub sender: Address,
}

impl RawTransaction {
    // Field order is part of the hash and must not change
    pub fn encode_fixed(&self) -> Vec<u8> {
        let mut writer = RlpWriter::new();
        writer
            .append_bytes(self.chain_id.as_bytes())
            .append_u64(self.cycles_limit)
            .append_u64(self.cycles_price)
            .append_bytes(self.nonce.as_bytes())
            .append_str(&self.request.method)
            .append_str(&self.request.service_name)
            .append_str(&self.request.payload)
            .append_u64(self.timeout)
            .append_bytes(self.sender.as_bytes());
        writer.finish()
    }

    pub fn hash(&self) -> Hash {
        keccak256(&self.encode_fixed())
    }

    pub fn sign(self, key_pair: &KeyPair) -> Result<SignedTransaction, TransactionError> {
        if &self.sender != key_pair.address() {
            return Err(TransactionError::SenderMismatch {
                expected: self.sender,
                found: key_pair.address().clone(),
            });
        }

        let tx_hash = self.hash();
        let signature = key_pair.sign(&tx_hash);

        Ok(SignedTransaction {
            raw: self,
            tx_hash,
            pubkey: key_pair.public_key().to_vec(),
            signature: signature.to_vec(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw: RawTransaction,
    pub tx_hash: Hash,
    pub pubkey: Vec<u8>,
    pub signature: Vec<u8>,
}

impl SignedTransaction {
    // The node accepts multi-signer envelopes: both fields are RLP lists
    pub fn encoded_pubkey(&self) -> Vec<u8> {
        encode_bytes_list(&[&self.pubkey])
    }

    pub fn encoded_signature(&self) -> Vec<u8> {
        encode_bytes_list(&[&self.signature])
    }

    pub fn verify(&self) -> Result<(), TransactionError> {
        let computed = self.raw.hash();
        if computed != self.tx_hash {
            return Err(TransactionError::HashMismatch {
                expected: computed,
                found: self.tx_hash.clone(),
            });
        }

        let signer = Address::from_public_key(&self.pubkey);
        if signer != self.raw.sender {
            return Err(TransactionError::SenderMismatch {
                expected: self.raw.sender.clone(),
                found: signer,
            });
        }

        if !verify_signature(&self.tx_hash, &self.signature, &self.pubkey)? {
            return Err(TransactionError::InvalidSignature);
        }

        Ok(())
    }
}
