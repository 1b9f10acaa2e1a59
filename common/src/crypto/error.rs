use thiserror::Error;

/// Errors that can occur while decoding keys, hashes and addresses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid hexadecimal string format
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Hex string exceeds maximum allowed length
    #[error("Hex string too long: {len} chars, maximum: {max} chars")]
    HexTooLong { len: usize, max: usize },

    /// Decoded value has the wrong size
    #[error("Invalid length: {len} bytes, expected: {expected} bytes")]
    InvalidLength { len: usize, expected: usize },

    /// Secret key is zero or not below the curve order
    #[error("Invalid secp256k1 secret key")]
    InvalidSecretKey,

    #[error("Invalid secp256k1 public key")]
    InvalidPublicKey,

    #[error("Invalid secp256k1 signature")]
    InvalidSignature,
}
