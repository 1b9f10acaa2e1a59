mod address;
mod hash;
mod key_pair;

pub mod error;

pub use address::*;
pub use error::CryptoError;
pub use hash::*;
pub use key_pair::*;

// Maximum accepted length for a hex string we decode (contract code excluded)
pub const MAX_HEX_INPUT_LEN: usize = 1024;

/// Decode a hex string with or without the `0x` prefix
pub fn decode_hex(value: &str) -> Result<Vec<u8>, CryptoError> {
    let stripped = strip_hex_prefix(value);
    hex::decode(stripped).map_err(|e| CryptoError::InvalidHex(e.to_string()))
}

/// Encode bytes as a lowercase hex string prefixed by `0x`
pub fn encode_hex<T: AsRef<[u8]>>(bytes: T) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

// Decode a fixed-size value, bounded to avoid decoding huge inputs
pub(crate) fn decode_fixed<const N: usize>(value: &str) -> Result<[u8; N], CryptoError> {
    if value.len() > MAX_HEX_INPUT_LEN {
        return Err(CryptoError::HexTooLong {
            len: value.len(),
            max: MAX_HEX_INPUT_LEN,
        });
    }

    let bytes = decode_hex(value)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidLength { len, expected: N })
}
