//! Recursive Length Prefix encoding
//!
//! The chain hashes raw transactions over their RLP encoding and ships the
//! signer's public key and signature as RLP lists. Only the subset needed for
//! that is implemented here: byte strings, unsigned integers and nested lists.
//!
//! ## Encoding rules
//! ```text
//! single byte < 0x80         -> the byte itself
//! string, len <= 55          -> 0x80 + len, bytes
//! string, len > 55           -> 0xb7 + len_of_len, len (BE), bytes
//! list payload, len <= 55    -> 0xc0 + len, payload
//! list payload, len > 55     -> 0xf7 + len_of_len, len (BE), payload
//! ```
//! Integers are encoded as their minimal big-endian bytes, zero being the
//! empty string.

use thiserror::Error;

const STRING_OFFSET: u8 = 0x80;
const LIST_OFFSET: u8 = 0xc0;
const SHORT_LIMIT: usize = 55;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RlpError {
    #[error("Unexpected end of input")]
    UnexpectedEnd,
    #[error("Expected a list")]
    ExpectedList,
    #[error("Expected a byte string")]
    ExpectedString,
    #[error("Trailing bytes after RLP item")]
    TrailingBytes,
    #[error("Length prefix too large")]
    LengthOverflow,
}

/// Accumulates the items of one RLP list
#[derive(Default, Debug, Clone)]
pub struct RlpWriter {
    payload: Vec<u8>,
}

impl RlpWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        encode_bytes(bytes, &mut self.payload);
        self
    }

    pub fn append_str(&mut self, value: &str) -> &mut Self {
        self.append_bytes(value.as_bytes())
    }

    pub fn append_u64(&mut self, value: u64) -> &mut Self {
        let bytes = value.to_be_bytes();
        let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        self.append_bytes(&bytes[first..])
    }

    pub fn append_list(&mut self, list: &RlpWriter) -> &mut Self {
        write_header(LIST_OFFSET, list.payload.len(), &mut self.payload);
        self.payload.extend_from_slice(&list.payload);
        self
    }

    /// Wrap the accumulated items into an RLP list
    pub fn finish(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.payload.len() + 9);
        write_header(LIST_OFFSET, self.payload.len(), &mut out);
        out.extend_from_slice(&self.payload);
        out
    }
}

pub fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    if bytes.len() == 1 && bytes[0] < STRING_OFFSET {
        out.push(bytes[0]);
        return;
    }

    write_header(STRING_OFFSET, bytes.len(), out);
    out.extend_from_slice(bytes);
}

/// Encode a list made of byte strings only
pub fn encode_bytes_list<T: AsRef<[u8]>>(items: &[T]) -> Vec<u8> {
    let mut writer = RlpWriter::new();
    for item in items {
        writer.append_bytes(item.as_ref());
    }
    writer.finish()
}

/// Decode a top-level list whose items are all byte strings
pub fn decode_bytes_list(input: &[u8]) -> Result<Vec<Vec<u8>>, RlpError> {
    let (is_list, payload, rest) = read_item(input)?;
    if !is_list {
        return Err(RlpError::ExpectedList);
    }
    if !rest.is_empty() {
        return Err(RlpError::TrailingBytes);
    }

    let mut items = Vec::new();
    let mut cursor = payload;
    while !cursor.is_empty() {
        let (is_list, item, rest) = read_item(cursor)?;
        if is_list {
            return Err(RlpError::ExpectedString);
        }
        items.push(item.to_vec());
        cursor = rest;
    }

    Ok(items)
}

fn write_header(offset: u8, len: usize, out: &mut Vec<u8>) {
    if len <= SHORT_LIMIT {
        out.push(offset + len as u8);
        return;
    }

    let len_bytes = (len as u64).to_be_bytes();
    let first = len_bytes.iter().position(|b| *b != 0).unwrap_or(len_bytes.len());
    let len_bytes = &len_bytes[first..];
    out.push(offset + SHORT_LIMIT as u8 + len_bytes.len() as u8);
    out.extend_from_slice(len_bytes);
}

// Returns (is_list, payload, remaining input)
fn read_item(input: &[u8]) -> Result<(bool, &[u8], &[u8]), RlpError> {
    let prefix = *input.first().ok_or(RlpError::UnexpectedEnd)?;

    let (is_list, header_len, payload_len) = match prefix {
        0x00..=0x7f => return Ok((false, &input[..1], &input[1..])),
        0x80..=0xb7 => (false, 1, (prefix - STRING_OFFSET) as usize),
        0xb8..=0xbf => {
            let len_of_len = (prefix - 0xb7) as usize;
            (false, 1 + len_of_len, read_length(&input[1..], len_of_len)?)
        }
        0xc0..=0xf7 => (true, 1, (prefix - LIST_OFFSET) as usize),
        0xf8..=0xff => {
            let len_of_len = (prefix - 0xf7) as usize;
            (true, 1 + len_of_len, read_length(&input[1..], len_of_len)?)
        }
    };

    let end = header_len
        .checked_add(payload_len)
        .ok_or(RlpError::LengthOverflow)?;
    if input.len() < end {
        return Err(RlpError::UnexpectedEnd);
    }

    Ok((is_list, &input[header_len..end], &input[end..]))
}

fn read_length(input: &[u8], len_of_len: usize) -> Result<usize, RlpError> {
    if len_of_len > std::mem::size_of::<usize>() {
        return Err(RlpError::LengthOverflow);
    }
    let bytes = input.get(..len_of_len).ok_or(RlpError::UnexpectedEnd)?;
    Ok(bytes.iter().fold(0usize, |acc, b| (acc << 8) | *b as usize))
}
