// Serde helpers for the GraphQL `Uint64` scalar.
// The node renders it as a `0x`-prefixed hex string, but service JSON
// (metadata, balances) may carry plain numbers or decimal strings.

use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

/// Parse `0x`-hex or decimal text into a u64
pub fn parse_uint64(value: &str) -> Option<u64> {
    let value = value.trim();
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some("") => Some(0),
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

pub fn format_uint64(value: u64) -> String {
    format!("0x{:x}", value)
}

pub mod uint64 {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_uint64(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => parse_uint64(&s)
                .ok_or_else(|| SerdeError::custom(format!("invalid Uint64 value: {}", s))),
        }
    }
}

/// Same as [`uint64`] but serializes as a plain JSON number, the way service payloads expect
pub mod flexible_u64 {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        uint64::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Wire {
        #[serde(with = "uint64")]
        height: u64,
        #[serde(with = "flexible_u64")]
        interval: u64,
    }

    #[test]
    fn test_parse_uint64() {
        assert_eq!(parse_uint64("0x01"), Some(1));
        assert_eq!(parse_uint64("0xE8D4A51FFF"), Some(0xE8D4A51FFF));
        assert_eq!(parse_uint64("0x"), Some(0));
        assert_eq!(parse_uint64("666"), Some(666));
        assert_eq!(parse_uint64("0xzz"), None);
        assert_eq!(parse_uint64("-1"), None);
    }

    #[test]
    fn test_uint64_wire_format() {
        let wire = Wire {
            height: 255,
            interval: 666,
        };
        let json = serde_json::to_string(&wire).unwrap();
        assert_eq!(json, r#"{"height":"0xff","interval":666}"#);

        let back: Wire = serde_json::from_str(r#"{"height":255,"interval":"0x29a"}"#).unwrap();
        assert_eq!(back, wire);
        assert!(serde_json::from_str::<Wire>(r#"{"height":"abc","interval":1}"#).is_err());
    }
}
