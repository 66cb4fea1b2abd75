//! Variable-length byte string with loose-hex JSON (de)serialization, used for
//! the `ciphertext`/`mac`/`salt`/`iv`/`mnemonicCiphertext` keystore fields.

use std::fmt::Display;

use crate::hex::{FromEtherHex, ToEtherHex};

use hex::FromHexError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BytesError {
    #[error("{0}")]
    FromHexError(#[from] FromHexError),

    #[error("expected {expected} bytes, found {found}")]
    Length { expected: usize, found: usize },
}

/// Owned byte string, serialized as a `0x`-prefixed hex string and
/// deserialized loosely (prefix optional, odd length left-padded).
#[derive(Debug, PartialEq, Eq, Clone, Hash, Default)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn into_fixed<const LEN: usize>(self) -> Result<[u8; LEN], BytesError> {
        let found = self.0.len();
        self.0
            .try_into()
            .map_err(|_| BytesError::Length { expected: LEN, found })
    }
}

impl Display for Bytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_eth_hex())
    }
}

impl TryFrom<&str> for Bytes {
    type Error = BytesError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Self(Vec::<u8>::from_eth_hex(value)?))
    }
}

impl Serialize for Bytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_eth_hex())
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = String::deserialize(deserializer)?;

        let buff = Vec::<u8>::from_eth_hex(data).map_err(serde::de::Error::custom)?;

        Ok(Self(buff))
    }
}

impl From<&[u8]> for Bytes {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl<const LEN: usize> From<&[u8; LEN]> for Bytes {
    fn from(value: &[u8; LEN]) -> Self {
        Self(value.to_vec())
    }
}

impl<const LEN: usize> From<[u8; LEN]> for Bytes {
    fn from(value: [u8; LEN]) -> Self {
        Self(value.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_hex_roundtrip() {
        let b = Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(b.to_string(), "0xdeadbeef");

        let parsed = Bytes::try_from("deadbeef").unwrap();
        assert_eq!(parsed, b);
    }

    #[test]
    fn test_into_fixed() {
        let b = Bytes::from(vec![1u8; 16]);
        let arr: [u8; 16] = b.into_fixed().unwrap();
        assert_eq!(arr, [1u8; 16]);

        let b = Bytes::from(vec![1u8; 15]);
        assert!(b.into_fixed::<16>().is_err());
    }
}
