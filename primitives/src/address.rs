//! Ethereum account address type with builtin EIP-55 checksum support.

#[cfg(feature = "rust_crypto")]
use k256::elliptic_curve::sec1::ToEncodedPoint;
#[cfg(feature = "rust_crypto")]
use k256::PublicKey;
#[cfg(feature = "rust_crypto")]
use k256::SecretKey;

use serde::Deserialize;
use serde::Serialize;

use sha3::Digest;
use sha3::Keccak256;

use crate::hex::FromEtherHex;
use crate::hex::ToEtherHex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("invalid address string length, {0}")]
    Length(String),

    #[error("eip-55 checksum mismatch, {0}")]
    Eip55(String),

    #[error("invalid private key, {0}")]
    PrivateKey(String),
}

/// Ethereum address: the low 20 bytes of `keccak256(uncompressed_pubkey[1..])`.
#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub fn zero_address() -> Address {
        Address([0; 20])
    }

    /// Derive the address paired with a 32-byte secp256k1 private key.
    ///
    /// This is the "addressOf" collaborator the keystore codec treats as an
    /// external interface: elliptic-curve math lives in [`k256`], not here.
    #[cfg(feature = "rust_crypto")]
    pub fn from_private_key(pk: &[u8]) -> Result<Self, AddressError> {
        let secret = SecretKey::from_be_bytes(pk)
            .map_err(|err| AddressError::PrivateKey(err.to_string()))?;

        Ok(secret.into())
    }

    /// Lowercase hex without the `0x` prefix, as stored in keystore JSON.
    pub fn to_lowercase_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_checksum_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = String::deserialize(deserializer)?;

        Address::from_checksum_string(&data).map_err(serde::de::Error::custom)
    }
}

/// EIP-55 checksum casing support.
pub trait Eip55: Sized {
    /// Convert address to an EIP-55 checksummed `0x` string.
    fn to_checksum_string(&self) -> String;

    /// Load address from string and make an EIP-55 checksum comparison.
    fn from_checksum_string(source: &str) -> Result<Self, AddressError>;

    /// Canonicalize any 40-hex-char address (with or without `0x`, any case)
    /// into its EIP-55 checksummed form, without validating input casing.
    fn canonicalize(source: &str) -> Result<Self, AddressError>;
}

impl Eip55 for Address {
    fn to_checksum_string(&self) -> String {
        let mut data = self.0.to_eth_hex();

        let digest: [u8; 32] = Keccak256::new()
            .chain_update(&data.as_bytes()[2..])
            .finalize()
            .into();

        let addr = unsafe { &mut data.as_bytes_mut()[2..] };

        for (i, byte) in addr.iter_mut().enumerate() {
            let nibble = 0xf & if i % 2 == 0 { digest[i / 2] >> 4 } else { digest[i / 2] };
            if nibble >= 8 {
                *byte = byte.to_ascii_uppercase();
            }
        }

        data
    }

    fn from_checksum_string(source: &str) -> Result<Self, AddressError> {
        let address = Self::canonicalize(source)?;

        let expected = address.to_checksum_string();

        if expected != source {
            return Err(AddressError::Eip55(source.to_owned()));
        }

        Ok(address)
    }

    fn canonicalize(source: &str) -> Result<Self, AddressError> {
        let buff = Vec::<u8>::from_eth_hex(source)
            .map_err(|_| AddressError::Length(source.to_owned()))?;

        if buff.len() != 20 {
            return Err(AddressError::Length(source.to_owned()));
        }

        Ok(Self(buff.try_into().unwrap()))
    }
}

#[cfg(feature = "rust_crypto")]
impl From<PublicKey> for Address {
    fn from(value: PublicKey) -> Self {
        let buff = value.to_encoded_point(false);

        let digest: [u8; 32] = Keccak256::new()
            .chain_update(&buff.as_bytes()[1..])
            .finalize()
            .into();

        Self(digest[12..].try_into().unwrap())
    }
}

#[cfg(feature = "rust_crypto")]
impl From<SecretKey> for Address {
    fn from(value: SecretKey) -> Self {
        let value = value.public_key();
        let buff = value.to_encoded_point(false);

        let digest: [u8; 32] = Keccak256::new()
            .chain_update(&buff.as_bytes()[1..])
            .finalize()
            .into();

        Self(digest[12..].try_into().unwrap())
    }
}
