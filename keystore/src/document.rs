//! Keystore JSON document shapes. Top-level `address`/`crypto`/`x-ethers`
//! casing is producer-dependent and handled by [`crate::json_path`] before
//! any of these types see the document; everything beneath a top-level key
//! uses fixed casing, matching every Web3 Secret Storage producer observed
//! in the wild.

use eth_keystore_primitives::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;
use crate::json_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub crypto: CryptoJson,
    pub id: Uuid,
    pub version: u8,
    #[serde(rename = "x-ethers", skip_serializing_if = "Option::is_none")]
    pub x_ethers: Option<XEthers>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoJson {
    pub cipher: String,
    pub cipherparams: CipherparamsJson,
    pub ciphertext: Bytes,
    pub kdf: String,
    pub kdfparams: KdfparamsJson,
    pub mac: Bytes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CipherparamsJson {
    pub iv: Bytes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KdfparamsJson {
    Scrypt {
        dklen: u32,
        n: u32,
        p: u32,
        r: u32,
        salt: Bytes,
    },
    Pbkdf2 {
        c: u32,
        dklen: u32,
        prf: String,
        salt: Bytes,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XEthers {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(rename = "gethFilename", default, skip_serializing_if = "Option::is_none")]
    pub geth_filename: Option<String>,
    #[serde(rename = "mnemonicCounter")]
    pub mnemonic_counter: Bytes,
    #[serde(rename = "mnemonicCiphertext")]
    pub mnemonic_ciphertext: Bytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Re-key a raw parsed document so every key [`KeystoreDocument`] expects
/// is present at its canonical lowercase spelling, resolving the
/// producer-dependent casing of `address`/`crypto`/`id`/`version`/`x-ethers`
/// via the case-insensitive path resolver. Fails on ambiguity, never on a
/// merely-missing key (`crypto` missing surfaces later as a KDF/cipher
/// error, which is more specific).
pub fn normalize_top_level(root: &Value) -> Result<Value> {
    let mut out = serde_json::Map::new();

    for key in ["address", "crypto", "id", "version", "x-ethers"] {
        if let Some(value) = json_path::resolve(root, key)? {
            out.insert(key.to_string(), value.clone());
        }
    }

    Ok(Value::Object(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_accepts_capitalized_crypto() {
        let raw = json!({"Crypto": {"cipher": "aes-128-ctr"}, "Id": "not-checked-here", "Version": 3});
        let normalized = normalize_top_level(&raw).unwrap();
        assert!(normalized.get("crypto").is_some());
    }

    #[test]
    fn test_normalize_rejects_ambiguous_crypto() {
        let raw = json!({"Crypto": {}, "crypto": {}});
        assert!(normalize_top_level(&raw).is_err());
    }
}
