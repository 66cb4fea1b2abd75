//! Component G: orchestrates B (path resolution) -> C (KDF) -> E (MAC) ->
//! D (cipher) -> F (mnemonic) into a single decode pipeline.

use eth_keystore_primitives::{Address, Eip55};
use serde_json::Value;

use crate::account::{normalize_password, Account, MnemonicInfo, PrivateKey};
use crate::cipher::Aes128Ctr;
use crate::document::{self, KeystoreDocument};
use crate::error::{KeystoreError, Result};
use crate::{kdf, mac, mnemonic};

/// Decrypt a Web3 Secret Storage document into an [`Account`].
///
/// `progress` is called with values in `[0.0, 1.0]` as the (potentially
/// slow) KDF runs; pass `|_| {}` to ignore it.
pub fn decrypt<P: AsRef<[u8]>>(
    json: &str,
    password: P,
    mut progress: impl FnMut(f32),
) -> Result<Account> {
    let root: Value = serde_json::from_str(json)?;
    let normalized = document::normalize_top_level(&root)?;

    let crypto_value = normalized.get("crypto").cloned().unwrap_or(Value::Null);

    let doc: KeystoreDocument = serde_json::from_value(normalized)?;

    let password = normalize_password(password);
    let key = kdf::derive_key(&crypto_value, &password, &mut progress)?;

    if !doc.crypto.cipher.eq_ignore_ascii_case("aes-128-ctr") {
        return Err(KeystoreError::UnsupportedCipher(doc.crypto.cipher.clone()));
    }

    mac::verify(&key[16..32], &doc.crypto.ciphertext.0, &doc.crypto.mac.0)?;

    let iv_len = doc.crypto.cipherparams.iv.0.len();
    let iv: [u8; 16] = doc
        .crypto
        .cipherparams
        .iv
        .clone()
        .into_fixed()
        .map_err(|_| KeystoreError::InvalidIv(iv_len))?;

    let mut plaintext = doc.crypto.ciphertext.0.clone();
    Aes128Ctr::new(&key[..16], &iv)?.apply_keystream(&mut plaintext);

    let pk_len = plaintext.len();
    let private_key = PrivateKey(
        plaintext
            .try_into()
            .map_err(|_| KeystoreError::InvalidPrivateKey(format!("expected 32 bytes, found {}", pk_len)))?,
    );

    let derived_address = private_key.address()?;

    if let Some(address_str) = &doc.address {
        let declared = Address::canonicalize(address_str)
            .map_err(|err| KeystoreError::InvalidHex(err.to_string()))?;

        if declared != derived_address {
            return Err(KeystoreError::AddressMismatch);
        }
    }

    let mnemonic_info = match &doc.x_ethers {
        Some(x) if x.version == "0.1" => {
            let counter_len = x.mnemonic_counter.0.len();
            let counter: [u8; 16] = x
                .mnemonic_counter
                .clone()
                .into_fixed()
                .map_err(|_| KeystoreError::InvalidIv(counter_len))?;

            let entropy = mnemonic::crypt_entropy(&key[32..64], &counter, &x.mnemonic_ciphertext.0)?;
            let phrase = mnemonic::phrase_from_entropy(&entropy)?;

            let path = x.path.as_deref().unwrap_or(mnemonic::DEFAULT_PATH);
            mnemonic::verify_derivation(&phrase, path, &private_key.0)?;

            Some(MnemonicInfo {
                phrase,
                entropy,
                path: x.path.clone(),
            })
        }
        // An `x-ethers` section at a version this crate doesn't understand
        // is treated the same as no `x-ethers` section at all.
        Some(_) => None,
        None => None,
    };

    Ok(Account {
        address: derived_address,
        private_key,
        mnemonic: mnemonic_info,
    })
}
