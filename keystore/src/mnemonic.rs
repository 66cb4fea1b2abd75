//! The `x-ethers` mnemonic sub-codec. BIP-32/39/44 math itself is an
//! out-of-scope collaborator here (consumed via the `bip39`/`bip32` crates);
//! this module only owns the second AES-CTR pass over the entropy bytes
//! and the cross-check that a decrypted mnemonic actually derives the
//! account's private key.

use std::str::FromStr;

use bip32::{DerivationPath, XPrv};
use bip39::Mnemonic;

use crate::cipher::Aes128Ctr;
use crate::error::{KeystoreError, Result};

/// The BIP-44 path every mnemonic is derived along when the document (or
/// the caller, on encode) doesn't name one explicitly.
pub const DEFAULT_PATH: &str = "m/44'/60'/0'/0/0";

/// Run the mnemonic entropy through AES-128-CTR under `key[32..64]`. The
/// same call encrypts (entropy -> ciphertext) and decrypts (ciphertext ->
/// entropy).
pub fn crypt_entropy(key_tail: &[u8], iv: &[u8], entropy: &[u8]) -> Result<Vec<u8>> {
    let mut buf = entropy.to_vec();
    Aes128Ctr::new(&key_tail[..16], iv)?.apply_keystream(&mut buf);
    Ok(buf)
}

pub fn phrase_from_entropy(entropy: &[u8]) -> Result<String> {
    let mnemonic = Mnemonic::from_entropy(entropy)
        .map_err(|err| KeystoreError::Derivation(err.to_string()))?;
    Ok(mnemonic.to_string())
}

pub fn entropy_from_phrase(phrase: &str) -> Result<Vec<u8>> {
    let mnemonic =
        Mnemonic::from_str(phrase).map_err(|err| KeystoreError::Derivation(err.to_string()))?;
    Ok(mnemonic.to_entropy())
}

/// Derive the 32-byte private key a mnemonic and derivation path produce.
pub fn derive_private_key(phrase: &str, path: &str) -> Result<[u8; 32]> {
    let mnemonic =
        Mnemonic::from_str(phrase).map_err(|err| KeystoreError::Derivation(err.to_string()))?;
    let seed = mnemonic.to_seed("");

    let derivation_path =
        DerivationPath::from_str(path).map_err(|err| KeystoreError::Derivation(err.to_string()))?;

    let xprv = XPrv::derive_from_path(seed, &derivation_path)
        .map_err(|err| KeystoreError::Derivation(err.to_string()))?;

    Ok(xprv.to_bytes())
}

/// Check that `phrase` derived along `path` yields `expected_private_key`.
pub fn verify_derivation(phrase: &str, path: &str, expected_private_key: &[u8; 32]) -> Result<()> {
    let derived = derive_private_key(phrase, path)?;

    if &derived == expected_private_key {
        Ok(())
    } else {
        Err(KeystoreError::MnemonicMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HARDHAT_MNEMONIC: &str =
        "test test test test test test test test test test test junk";
    const HARDHAT_PATH: &str = "m/44'/60'/0'/0/0";
    const HARDHAT_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_derive_hardhat_default_account() {
        let expected = hex::decode(HARDHAT_PRIVATE_KEY).unwrap();
        let derived = derive_private_key(HARDHAT_MNEMONIC, HARDHAT_PATH).unwrap();
        assert_eq!(derived.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_verify_derivation_rejects_wrong_path() {
        let expected = hex::decode(HARDHAT_PRIVATE_KEY).unwrap();
        let expected: [u8; 32] = expected.try_into().unwrap();
        let err = verify_derivation(HARDHAT_MNEMONIC, "m/44'/60'/0'/0/1", &expected).unwrap_err();
        assert!(matches!(err, KeystoreError::MnemonicMismatch));
    }

    #[test]
    fn test_entropy_phrase_roundtrip() {
        let entropy = [0x42u8; 16];
        let phrase = phrase_from_entropy(&entropy).unwrap();
        let recovered = entropy_from_phrase(&phrase).unwrap();
        assert_eq!(recovered, entropy);
    }

    #[test]
    fn test_crypt_entropy_roundtrip() {
        let key_tail = [0x01u8; 32];
        let iv = [0x02u8; 16];
        let entropy = [0x42u8; 16];

        let ciphertext = crypt_entropy(&key_tail, &iv, &entropy).unwrap();
        assert_ne!(ciphertext, entropy);

        let recovered = crypt_entropy(&key_tail, &iv, &ciphertext).unwrap();
        assert_eq!(recovered, entropy);
    }
}
