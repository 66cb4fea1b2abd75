//! Component H: pre-validates inputs, then runs C -> D -> E -> F in the
//! order needed to produce a document, emitting canonical lowercase-hex
//! JSON.

use rand::RngCore;
use uuid::Uuid;

use eth_keystore_primitives::Eip55;

use crate::account::{normalize_password, EncryptOptions, PrivateKey};
use crate::cipher::Aes128Ctr;
use crate::document::{CipherparamsJson, CryptoJson, KdfparamsJson, KeystoreDocument, XEthers};
use crate::error::{KeystoreError, Result};
use crate::{mac, mnemonic};

/// Encrypt `private_key` (and, optionally, the mnemonic phrase it was
/// derived from) into a Version-3 Web3 Secret Storage document.
///
/// `options.path` without `mnemonic_phrase` is rejected immediately, and a
/// `mnemonic_phrase` that doesn't derive `private_key` along `options.path`
/// is rejected before any KDF work runs.
pub fn encrypt<P: AsRef<[u8]>>(
    private_key: &PrivateKey,
    mnemonic_phrase: Option<&str>,
    password: P,
    options: &EncryptOptions,
) -> Result<String> {
    if options.path.is_some() && mnemonic_phrase.is_none() {
        return Err(KeystoreError::PathWithoutMnemonic);
    }

    if let Some(phrase) = mnemonic_phrase {
        let path = options.path.as_deref().unwrap_or(mnemonic::DEFAULT_PATH);
        mnemonic::verify_derivation(phrase, path, &private_key.0)?;
    }

    let address = private_key.address()?;
    let password = normalize_password(password);
    let mut rng = rand::rngs::OsRng;

    let salt = match &options.salt {
        Some(salt) => salt.clone(),
        None => {
            let mut salt = vec![0u8; 32];
            rng.fill_bytes(&mut salt);
            salt
        }
    };

    if options.scrypt_n == 0 || !options.scrypt_n.is_power_of_two() {
        return Err(KeystoreError::UnsupportedKdfNValue(options.scrypt_n as u64));
    }

    let log_n = options.scrypt_n.trailing_zeros() as u8;
    let scrypt_params = scrypt::Params::new(log_n, options.scrypt_r, options.scrypt_p)
        .map_err(|err| KeystoreError::Derivation(err.to_string()))?;

    let mut key = [0u8; 64];
    scrypt::scrypt(&password, &salt, &scrypt_params, &mut key)
        .map_err(|err| KeystoreError::Derivation(err.to_string()))?;

    let iv = match options.iv {
        Some(iv) => iv,
        None => {
            let mut iv = [0u8; 16];
            rng.fill_bytes(&mut iv);
            iv
        }
    };

    let mut ciphertext = private_key.0.to_vec();
    Aes128Ctr::new(&key[..16], &iv)?.apply_keystream(&mut ciphertext);

    let mac_bytes = mac::compute(&key[16..32], &ciphertext);

    let id = match options.uuid {
        Some(seed) => uuid::Builder::from_random_bytes(seed).into_uuid(),
        None => Uuid::new_v4(),
    };

    let x_ethers = match mnemonic_phrase {
        Some(phrase) => {
            let entropy = mnemonic::entropy_from_phrase(phrase)?;

            let mut mnemonic_counter = [0u8; 16];
            rng.fill_bytes(&mut mnemonic_counter);

            let mnemonic_ciphertext =
                mnemonic::crypt_entropy(&key[32..64], &mnemonic_counter, &entropy)?;

            Some(XEthers {
                version: "0.1".to_string(),
                client: Some(options.client.clone()),
                geth_filename: options.geth_filename.clone(),
                mnemonic_counter: mnemonic_counter.into(),
                mnemonic_ciphertext: mnemonic_ciphertext.into(),
                path: options.path.clone(),
            })
        }
        None => None,
    };

    let document = KeystoreDocument {
        address: Some(address.to_lowercase_hex()),
        crypto: CryptoJson {
            cipher: "aes-128-ctr".to_string(),
            cipherparams: CipherparamsJson { iv: iv.into() },
            ciphertext: ciphertext.into(),
            kdf: "scrypt".to_string(),
            kdfparams: KdfparamsJson::Scrypt {
                dklen: 32,
                n: options.scrypt_n,
                p: options.scrypt_p,
                r: options.scrypt_r,
                salt: salt.into(),
            },
            mac: mac_bytes.to_vec().into(),
        },
        id,
        version: 3,
        x_ethers,
    };

    Ok(serde_json::to_string(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decrypt;

    const HARDHAT_MNEMONIC: &str =
        "test test test test test test test test test test test junk";
    const HARDHAT_PATH: &str = "m/44'/60'/0'/0/0";
    const HARDHAT_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_roundtrip_without_mnemonic() {
        let private_key = PrivateKey::from_hex(HARDHAT_PRIVATE_KEY).unwrap();
        let json = encrypt(&private_key, None, "thebestrandompassword", &EncryptOptions::default()).unwrap();

        let account = decrypt(&json, "thebestrandompassword", |_| {}).unwrap();
        assert_eq!(account.private_key, private_key);
        assert!(account.mnemonic.is_none());
        assert_eq!(
            account.address.to_checksum_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_roundtrip_with_mnemonic_and_path() {
        let private_key = PrivateKey::from_hex(HARDHAT_PRIVATE_KEY).unwrap();
        let options = EncryptOptions {
            path: Some(HARDHAT_PATH.to_string()),
            scrypt_n: 1024,
            ..Default::default()
        };

        let json = encrypt(&private_key, Some(HARDHAT_MNEMONIC), "pw", &options).unwrap();

        let account = decrypt(&json, "pw", |_| {}).unwrap();
        let mnemonic = account.mnemonic.unwrap();
        assert_eq!(mnemonic.phrase, HARDHAT_MNEMONIC);
        assert_eq!(mnemonic.path.as_deref(), Some(HARDHAT_PATH));
    }

    #[test]
    fn test_path_without_mnemonic_rejected() {
        let private_key = PrivateKey::from_hex(HARDHAT_PRIVATE_KEY).unwrap();
        let options = EncryptOptions {
            path: Some(HARDHAT_PATH.to_string()),
            ..Default::default()
        };

        let err = encrypt(&private_key, None, "pw", &options).unwrap_err();
        assert!(matches!(err, KeystoreError::PathWithoutMnemonic));
    }

    #[test]
    fn test_mnemonic_path_mismatch_rejected_before_kdf() {
        let private_key = PrivateKey::from_hex(HARDHAT_PRIVATE_KEY).unwrap();
        let options = EncryptOptions {
            path: Some("m/44'/60'/0'/0/1".to_string()),
            ..Default::default()
        };

        let err = encrypt(&private_key, Some(HARDHAT_MNEMONIC), "pw", &options).unwrap_err();
        assert!(matches!(err, KeystoreError::MnemonicMismatch));
    }

    #[test]
    fn test_deterministic_with_fixed_randomness() {
        let private_key = PrivateKey::from_hex(HARDHAT_PRIVATE_KEY).unwrap();
        let options = EncryptOptions {
            iv: Some([0x11u8; 16]),
            salt: Some(vec![0x22u8; 32]),
            uuid: Some([0x33u8; 16]),
            scrypt_n: 1024,
            ..Default::default()
        };

        let a = encrypt(&private_key, None, "pw", &options).unwrap();
        let b = encrypt(&private_key, None, "pw", &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pbkdf2_self_generated_roundtrip() {
        use crate::document::{CipherparamsJson, CryptoJson, KdfparamsJson, KeystoreDocument};
        use hmac::Hmac;
        use sha2::Sha256;

        let private_key = PrivateKey::from_hex(HARDHAT_PRIVATE_KEY).unwrap();
        let salt = vec![0x55u8; 16];
        let iv = [0x44u8; 16];
        let c = 1024;

        let mut key = [0u8; 64];
        pbkdf2::pbkdf2::<Hmac<Sha256>>(b"pbkdf2pw", &salt, c, &mut key);

        let mut ciphertext = private_key.0.to_vec();
        Aes128Ctr::new(&key[..16], &iv).unwrap().apply_keystream(&mut ciphertext);
        let mac_bytes = mac::compute(&key[16..32], &ciphertext);

        let document = KeystoreDocument {
            address: None,
            crypto: CryptoJson {
                cipher: "aes-128-ctr".to_string(),
                cipherparams: CipherparamsJson { iv: iv.into() },
                ciphertext: ciphertext.into(),
                kdf: "pbkdf2".to_string(),
                kdfparams: KdfparamsJson::Pbkdf2 {
                    c,
                    dklen: 32,
                    prf: "hmac-sha256".to_string(),
                    salt: salt.into(),
                },
                mac: mac_bytes.to_vec().into(),
            },
            id: Uuid::new_v4(),
            version: 3,
            x_ethers: None,
        };

        let json = serde_json::to_string(&document).unwrap();
        let account = decrypt(&json, "pbkdf2pw", |_| {}).unwrap();
        assert_eq!(account.private_key, private_key);
    }
}
