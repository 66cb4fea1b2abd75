//! KDF dispatch: scrypt and pbkdf2, both always producing 64 raw bytes
//! even though `kdfparams.dklen` only ever validates the 32-byte half the
//! Web3 Secret Storage format actually specifies. The upper 32 bytes feed
//! the `x-ethers` mnemonic cipher when present.

use hmac::Hmac;
use serde_json::Value;
use sha2::{Sha256, Sha512};

use eth_keystore_primitives::FromEtherHex;

use crate::error::{KeystoreError, Result};

pub const DERIVED_KEY_LEN: usize = 64;

fn get_str<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value.get(field).and_then(Value::as_str)
}

fn get_u32(value: &Value, field: &str) -> Option<u32> {
    value.get(field).and_then(Value::as_u64).map(|v| v as u32)
}

/// Derive a 64-byte key from `crypto.kdf`/`crypto.kdfparams`, reporting
/// coarse progress through `progress`. Neither RustCrypto KDF backend
/// exposes interior progress, so `progress` is invoked exactly twice: once
/// at `0.0` before starting and once at `1.0` after finishing.
pub fn derive_key(crypto: &Value, password: &[u8], mut progress: impl FnMut(f32)) -> Result<[u8; DERIVED_KEY_LEN]> {
    let kdf = get_str(crypto, "kdf").map(|s| s.to_ascii_lowercase());

    progress(0.0);

    let key = match kdf.as_deref() {
        Some("scrypt") => derive_scrypt(crypto, password)?,
        Some("pbkdf2") => derive_pbkdf2(crypto, password)?,
        other => return Err(KeystoreError::UnsupportedKdf(other.map(str::to_string))),
    };

    progress(1.0);

    Ok(key)
}

fn derive_scrypt(crypto: &Value, password: &[u8]) -> Result<[u8; DERIVED_KEY_LEN]> {
    let params = crypto.get("kdfparams").ok_or(KeystoreError::UnsupportedKdfParams)?;

    let salt = get_str(params, "salt").ok_or(KeystoreError::UnsupportedKdfParams)?;
    let salt = Vec::<u8>::from_eth_hex(salt).map_err(|_| KeystoreError::InvalidHex(salt.to_string()))?;

    let n = get_u32(params, "n").ok_or(KeystoreError::UnsupportedKdfParams)?;
    let r = get_u32(params, "r").ok_or(KeystoreError::UnsupportedKdfParams)?;
    let p = get_u32(params, "p").ok_or(KeystoreError::UnsupportedKdfParams)?;
    let dklen = get_u32(params, "dklen").ok_or(KeystoreError::UnsupportedKdfParams)?;

    if n == 0 || r == 0 || p == 0 {
        return Err(KeystoreError::UnsupportedKdfParams);
    }

    if !n.is_power_of_two() {
        return Err(KeystoreError::UnsupportedKdfNValue(n as u64));
    }

    if dklen != 32 {
        return Err(KeystoreError::UnsupportedDkLen(dklen as u64));
    }

    let log_n = n.trailing_zeros() as u8;
    let scrypt_params = scrypt::Params::new(log_n, r, p)
        .map_err(|err| KeystoreError::Derivation(err.to_string()))?;

    let mut key = [0u8; DERIVED_KEY_LEN];
    scrypt::scrypt(password, &salt, &scrypt_params, &mut key)
        .map_err(|err| KeystoreError::Derivation(err.to_string()))?;

    Ok(key)
}

fn derive_pbkdf2(crypto: &Value, password: &[u8]) -> Result<[u8; DERIVED_KEY_LEN]> {
    let params = crypto.get("kdfparams").ok_or(KeystoreError::UnsupportedKdfParams)?;

    let prf = get_str(params, "prf").ok_or(KeystoreError::UnsupportedKdfParams)?;

    if prf != "hmac-sha256" && prf != "hmac-sha512" {
        return Err(KeystoreError::UnsupportedPrf(prf.to_string()));
    }

    let salt = get_str(params, "salt").ok_or(KeystoreError::UnsupportedKdfParams)?;
    let salt = Vec::<u8>::from_eth_hex(salt).map_err(|_| KeystoreError::InvalidHex(salt.to_string()))?;

    let c = get_u32(params, "c").ok_or(KeystoreError::UnsupportedKdfParams)?;
    let dklen = get_u32(params, "dklen").ok_or(KeystoreError::UnsupportedKdfParams)?;

    if c == 0 {
        return Err(KeystoreError::UnsupportedKdfParams);
    }

    if dklen != 32 {
        return Err(KeystoreError::UnsupportedDkLen(dklen as u64));
    }

    let mut key = [0u8; DERIVED_KEY_LEN];
    match prf {
        "hmac-sha256" => pbkdf2::pbkdf2::<Hmac<Sha256>>(password, &salt, c, &mut key),
        "hmac-sha512" => pbkdf2::pbkdf2::<Hmac<Sha512>>(password, &salt, c, &mut key),
        _ => unreachable!("prf validated above"),
    }

    Ok(key)
}
