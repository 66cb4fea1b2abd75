//! MAC engine: `keccak256(key[16..32] || ciphertext)`. A mismatch means
//! either a wrong password or a tampered ciphertext; the format gives no
//! way to tell the two apart, and neither does this module.

use sha3::{Digest, Keccak256};

use crate::error::{KeystoreError, Result};

pub fn compute(key_mid: &[u8], ciphertext: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(key_mid);
    hasher.update(ciphertext);
    hasher.finalize().into()
}

/// Constant-time comparison against the stored `mac` field. `InvalidPassword`
/// is the only failure this returns, deliberately conflating "wrong
/// password" with "tampered ciphertext" per the format's design.
pub fn verify(key_mid: &[u8], ciphertext: &[u8], expected: &[u8]) -> Result<()> {
    let actual = compute(key_mid, ciphertext);

    if actual.len() != expected.len() {
        return Err(KeystoreError::InvalidPassword);
    }

    let diff = actual
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b));

    if diff == 0 {
        Ok(())
    } else {
        Err(KeystoreError::InvalidPassword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_matches() {
        let mac = compute(b"0123456789abcdef", b"ciphertext");
        assert!(verify(b"0123456789abcdef", b"ciphertext", &mac).is_ok());
    }

    #[test]
    fn test_verify_rejects_tampered_ciphertext() {
        let mac = compute(b"0123456789abcdef", b"ciphertext");
        assert!(verify(b"0123456789abcdef", b"tampered!!", &mac).is_err());
    }
}
