//! AES-128-CTR: the only cipher the Web3 Secret Storage format supports.
//! Grounded on the teacher's `Aes128Ctr` wrapper around `aes`+`ctr`.

use aes::{
    cipher::{InnerIvInit, KeyInit, StreamCipherCore},
    Aes128,
};

use crate::error::{KeystoreError, Result};

#[derive(Debug)]
pub struct Aes128Ctr {
    inner: ctr::CtrCore<Aes128, ctr::flavors::Ctr128BE>,
}

impl Aes128Ctr {
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self> {
        if iv.len() != 16 {
            return Err(KeystoreError::InvalidIv(iv.len()));
        }

        let cipher = Aes128::new_from_slice(key)
            .map_err(|err| KeystoreError::Derivation(err.to_string()))?;
        let inner = ctr::CtrCore::inner_iv_slice_init(cipher, iv)
            .map_err(|err| KeystoreError::Derivation(err.to_string()))?;

        Ok(Self { inner })
    }

    /// Apply the keystream in place. AES-CTR is length-preserving and
    /// symmetric: the same call encrypts and decrypts.
    pub fn apply_keystream(self, buf: &mut [u8]) {
        self.inner.apply_keystream_partial(buf.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let key = [0x11u8; 16];
        let iv = [0x22u8; 16];
        let mut buf = b"a secret message".to_vec();
        let original = buf.clone();

        Aes128Ctr::new(&key, &iv).unwrap().apply_keystream(&mut buf);
        assert_ne!(buf, original);

        Aes128Ctr::new(&key, &iv).unwrap().apply_keystream(&mut buf);
        assert_eq!(buf, original);
    }

    #[test]
    fn test_rejects_short_iv() {
        let err = Aes128Ctr::new(&[0u8; 16], &[0u8; 8]).unwrap_err();
        assert!(matches!(err, KeystoreError::InvalidIv(8)));
    }
}
