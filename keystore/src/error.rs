use thiserror::Error;

/// Flat error taxonomy for the keystore codec. Every variant maps to one
/// spec-level failure mode; there is deliberately no catch-all `Other`
/// variant so callers can match exhaustively.
#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("input is not valid json: {0}")]
    BadJson(#[from] serde_json::Error),

    #[error("key '{0}' is ambiguous: multiple sibling keys differ only in case")]
    AmbiguousKey(String),

    #[error("unsupported kdf: {0:?}")]
    UnsupportedKdf(Option<String>),

    #[error("kdfparams missing required fields or a field is zero")]
    UnsupportedKdfParams,

    #[error("scrypt kdfparams.n={0} is not a power of two")]
    UnsupportedKdfNValue(u64),

    #[error("kdfparams.dklen={0}, expected 32")]
    UnsupportedDkLen(u64),

    #[error("unsupported pbkdf2 prf '{0}', expected hmac-sha256 or hmac-sha512")]
    UnsupportedPrf(String),

    #[error("unsupported cipher '{0}', expected aes-128-ctr")]
    UnsupportedCipher(String),

    #[error("invalid password")]
    InvalidPassword,

    #[error("decrypted address does not match the document's address field")]
    AddressMismatch,

    #[error("mnemonic does not derive the expected private key")]
    MnemonicMismatch,

    #[error("account address does not match the address derived from its private key")]
    AddressPrivateKeyMismatch,

    #[error("a derivation path was supplied without a mnemonic")]
    PathWithoutMnemonic,

    #[error("invalid iv: expected 16 bytes, found {0}")]
    InvalidIv(usize),

    #[error("invalid uuid: {0}")]
    InvalidUuid(String),

    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("hd wallet derivation failed: {0}")]
    Derivation(String),
}

pub type Result<T> = std::result::Result<T, KeystoreError>;
