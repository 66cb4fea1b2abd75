//! Web3 Secret Storage keystore codec, extended with the `x-ethers`
//! encrypted-mnemonic section.

pub mod error;

mod account;
mod cipher;
mod document;
mod json_path;
mod kdf;
mod mac;
mod mnemonic;

pub mod decode;
pub mod encode;

pub use account::{Account, EncryptOptions, MnemonicInfo, PrivateKey};
pub use document::KeystoreDocument;
pub use error::KeystoreError;

/// Helper `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, KeystoreError>;
