use eth_keystore_primitives::{Address, FromEtherHex};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{KeystoreError, Result};

/// Normalize a password argument to its raw bytes. UTF-8 strings are taken
/// as their byte representation; byte slices pass through unchanged.
pub fn normalize_password<P: AsRef<[u8]>>(password: P) -> Vec<u8> {
    password.as_ref().to_vec()
}

/// 32-byte secp256k1 private key. Zeroized on drop; `Debug` never prints
/// the underlying bytes.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

impl PrivateKey {
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn from_hex<S: AsRef<str>>(source: S) -> Result<Self> {
        let buf = Vec::<u8>::from_eth_hex(source.as_ref())
            .map_err(|_| KeystoreError::InvalidHex(source.as_ref().to_owned()))?;

        let array: [u8; 32] = buf
            .try_into()
            .map_err(|v: Vec<u8>| KeystoreError::InvalidPrivateKey(format!("expected 32 bytes, found {}", v.len())))?;

        Ok(Self(array))
    }

    pub fn address(&self) -> Result<Address> {
        Address::from_private_key(&self.0)
            .map_err(|err| KeystoreError::InvalidPrivateKey(err.to_string()))
    }
}

/// The mnemonic half of an `Account`: the recovery phrase plus the raw
/// entropy it encodes. Both are zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MnemonicInfo {
    pub phrase: String,
    pub entropy: Vec<u8>,
    #[zeroize(skip)]
    pub path: Option<String>,
}

impl std::fmt::Debug for MnemonicInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MnemonicInfo")
            .field("phrase", &"..")
            .field("entropy", &"..")
            .field("path", &self.path)
            .finish()
    }
}

impl PartialEq for MnemonicInfo {
    fn eq(&self, other: &Self) -> bool {
        self.phrase == other.phrase && self.entropy == other.entropy && self.path == other.path
    }
}

/// A decoded or to-be-encoded keystore account.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub address: Address,
    pub private_key: PrivateKey,
    pub mnemonic: Option<MnemonicInfo>,
}

/// Knobs for `encode::encrypt`. Every field has a spec-mandated default;
/// callers only need to override what they care about (usually nothing).
///
/// There is deliberately no `entropy` field: the source format threads one
/// through unused, but giving it no effect here would be a trap for callers
/// who'd reasonably expect it to do something.
#[derive(Clone, Debug)]
pub struct EncryptOptions {
    /// Override the random IV (tests, determinism). 16 bytes.
    pub iv: Option<[u8; 16]>,
    /// Override the random KDF salt (tests, determinism).
    pub salt: Option<Vec<u8>>,
    /// Random seed for the document `id`, built into a UUIDv4 (tests,
    /// determinism). 16 bytes.
    pub uuid: Option<[u8; 16]>,
    /// `x-ethers.client` identifier string; only meaningful when a mnemonic
    /// is supplied.
    pub client: String,
    /// `x-ethers.gethFilename`; only meaningful when a mnemonic is supplied.
    pub geth_filename: Option<String>,
    /// BIP-44 derivation path recorded alongside the mnemonic. Supplying
    /// this without also supplying a mnemonic phrase is rejected with
    /// `PathWithoutMnemonic`.
    pub path: Option<String>,
    pub scrypt_n: u32,
    pub scrypt_r: u32,
    pub scrypt_p: u32,
}

impl Default for EncryptOptions {
    fn default() -> Self {
        Self {
            iv: None,
            salt: None,
            uuid: None,
            client: "eth-keystore-rs".to_string(),
            geth_filename: None,
            path: None,
            scrypt_n: 1 << 17,
            scrypt_r: 8,
            scrypt_p: 1,
        }
    }
}
