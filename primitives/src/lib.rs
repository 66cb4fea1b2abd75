//! Byte, hex, and address primitives shared by the keystore codec.

mod bytes;
pub use self::bytes::*;

mod address;
pub use address::*;

mod hex;
pub use self::hex::*;
