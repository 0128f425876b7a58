use std::fmt;
use std::str::FromStr;

use crate::error::{FrameError, Result};

/// A four-character controller key name, e.g. `FNum` or `F0Md`.
///
/// On the wire the name is packed big-endian into a 32-bit code:
/// `key[0] << 24 | key[1] << 16 | key[2] << 8 | key[3]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyName([u8; 4]);

impl KeyName {
    /// Parse a key name, requiring exactly four printable ASCII characters.
    pub fn new(name: &str) -> Result<Self> {
        let bytes = name.as_bytes();
        let raw: [u8; 4] = bytes
            .try_into()
            .map_err(|_| FrameError::InvalidKeyLength { len: bytes.len() })?;
        for &byte in &raw {
            if !(0x20..=0x7e).contains(&byte) {
                return Err(FrameError::InvalidKeyByte { byte });
            }
        }
        Ok(Self(raw))
    }

    /// Build a key name from raw bytes without validation.
    ///
    /// Intended for well-known key constants; the bytes must be printable
    /// ASCII. Use [`KeyName::new`] for anything caller-supplied.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Unpack a key name from its 32-bit big-endian code.
    pub const fn from_code(code: u32) -> Self {
        Self(code.to_be_bytes())
    }

    /// The 32-bit big-endian packing of the name.
    pub const fn code(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// The four name bytes.
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl FromStr for KeyName {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            write!(f, "{}", byte as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyName(\"{self}\")")
    }
}
