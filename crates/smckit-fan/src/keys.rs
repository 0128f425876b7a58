//! The controller's fan key namespace.
//!
//! Fixed keys plus per-fan keys formed by substituting a single-digit fan
//! index into the second character (`F0Md`, `F1Md`, ...). Indexes above 9
//! cannot form a four-character name and are rejected.

use smckit_frame::KeyName;

use crate::error::{FanError, Result};

/// Number of fans in the system (one byte).
pub const FAN_COUNT: KeyName = KeyName::from_bytes(*b"FNum");

/// Global force/test flag. Must be 1 before manual fan writes are honored;
/// clearing it returns control to the automatic thermal manager.
pub const FAN_FORCE_TEST: KeyName = KeyName::from_bytes(*b"Ftst");

/// Largest fan index that still forms a four-character key.
pub const MAX_FAN_INDEX: u32 = 9;

/// Mode key value: the controller computes fan speeds itself.
pub const FAN_MODE_AUTO: u8 = 0;

/// Mode key value: the controller accepts externally supplied targets.
pub const FAN_MODE_MANUAL: u8 = 1;

/// The per-fan key families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanKey {
    /// Actual RPM (read-only).
    Actual,
    /// Target RPM.
    Target,
    /// Minimum RPM.
    Minimum,
    /// Maximum RPM.
    Maximum,
    /// Control mode (0 = auto, 1 = manual).
    Mode,
}

impl FanKey {
    const fn suffix(self) -> [u8; 2] {
        match self {
            FanKey::Actual => *b"Ac",
            FanKey::Target => *b"Tg",
            FanKey::Minimum => *b"Mn",
            FanKey::Maximum => *b"Mx",
            FanKey::Mode => *b"Md",
        }
    }
}

/// Format the key naming `kind` for the fan at `index`.
pub fn fan_key(kind: FanKey, index: u32) -> Result<KeyName> {
    if index > MAX_FAN_INDEX {
        return Err(FanError::FanIndexOutOfRange {
            index,
            max: MAX_FAN_INDEX,
        });
    }
    let [a, b] = kind.suffix();
    Ok(KeyName::from_bytes([b'F', b'0' + index as u8, a, b]))
}
