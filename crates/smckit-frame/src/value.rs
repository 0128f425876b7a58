//! Float conversion for the controller's two known value encodings.
//!
//! Which encoding applies is decided by the key's reported data size:
//!
//! - size 4: an IEEE 754 single-precision float stored in native byte
//!   order (host and controller share byte order — no swap). Used by
//!   Apple Silicon era controllers (`flt ` type tag).
//! - any other size: a big-endian unsigned 16-bit fixed-point value with
//!   two fraction bits (`fpe2`), i.e. raw / 4.0. Used by older Intel era
//!   controllers for fan speeds.
//!
//! The 2-byte path quantizes to 1/4 units: encoding then decoding returns
//! the input rounded to the nearest quarter, a bounded error of at most
//! 0.125. That is inherent to the format, not a codec bug.
//!
//! The /4 scale is only verified for the fan-speed key family. Other
//! 2-byte keys on the controller may use different fixed-point layouts;
//! do not assume this codec applies to them without checking against
//! known-good values.

use crate::error::{FrameError, Result};

/// Decode a value payload into a float, using the width reported by the
/// key's metadata to pick the encoding.
pub fn decode_float(bytes: &[u8], size: u32) -> Result<f32> {
    if size == 4 {
        let raw: [u8; 4] = bytes
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or(FrameError::ValueTooShort {
                len: bytes.len(),
                need: 4,
            })?;
        Ok(f32::from_ne_bytes(raw))
    } else {
        let raw: [u8; 2] = bytes
            .get(..2)
            .and_then(|b| b.try_into().ok())
            .ok_or(FrameError::ValueTooShort {
                len: bytes.len(),
                need: 2,
            })?;
        Ok(f32::from(u16::from_be_bytes(raw)) / 4.0)
    }
}

/// Encode a float into value bytes, the exact inverse of [`decode_float`].
///
/// The 2-byte path rounds to the nearest 1/4 unit and saturates at the
/// `u16` range (negative and non-finite inputs encode as zero).
pub fn encode_float(value: f32, size: u32) -> Vec<u8> {
    if size == 4 {
        value.to_ne_bytes().to_vec()
    } else {
        let raw = (value * 4.0).round() as u16;
        raw.to_be_bytes().to_vec()
    }
}
