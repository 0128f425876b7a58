//! Fixed-layout transaction record codec for SMC-style controllers.
//!
//! This is the core value-add layer of smckit. The controller's kernel
//! driver exchanges a single 80-byte record whose layout was reverse
//! engineered and must be reproduced byte for byte — including implicit
//! struct padding. Automatic struct layout is never good enough here: a
//! language that packs the nested key-info block differently shifts the
//! command byte and the driver silently ignores the request.
//!
//! The codec therefore writes and reads every field at an explicitly
//! documented offset ([`codec`]), with a layout-conformance test pinning
//! the whole record. [`key`] handles the four-character key names and
//! [`value`] the controller's two float encodings.

pub mod codec;
pub mod error;
pub mod key;
pub mod value;

pub use codec::{Command, KeyInfo, TransactionFrame, FRAME_SIZE, PAYLOAD_LEN};
pub use error::{FrameError, Result};
pub use key::KeyName;
pub use value::{decode_float, encode_float};
