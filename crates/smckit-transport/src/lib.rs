//! Kernel-call boundary for SMC-style management controllers.
//!
//! This is the lowest layer of smckit. It defines the [`SmcPort`] trait —
//! one blocking "send an 80-byte record, receive an 80-byte record" call —
//! and the transport error taxonomy. Everything else builds on top of it.
//!
//! Opening the underlying device (service enumeration, privilege checks)
//! is deliberately not part of this crate. Callers acquire a handle through
//! whatever platform mechanism applies and wrap it in an [`SmcPort`]
//! implementation; the protocol layers above never see anything else.

pub mod error;
pub mod port;

pub use error::{Result, TransportError};
pub use port::{RawKeyData, SmcPort, KEY_DATA_LEN, SMC_KERNEL_INDEX};
