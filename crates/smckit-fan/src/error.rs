use std::time::Duration;

use smckit_frame::KeyName;

/// Errors that can occur in fan-control operations.
#[derive(Debug, thiserror::Error)]
pub enum FanError {
    /// The kernel call itself failed.
    #[error("transport error: {0}")]
    Transport(#[from] smckit_transport::TransportError),

    /// Record or value codec error.
    #[error("frame error: {0}")]
    Frame(#[from] smckit_frame::FrameError),

    /// The transport call succeeded but the controller refused the value.
    ///
    /// Distinct from a transport failure: the device was reachable and
    /// processed the request, it just rejected the write.
    #[error("controller rejected write to {key} (result {code:#04x})")]
    WriteRejected { key: KeyName, code: u8 },

    /// The unlock retry loop exhausted its attempt or time budget.
    #[error("fan control unlock timed out after {attempts} attempts ({elapsed:?})")]
    UnlockTimeout { attempts: u32, elapsed: Duration },

    /// A fan index that cannot be formatted into a four-character key.
    #[error("fan index {index} out of range (max {max})")]
    FanIndexOutOfRange { index: u32, max: u32 },
}

pub type Result<T> = std::result::Result<T, FanError>;
