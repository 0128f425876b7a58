/// Errors that can occur while building or decoding transaction records.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A key name was not exactly four characters long.
    #[error("key name must be exactly 4 characters, got {len}")]
    InvalidKeyLength { len: usize },

    /// A key name contained a non-printable or non-ASCII byte.
    #[error("key name byte {byte:#04x} is not printable ASCII")]
    InvalidKeyByte { byte: u8 },

    /// A value does not fit the record's payload area.
    #[error("value too large for payload area ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A value buffer is shorter than the width its encoding requires.
    #[error("value buffer too short ({len} bytes, need {need})")]
    ValueTooShort { len: usize, need: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
