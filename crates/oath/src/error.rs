//! Error types for OATH operations

use oathcard_apdu_core::{StatusWord, TransportError};

/// Result type for OATH operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for OATH operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// APDU-level failure (I/O, status word, chaining, truncated response)
    #[error(transparent)]
    Apdu(#[from] oathcard_apdu_core::Error),

    /// Selecting the OATH applet failed
    #[error("SELECT failed: {0}")]
    Select(#[source] oathcard_apdu_core::Error),

    /// A TLV block carried a different tag than the call site expects
    #[error("Unexpected tag: expected {expected:#04x}, got {actual:#04x}")]
    UnexpectedTag {
        /// Tag the call site expects
        expected: u8,
        /// Tag found in the buffer
        actual: u8,
    },

    /// A buffer ended before the data it declares
    #[error("Buffer underflow: needed {needed} bytes, {available} available")]
    BufferUnderflow {
        /// Bytes required from the read offset
        needed: usize,
        /// Bytes actually left from the read offset
        available: usize,
    },

    /// The card reported a digit count outside 1-9
    #[error("Invalid digit count: {0}, expected 1-9")]
    InvalidDigitCount(u8),

    /// The credential name cannot be sent to the card
    #[error("Invalid credential name: {0}")]
    InvalidName(&'static str),

    /// A TLV value does not fit a one byte length
    #[error("TLV value too long: {0} bytes")]
    ValueTooLong(usize),

    /// The clock reads a time before the Unix epoch
    #[error("System clock is set before the Unix epoch: {0}")]
    Clock(#[from] std::time::SystemTimeError),
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Self::Apdu(err.into())
    }
}

impl Error {
    /// Whether the OATH applet rejected SELECT, i.e. is most likely not installed
    pub const fn is_applet_missing(&self) -> bool {
        matches!(
            self,
            Self::Select(oathcard_apdu_core::Error::UnexpectedStatus { .. })
        )
    }

    /// Get the status word the card returned, if the failure was a status mismatch
    pub const fn status(&self) -> Option<StatusWord> {
        match self {
            Self::Apdu(e) | Self::Select(e) => e.actual_status(),
            _ => None,
        }
    }
}
