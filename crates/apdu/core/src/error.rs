//! Core error type for all APDU operations
//!
//! Every failure of an exchange is terminal for that exchange: nothing in this
//! crate retries, the first error is surfaced to the caller.

use crate::response::status::StatusWord;
use crate::transport::TransportError;

/// Result type for APDU operations
pub type Result<T> = core::result::Result<T, Error>;

/// Core error type that encompasses all possible errors in the crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transport failed to read or write
    #[error("I/O failure: {0}")]
    Io(#[from] TransportError),

    /// A response was too short to carry a status word
    #[error("Truncated APDU: {len} bytes, a status word needs 2")]
    TruncatedApdu {
        /// Length of the offending buffer
        len: usize,
    },

    /// The trailing status word did not match what the exchange requires
    #[error("Unexpected status: expected {expected}, got {actual}")]
    UnexpectedStatus {
        /// Status word that was required
        expected: StatusWord,
        /// Status word the card returned
        actual: StatusWord,
    },

    /// The card kept signalling `61 xx` past the configured limit
    #[error("Response chaining exceeded {limit} continuation requests")]
    ChainingExceeded {
        /// Maximum number of continuation requests that was configured
        limit: usize,
    },

    /// Input could not be decoded (odd-length hex, non-hex characters, ...)
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A command buffer was too short or its Lc did not match its length
    #[error("Invalid command length: {0}")]
    InvalidCommandLength(usize),
}

impl Error {
    /// Create a new status mismatch error
    pub const fn unexpected_status(expected: StatusWord, actual: StatusWord) -> Self {
        Self::UnexpectedStatus { expected, actual }
    }

    /// Get the status word the card returned, if this is a status mismatch
    pub const fn actual_status(&self) -> Option<StatusWord> {
        match self {
            Self::UnexpectedStatus { actual, .. } => Some(*actual),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_display() {
        let err = Error::unexpected_status(StatusWord::new(0x90, 0x00), StatusWord::new(0x69, 0x85));
        assert_eq!(
            err.to_string(),
            "Unexpected status: expected 9000, got 6985"
        );
        assert_eq!(err.actual_status(), Some(StatusWord::new(0x69, 0x85)));
    }

    #[test]
    fn test_transport_error_converts() {
        let err: Error = TransportError::Transmission.into();
        assert!(matches!(err, Error::Io(TransportError::Transmission)));
        assert_eq!(err.actual_status(), None);
    }
}
