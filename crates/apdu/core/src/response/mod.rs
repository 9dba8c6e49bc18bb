//! The status contract that gates every exchange
//!
//! A response APDU is accepted only when its trailing status word is the one the
//! exchange requires; see [`require_status`].

pub mod status;

use bytes::Bytes;
use tracing::{Level, debug, info, warn};

use crate::codec;
use crate::error::{Error, Result};
use status::StatusWord;

/// Check that the trailing status word of `apdu` equals `expected`
///
/// On a match the buffer is handed back untouched so checks compose with
/// the exchange that produced it.
///
/// # Errors
/// Returns [`Error::UnexpectedStatus`] carrying both status words on a
/// mismatch, or [`Error::TruncatedApdu`] if there is no status word at all.
pub fn require_status(apdu: Bytes, expected: StatusWord) -> Result<Bytes> {
    let actual = StatusWord::from(codec::status_bytes(&apdu)?);
    if actual == expected {
        Ok(apdu)
    } else {
        log_mismatch(expected, actual);
        Err(Error::unexpected_status(expected, actual))
    }
}

/// Log a failed status check at the level the returned status word warrants
fn log_mismatch(expected: StatusWord, actual: StatusWord) {
    let description = actual.description();
    let level = actual.tracing_level();
    if level == Level::DEBUG {
        debug!(%expected, %actual, description, "Status check failed");
    } else if level == Level::INFO {
        info!(%expected, %actual, description, "Status check failed");
    } else {
        warn!(%expected, %actual, description, "Status check failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_require_status_passes_through() {
        let apdu = Bytes::copy_from_slice(&hex!("76050612345678 9000"));
        let checked = require_status(apdu.clone(), status::common::SUCCESS).unwrap();
        assert_eq!(checked, apdu);
    }

    #[test]
    fn test_require_status_mismatch() {
        let apdu = Bytes::copy_from_slice(&hex!("6985"));
        match require_status(apdu, status::common::SUCCESS) {
            Err(Error::UnexpectedStatus { expected, actual }) => {
                assert_eq!(expected.to_string(), "9000");
                assert_eq!(actual.to_string(), "6985");
            }
            other => panic!("expected a status mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_require_status_mismatch_on_more_data() {
        // A chained response must be reassembled before it is checked
        let apdu = Bytes::copy_from_slice(&hex!("01026110"));
        let err = require_status(apdu, status::common::SUCCESS).unwrap_err();
        assert_eq!(err.actual_status(), Some(StatusWord::new(0x61, 0x10)));
    }

    #[test]
    fn test_require_status_rejects_truncated() {
        assert!(matches!(
            require_status(Bytes::new(), status::common::SUCCESS),
            Err(Error::TruncatedApdu { len: 0 })
        ));
    }
}
