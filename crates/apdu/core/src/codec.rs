//! Byte codec helpers shared by commands and responses
//!
//! A response APDU is an ordered byte buffer whose last two bytes are the status
//! word (SW1, SW2); everything before them is the payload.

use tracing::debug;

use crate::error::{Error, Result};

/// Encode bytes as an uppercase hex string, two digits per byte, no separators
///
/// Uppercase matches the way status words are rendered in diagnostics.
pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode_upper(bytes)
}

/// Decode a hex string (either case) into bytes
///
/// # Errors
/// Returns [`Error::MalformedInput`] if the input has an odd number of
/// characters or contains anything other than hex digits.
pub fn decode_hex(input: &str) -> Result<Vec<u8>> {
    hex::decode(input).map_err(|e| Error::MalformedInput(format!("{input:?}: {e}")))
}

/// Get the two trailing status bytes of a response buffer
///
/// # Errors
/// Returns [`Error::TruncatedApdu`] if the buffer is shorter than 2 bytes.
pub fn status_bytes(apdu: &[u8]) -> Result<[u8; 2]> {
    match apdu {
        [.., sw1, sw2] => Ok([*sw1, *sw2]),
        _ => {
            debug!("Response too short: {} bytes", apdu.len());
            Err(Error::TruncatedApdu { len: apdu.len() })
        }
    }
}

/// Get all bytes of a response buffer except the trailing status word
///
/// # Errors
/// Returns [`Error::TruncatedApdu`] if the buffer is shorter than 2 bytes.
pub fn payload(apdu: &[u8]) -> Result<&[u8]> {
    status_bytes(apdu)?;
    Ok(&apdu[..apdu.len() - 2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_hex_round_trip() {
        let samples: [&[u8]; 4] = [&[], &[0x00], &hex!("A0000005272101019000"), &[0xFF; 300]];
        for bytes in samples {
            assert_eq!(decode_hex(&encode_hex(bytes)).unwrap(), bytes);
        }
    }

    #[test]
    fn test_encode_hex_is_uppercase() {
        assert_eq!(encode_hex([0xc8u8, 0x73, 0x9b, 0x19]), "C8739B19");
        assert_eq!(encode_hex([0u8; 0]), "");
    }

    #[test]
    fn test_decode_hex_accepts_lowercase() {
        assert_eq!(decode_hex("a000000617").unwrap(), hex!("A000000617"));
    }

    #[test]
    fn test_decode_hex_malformed() {
        assert!(matches!(decode_hex("ABC"), Err(Error::MalformedInput(_))));
        assert!(matches!(decode_hex("ZZ"), Err(Error::MalformedInput(_))));
        assert!(matches!(decode_hex("90 00"), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_status_bytes_and_payload() {
        let data = hex!("0102039000");
        assert_eq!(status_bytes(&data).unwrap(), [0x90, 0x00]);
        assert_eq!(payload(&data).unwrap(), &[0x01, 0x02, 0x03]);

        let data = hex!("6A82");
        assert_eq!(status_bytes(&data).unwrap(), [0x6A, 0x82]);
        assert!(payload(&data).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_buffers() {
        assert!(matches!(
            status_bytes(&[]),
            Err(Error::TruncatedApdu { len: 0 })
        ));
        assert!(matches!(
            payload(&[0x90]),
            Err(Error::TruncatedApdu { len: 1 })
        ));
    }

}
