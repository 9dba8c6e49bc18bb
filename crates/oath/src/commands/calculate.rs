//! CALCULATE command
//!
//! Asks the applet to compute the truncated code for a stored credential.
//! Data field: `71 <len> name 74 08 challenge`, P2 = 01 (truncate).

use bytes::{Bytes, BytesMut};
use oathcard_apdu_core::Command;

use crate::challenge::Challenge;
use crate::code::TruncatedCode;
use crate::constants::{MAX_NAME_LEN, calculate_p2, cla, ins, tags};
use crate::tlv;
use crate::{Error, Result};

/// CALCULATE command for a named credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculateCommand {
    name: Bytes,
    challenge: Challenge,
}

impl CalculateCommand {
    /// Create a CALCULATE command for the credential `name`
    ///
    /// The name is sent as UTF-8 and must be 1 to [`MAX_NAME_LEN`] bytes long.
    pub fn new(name: &str, challenge: Challenge) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::InvalidName("name is empty"));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(Error::InvalidName("name does not fit a short APDU"));
        }
        Ok(Self {
            name: Bytes::copy_from_slice(name.as_bytes()),
            challenge,
        })
    }

    /// The credential name as sent to the card
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// The challenge sent with the command
    pub const fn challenge(&self) -> Challenge {
        self.challenge
    }

    /// Build the data field
    pub fn data(&self) -> Result<Bytes> {
        let mut data = BytesMut::with_capacity(4 + self.name.len() + self.challenge.as_bytes().len());
        tlv::encode_block(&mut data, tags::NAME, &self.name)?;
        tlv::encode_block(&mut data, tags::CHALLENGE, self.challenge.as_bytes())?;
        Ok(data.freeze())
    }

    /// Build the command APDU: `00 A2 00 01 Lc data`, without Le
    pub fn to_command(&self) -> Result<Command> {
        Ok(Command::new_with_data(
            cla::ISO7816,
            ins::CALCULATE,
            0x00,
            calculate_p2::TRUNCATE,
            self.data()?,
        ))
    }

    /// Extract the truncated code from a successful response payload
    ///
    /// The payload must start with a truncated response block; anything after
    /// it is ignored.
    pub fn parse_response(payload: &[u8]) -> Result<TruncatedCode> {
        let value = tlv::parse_block(payload, 0, tags::TRUNCATED_RESPONSE)?;
        TruncatedCode::from_value(value)
    }
}
