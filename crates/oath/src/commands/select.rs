//! SELECT command
//!
//! Makes the OATH applet the target of subsequent commands. The applet answers
//! with version and identity information that the caller may ignore.

use bytes::{BufMut, Bytes, BytesMut};
use oathcard_apdu_core::Command;

use crate::constants::{FIDESMO_AID_PREFIX, FIDESMO_AID_SUFFIX, OATH_AID, cla, ins, select_p1};

/// AID of a Fidesmo cardlet: fixed prefix, application ID, fixed suffix
pub fn fidesmo_aid(app_id: &[u8]) -> Bytes {
    let mut aid = BytesMut::with_capacity(FIDESMO_AID_PREFIX.len() + app_id.len() + FIDESMO_AID_SUFFIX.len());
    aid.put_slice(FIDESMO_AID_PREFIX);
    aid.put_slice(app_id);
    aid.put_slice(FIDESMO_AID_SUFFIX);
    aid.freeze()
}

/// SELECT command by AID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectCommand {
    aid: Bytes,
}

impl SelectCommand {
    /// Select the applet with the given AID
    pub fn with_aid(aid: impl Into<Bytes>) -> Self {
        Self { aid: aid.into() }
    }

    /// Select the OATH applet
    pub const fn oath() -> Self {
        Self {
            aid: Bytes::from_static(OATH_AID),
        }
    }

    /// Select a cardlet delivered by Fidesmo from its application ID
    pub fn fidesmo(app_id: &[u8]) -> Self {
        Self {
            aid: fidesmo_aid(app_id),
        }
    }

    /// The AID being selected
    pub fn aid(&self) -> &[u8] {
        &self.aid
    }

    /// Build the command APDU: `00 A4 04 00 Lc AID`, without Le
    pub fn to_command(&self) -> Command {
        Command::new_with_data(cla::ISO7816, ins::SELECT, select_p1::BY_NAME, 0x00, self.aid.clone())
    }
}

impl Default for SelectCommand {
    fn default() -> Self {
        Self::oath()
    }
}

impl From<&SelectCommand> for Command {
    fn from(select: &SelectCommand) -> Self {
        select.to_command()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_select_oath() {
        let command = SelectCommand::oath().to_command();
        assert_eq!(
            command.to_bytes().unwrap().as_ref(),
            &hex!("00A4040008 A000000527210101")
        );
        assert!(command.le.is_none());
    }

    #[test]
    fn test_select_fidesmo_cardlet() {
        let select = SelectCommand::fidesmo(&hex!("C8739B19"));
        assert_eq!(select.aid(), &hex!("A00000061700 C8739B19 0101"));
        assert_eq!(
            select.to_command().to_bytes().unwrap().as_ref(),
            &hex!("00A404000C A00000061700C8739B190101")
        );
    }

    #[test]
    fn test_select_custom_aid() {
        let select = SelectCommand::with_aid(hex!("A0000005272101").to_vec());
        assert_eq!(select.aid(), &hex!("A0000005272101"));
        assert_eq!(
            Command::from(&select).to_bytes().unwrap().as_ref(),
            &hex!("00A4040007 A0000005272101")
        );
    }
}
