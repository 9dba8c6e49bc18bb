//! Command builders for the OATH applet
//!
//! Each builder produces a [`Command`](oathcard_apdu_core::Command) for the
//! executor and knows how to interpret the payload of a successful response.

pub mod calculate;
pub use calculate::*;
pub mod select;
pub use select::*;

use oathcard_apdu_core::Command;

use crate::constants::{cla, ins};

/// GET-REMAINING, sent while the applet answers `61 xx`
pub const fn send_remaining() -> Command {
    Command::new_with_le(cla::ISO7816, ins::SEND_REMAINING, 0x00, 0x00, 0x00)
}
