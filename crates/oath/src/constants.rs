//! Constants of the OATH applet protocol

/// AID of the OATH applet
pub const OATH_AID: &[u8] = b"\xA0\x00\x00\x05\x27\x21\x01\x01";

/// Prefix of the AID of a cardlet delivered by Fidesmo
pub const FIDESMO_AID_PREFIX: &[u8] = b"\xA0\x00\x00\x06\x17\x00";

/// Suffix of the AID of a cardlet delivered by Fidesmo
pub const FIDESMO_AID_SUFFIX: &[u8] = b"\x01\x01";

/// Class bytes
pub mod cla {
    /// Interindustry class
    pub const ISO7816: u8 = 0x00;
}

/// Instruction bytes
pub mod ins {
    /// SELECT
    pub const SELECT: u8 = 0xA4;
    /// CALCULATE
    pub const CALCULATE: u8 = 0xA2;
    /// GET-REMAINING (send remaining response data)
    pub const SEND_REMAINING: u8 = 0xA5;
}

/// P1 values for SELECT
pub mod select_p1 {
    /// Select by DF name (AID)
    pub const BY_NAME: u8 = 0x04;
}

/// P2 values for CALCULATE
pub mod calculate_p2 {
    /// Ask for a truncated response
    pub const TRUNCATE: u8 = 0x01;
}

/// TLV tags
pub mod tags {
    /// Credential name
    pub const NAME: u8 = 0x71;
    /// Challenge (8 byte big-endian counter)
    pub const CHALLENGE: u8 = 0x74;
    /// Truncated response: digit count followed by the 4 byte dynamic code
    pub const TRUNCATED_RESPONSE: u8 = 0x76;
}

/// Length of a TOTP time step in seconds
pub const TIME_STEP: u64 = 30;

/// Seconds added to the clock before deriving the time step
pub const TIME_MARGIN: u64 = 10;

/// Length of the challenge value
pub const CHALLENGE_LEN: usize = 8;

/// Longest credential name a short CALCULATE command can carry
pub const MAX_NAME_LEN: usize = u8::MAX as usize - 2 - (2 + CHALLENGE_LEN);
