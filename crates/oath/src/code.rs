//! Truncated codes returned by CALCULATE and their decimal rendering

use std::fmt;

use crate::{Error, Result};

/// 10^1 through 10^9, indexed by digit count minus one
const POWERS_OF_TEN: [u32; 9] = [
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

/// Digit count the card reports followed by the 4 byte dynamic code
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TruncatedCode {
    digits: u8,
    code: i32,
}

impl TruncatedCode {
    /// Create a truncated code, validating the digit count
    pub const fn new(digits: u8, code: i32) -> Result<Self> {
        if digits == 0 || digits as usize > POWERS_OF_TEN.len() {
            return Err(Error::InvalidDigitCount(digits));
        }
        Ok(Self { digits, code })
    }

    /// Parse the value of a truncated response block: `[digits][code; 4]`
    ///
    /// Trailing bytes are ignored.
    pub fn from_value(value: &[u8]) -> Result<Self> {
        let [digits, a, b, c, d, ..] = value else {
            return Err(Error::BufferUnderflow {
                needed: 5,
                available: value.len(),
            });
        };
        Self::new(*digits, i32::from_be_bytes([*a, *b, *c, *d]))
    }

    /// Number of decimal digits of the rendered code
    pub const fn digits(&self) -> u8 {
        self.digits
    }

    /// Dynamic code as sent by the card
    pub const fn raw(&self) -> i32 {
        self.code
    }

    /// `code mod 10^digits`, never negative
    pub const fn value(&self) -> u32 {
        let modulus = POWERS_OF_TEN[self.digits as usize - 1] as i64;
        (self.code as i64).rem_euclid(modulus) as u32
    }

    /// Render the code as exactly `digits` decimal characters, zero padded
    pub fn render(&self) -> OtpCode {
        OtpCode(format!("{:0width$}", self.value(), width = self.digits as usize))
    }
}

// The code is a live credential, keep it out of debug output
impl fmt::Debug for TruncatedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TruncatedCode")
            .field("digits", &self.digits)
            .finish_non_exhaustive()
    }
}

/// A rendered one-time password
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// The decimal digits
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the underlying string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OtpCode({} digits)", self.0.len())
    }
}

impl AsRef<str> for OtpCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<OtpCode> for String {
    fn from(otp: OtpCode) -> Self {
        otp.0
    }
}
