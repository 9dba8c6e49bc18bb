//! OATH one-time passwords from a smart card applet
//!
//! The shared secret never leaves the card: the host sends a time-derived
//! challenge and the applet answers with a truncated HMAC code that is rendered
//! here as a fixed-width decimal string.
//!
//! ```
//! use oathcard_apdu_core::CardTransport;
//! use oathcard_oath::{OathConfig, SystemClock, compute_otp};
//!
//! fn show_code(transport: &mut impl CardTransport, name: &str) -> oathcard_oath::Result<()> {
//!     let otp = compute_otp(transport, name, &SystemClock, &OathConfig::default())?;
//!     println!("{name}: {otp}");
//!     Ok(())
//! }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod application;
pub mod challenge;
pub mod code;
pub mod commands;
pub mod constants;
mod error;
pub mod tlv;

pub use application::{OathApplication, OathConfig, compute_otp};
pub use challenge::{Challenge, Clock, FixedClock, SystemClock};
pub use code::{OtpCode, TruncatedCode};
pub use commands::{CalculateCommand, SelectCommand};
pub use constants::OATH_AID;
pub use error::{Error, Result};
