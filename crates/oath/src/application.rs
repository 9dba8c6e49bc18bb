//! OATH application on top of an executor
//!
//! [`OathApplication`] speaks the applet protocol over any [`Executor`];
//! [`compute_otp`] wires a transport, a clock and a configuration together for
//! the common case of computing one TOTP code.

use bytes::Bytes;
use oathcard_apdu_core::executor::DEFAULT_MAX_CHAIN;
use oathcard_apdu_core::response::status::common as status;
use oathcard_apdu_core::{CardExecutor, CardSession, CardTransport, ChainingConfig, Command, Executor, codec};
use tracing::{debug, instrument};

use crate::challenge::{Challenge, Clock};
use crate::code::{OtpCode, TruncatedCode};
use crate::commands::{CalculateCommand, SelectCommand, send_remaining};
use crate::constants::OATH_AID;
use crate::{Error, Result};

/// Settings for talking to the OATH applet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OathConfig {
    /// AID selected before calculating
    pub aid: Bytes,
    /// Maximum number of GET-REMAINING requests per command
    pub max_chain: usize,
}

impl Default for OathConfig {
    fn default() -> Self {
        Self {
            aid: Bytes::from_static(OATH_AID),
            max_chain: DEFAULT_MAX_CHAIN,
        }
    }
}

impl OathConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a different applet AID
    pub fn with_aid(mut self, aid: impl Into<Bytes>) -> Self {
        self.aid = aid.into();
        self
    }

    /// Set the bound on GET-REMAINING requests
    pub const fn with_max_chain(mut self, max_chain: usize) -> Self {
        self.max_chain = max_chain;
        self
    }

    /// Chaining configuration for the executor: GET-REMAINING as continuation
    pub fn chaining(&self) -> ChainingConfig {
        ChainingConfig::new()
            .with_max_chain(self.max_chain)
            .with_continuation(send_remaining())
    }

    /// SELECT command for the configured AID
    pub fn select_command(&self) -> SelectCommand {
        SelectCommand::with_aid(self.aid.clone())
    }
}

/// The OATH applet, reached through an executor
#[derive(Debug)]
pub struct OathApplication<E: Executor> {
    executor: E,
}

impl<E: Executor> OathApplication<E> {
    /// Create a new application over the given executor
    pub const fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Get a reference to the executor
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// Get a mutable reference to the executor
    pub const fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    /// Take ownership of the executor and return it
    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Select an applet, returning the data it answers with
    ///
    /// Any failure is reported as [`Error::Select`]; a status other than
    /// `90 00` usually means the applet is not installed.
    #[instrument(level = "debug", skip_all, fields(aid = %codec::encode_hex(select.aid())))]
    pub fn select(&mut self, select: &SelectCommand) -> Result<Bytes> {
        let info = self.exchange(&select.to_command()).map_err(Error::Select)?;
        debug!(info_len = info.len(), "Applet selected");
        Ok(info)
    }

    /// Select the OATH applet at its default AID
    pub fn select_oath(&mut self) -> Result<Bytes> {
        self.select(&SelectCommand::oath())
    }

    /// Calculate the truncated code of credential `name` for `challenge`
    pub fn calculate(&mut self, name: &str, challenge: Challenge) -> Result<TruncatedCode> {
        let command = CalculateCommand::new(name, challenge)?;
        self.calculate_command(&command)
    }

    /// Send a prepared CALCULATE command and parse the truncated code
    #[instrument(level = "debug", skip_all, fields(counter = command.challenge().counter()))]
    pub fn calculate_command(&mut self, command: &CalculateCommand) -> Result<TruncatedCode> {
        let payload = self.exchange(&command.to_command()?)?;
        let code = CalculateCommand::parse_response(&payload)?;
        debug!(digits = code.digits(), "Calculated truncated code");
        Ok(code)
    }

    /// Transmit a command, require `90 00` and strip the status word
    fn exchange(&mut self, command: &Command) -> oathcard_apdu_core::Result<Bytes> {
        let response = self.executor.transmit_checked(command, status::SUCCESS)?;
        let payload_len = codec::payload(&response)?.len();
        Ok(response.slice(..payload_len))
    }
}

/// Compute the current TOTP code of credential `name`
///
/// Connects `transport`, selects the applet, sends CALCULATE with the challenge
/// derived from `clock` and renders the truncated code. The card is released
/// before returning, whatever the outcome. No step is retried.
///
/// # Errors
/// - [`Error::InvalidName`] or [`Error::Clock`] before the card is touched
/// - [`Error::Select`] if the applet cannot be selected
/// - [`Error::Apdu`] for I/O, status, chaining and truncation failures of CALCULATE
/// - [`Error::UnexpectedTag`], [`Error::BufferUnderflow`] and
///   [`Error::InvalidDigitCount`] for a malformed CALCULATE response
#[instrument(level = "debug", skip_all, fields(name = %name))]
pub fn compute_otp<T: CardTransport>(
    transport: &mut T,
    name: &str,
    clock: &impl Clock,
    config: &OathConfig,
) -> Result<OtpCode> {
    let command = CalculateCommand::new(name, Challenge::now(clock)?)?;

    let session = CardSession::open(transport)?;
    let mut app = OathApplication::new(CardExecutor::with_config(session, config.chaining()));
    app.select(&config.select_command())?;
    let code = app.calculate_command(&command)?;

    Ok(code.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::FixedClock;
    use hex_literal::hex;
    use oathcard_apdu_core::MockTransport;

    #[test]
    fn test_config_defaults() {
        let config = OathConfig::default();
        assert_eq!(config.aid.as_ref(), &hex!("A000000527210101"));
        assert_eq!(config.max_chain, 64);

        let chaining = config.with_max_chain(3).chaining();
        assert_eq!(chaining.max_chain, 3);
        assert_eq!(chaining.continuation.to_bytes().unwrap().as_ref(), &hex!("00A5000000"));
    }

    #[test]
    fn test_select_returns_info() {
        let transport = MockTransport::new([Bytes::copy_from_slice(&hex!("7903010203 9000"))]);
        let mut app = OathApplication::new(CardExecutor::new(transport));

        let info = app.select_oath().unwrap();
        assert_eq!(info.as_ref(), &hex!("7903010203"));
        assert_eq!(
            app.executor().transport().commands[0].as_ref(),
            &hex!("00A4040008A000000527210101")
        );
    }

    #[test]
    fn test_calculate() {
        let transport = MockTransport::new([Bytes::copy_from_slice(&hex!("7605064C93CF18 9000"))]);
        let mut app = OathApplication::new(CardExecutor::new(transport));

        let code = app.calculate("x", Challenge::from_counter(1)).unwrap();
        assert_eq!(code.render().as_str(), "755224");
        assert_eq!(
            app.executor().transport().commands[0].as_ref(),
            &hex!("00A200010D 710178 74080000000000000001")
        );
    }

    #[test]
    fn test_compute_otp_releases_card() {
        let mut transport = MockTransport::new([
            Bytes::from_static(&[0x90, 0x00]),
            Bytes::copy_from_slice(&hex!("7605084C93CF18 9000")),
        ])
        .disconnected();

        let otp = compute_otp(&mut transport, "acct", &FixedClock(1_111_111_109), &OathConfig::default()).unwrap();
        assert_eq!(otp.as_str(), "84755224");
        assert_eq!(transport.connects, 1);
        assert_eq!(transport.closes, 1);
        // (1_111_111_109 + 10) / 30 = 37_037_037
        assert_eq!(&transport.commands[1][13..], &37_037_037u64.to_be_bytes());
    }

    #[test]
    fn test_invalid_name_never_touches_card() {
        let mut transport = MockTransport::with_success().disconnected();
        let err = compute_otp(&mut transport, "", &FixedClock(0), &OathConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidName(_)));
        assert_eq!(transport.connects, 0);
        assert!(transport.commands.is_empty());
    }
}
