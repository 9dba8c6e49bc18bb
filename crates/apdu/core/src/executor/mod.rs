//! Executor for APDU command execution
//!
//! The [`CardExecutor`] sits between callers and a [`CardTransport`] and hides
//! response fragmentation: while the card answers `61 xx` it keeps issuing the
//! configured continuation command and reassembles the pieces.

use bytes::{Bytes, BytesMut};
use core::fmt;
use tracing::{debug, instrument, trace, warn};

use crate::codec;
use crate::command::Command;
use crate::response::require_status;
use crate::response::status::{Status, StatusWord};
use crate::transport::CardTransport;
use crate::{Error, Result};

/// Default bound on continuation requests for a single command
pub const DEFAULT_MAX_CHAIN: usize = 64;

/// Configuration for response chaining
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainingConfig {
    /// Maximum number of continuation requests before the card is declared broken
    pub max_chain: usize,
    /// Command sent to fetch the next fragment while the card answers `61 xx`
    pub continuation: Command,
}

impl Default for ChainingConfig {
    fn default() -> Self {
        Self {
            max_chain: DEFAULT_MAX_CHAIN,
            // ISO 7816-4 GET RESPONSE
            continuation: Command::new_with_le(0x00, 0xC0, 0x00, 0x00, 0x00),
        }
    }
}

impl ChainingConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of continuation requests
    pub const fn with_max_chain(mut self, max_chain: usize) -> Self {
        self.max_chain = max_chain;
        self
    }

    /// Set the continuation command
    pub fn with_continuation(mut self, continuation: Command) -> Self {
        self.continuation = continuation;
        self
    }
}

/// Trait for APDU command execution
pub trait Executor: Send + Sync + fmt::Debug {
    /// Transmit an APDU command and return the complete response
    ///
    /// The returned buffer always ends with the final status word.
    #[instrument(level = "trace", skip(self, command), fields(executor = std::any::type_name::<Self>()))]
    fn transmit(&mut self, command: &[u8]) -> Result<Bytes> {
        trace!(command = %hex::encode(command), "Transmitting command");
        let response = self.do_transmit(command);
        match &response {
            Ok(bytes) => {
                trace!(response = %hex::encode(bytes), "Received response");
            }
            Err(err) => {
                debug!(error = %err, "Error during transmission");
            }
        }
        response
    }

    /// Internal implementation of transmit
    fn do_transmit(&mut self, command: &[u8]) -> Result<Bytes>;

    /// Serialize and transmit a command
    fn transmit_command(&mut self, command: &Command) -> Result<Bytes> {
        let bytes = command.to_bytes()?;
        self.transmit(&bytes)
    }

    /// Transmit a command and require the final status word to be `expected`
    fn transmit_checked(&mut self, command: &Command, expected: StatusWord) -> Result<Bytes> {
        require_status(self.transmit_command(command)?, expected)
    }
}

/// Card executor implementation that reassembles chained responses
#[derive(Debug)]
pub struct CardExecutor<T: CardTransport> {
    /// The transport used for communication
    transport: T,
    /// Chaining behaviour
    config: ChainingConfig,
}

impl<T: CardTransport> CardExecutor<T> {
    /// Create a new card executor with the given transport
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ChainingConfig::default())
    }

    /// Create a new card executor with a chaining configuration
    pub const fn with_config(transport: T, config: ChainingConfig) -> Self {
        Self { transport, config }
    }

    /// Get a reference to the underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Get the chaining configuration
    pub const fn config(&self) -> &ChainingConfig {
        &self.config
    }

    /// Take ownership of the transport and return it
    pub fn into_transport(self) -> T {
        self.transport
    }

    fn exchange(&mut self, command: &[u8]) -> Result<Bytes> {
        self.transport
            .transmit_raw(command)
            .map_err(|e| Error::Io(e.into()))
    }
}

impl<T: CardTransport> Executor for CardExecutor<T> {
    fn do_transmit(&mut self, command: &[u8]) -> Result<Bytes> {
        let mut response = self.exchange(command)?;
        let mut status = StatusWord::from(codec::status_bytes(&response)?);
        if !status.is_more_data_available() {
            return Ok(response);
        }

        let get_remaining = self.config.continuation.to_bytes()?;
        let mut accumulated = BytesMut::new();
        let mut chain_count = 0;

        while let Status::MoreData { remaining } = status.classify() {
            if chain_count >= self.config.max_chain {
                warn!(
                    limit = self.config.max_chain,
                    received = accumulated.len(),
                    "Card is still signalling more data, giving up"
                );
                return Err(Error::ChainingExceeded {
                    limit: self.config.max_chain,
                });
            }

            accumulated.extend_from_slice(codec::payload(&response)?);
            debug!(
                remaining,
                chain_count,
                received = accumulated.len(),
                "More data available, requesting next fragment"
            );

            response = self.exchange(&get_remaining)?;
            status = StatusWord::from(codec::status_bytes(&response)?);
            chain_count += 1;
        }

        // The final fragment keeps its status word
        accumulated.extend_from_slice(&response);
        debug!(
            fragments = chain_count + 1,
            total = accumulated.len(),
            "Reassembled chained response"
        );
        Ok(accumulated.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::status::common;
    use crate::transport::{MockTransport, TransportError};
    use hex_literal::hex;

    const GET_REMAINING: [u8; 5] = hex!("00A5000000");

    fn fragment(data: &[u8], status: [u8; 2]) -> Bytes {
        let mut buf = data.to_vec();
        buf.extend_from_slice(&status);
        Bytes::from(buf)
    }

    fn oath_chaining() -> ChainingConfig {
        ChainingConfig::new().with_continuation(Command::new_with_le(0x00, 0xA5, 0x00, 0x00, 0x00))
    }

    #[test]
    fn test_executor_basic_transmit() {
        let transport = MockTransport::with_response(Bytes::from_static(&[0x90, 0x00]));
        let mut executor = CardExecutor::new(transport);

        let response = executor.transmit(&[0x00, 0xA4, 0x04, 0x00]).unwrap();
        assert_eq!(response.as_ref(), &[0x90, 0x00]);
        assert_eq!(executor.transport().commands.len(), 1);
    }

    #[test]
    fn test_chained_response_is_reassembled() {
        let expected: Vec<u8> = (0..600u32).map(|i| (i % 251) as u8).collect();
        let transport = MockTransport::new([
            fragment(&expected[..253], [0x61, 0x00]),
            fragment(&expected[253..506], [0x61, 0x00]),
            fragment(&expected[506..], [0x90, 0x00]),
        ]);
        let mut executor = CardExecutor::with_config(transport, oath_chaining());

        let response = executor.transmit(&hex!("00A2000100")).unwrap();
        assert_eq!(response.len(), 602);
        assert_eq!(&response[..600], expected.as_slice());
        assert_eq!(&response[600..], &[0x90, 0x00]);

        let commands = &executor.transport().commands;
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[1].as_ref(), &GET_REMAINING);
        assert_eq!(commands[2].as_ref(), &GET_REMAINING);
    }

    #[test]
    fn test_final_failure_status_is_kept() {
        let transport = MockTransport::new([
            fragment(&[0x01, 0x02], [0x61, 0x04]),
            fragment(&[], [0x6A, 0x80]),
        ]);
        let mut executor = CardExecutor::with_config(transport, oath_chaining());

        let response = executor.transmit(&hex!("00A2000100")).unwrap();
        assert_eq!(response.as_ref(), &hex!("01026A80"));
    }

    #[test]
    fn test_endless_chaining_is_bounded() {
        let transport = MockTransport::with_response(fragment(&[0xAB; 16], [0x61, 0x00]));
        let mut executor = CardExecutor::with_config(transport, oath_chaining());

        let err = executor.transmit(&hex!("00A2000100")).unwrap_err();
        assert!(matches!(err, Error::ChainingExceeded { limit: DEFAULT_MAX_CHAIN }));
        // The original command plus one request per allowed continuation
        assert_eq!(executor.transport().commands.len(), DEFAULT_MAX_CHAIN + 1);
    }

    #[test]
    fn test_chain_limit_is_configurable() {
        let transport = MockTransport::with_response(fragment(&[], [0x61, 0x00]));
        let config = oath_chaining().with_max_chain(2);
        let mut executor = CardExecutor::with_config(transport, config);

        assert!(matches!(
            executor.transmit(&hex!("00A2000100")),
            Err(Error::ChainingExceeded { limit: 2 })
        ));
        assert_eq!(executor.transport().commands.len(), 3);
    }

    #[test]
    fn test_empty_response_is_truncated() {
        let transport = MockTransport::with_response(Bytes::new());
        let mut executor = CardExecutor::new(transport);

        assert!(matches!(
            executor.transmit(&hex!("00A4040000")),
            Err(Error::TruncatedApdu { len: 0 })
        ));
    }

    #[test]
    fn test_io_failure_mid_chain() {
        let transport = MockTransport::new([
            fragment(&[0x01], [0x61, 0x00]),
            fragment(&[0x02], [0x90, 0x00]),
        ])
        .failing_on(1);
        let mut executor = CardExecutor::with_config(transport, oath_chaining());

        assert!(matches!(
            executor.transmit(&hex!("00A2000100")),
            Err(Error::Io(TransportError::Transmission))
        ));
        // No retry of the consumed fragment
        assert_eq!(executor.transport().commands.len(), 2);
    }

    #[test]
    fn test_transmit_checked() {
        let transport = MockTransport::new([
            Bytes::from_static(&[0x90, 0x00]),
            Bytes::from_static(&[0x69, 0x85]),
        ]);
        let mut executor = CardExecutor::new(transport);
        let select = Command::new_with_data(0x00, 0xA4, 0x04, 0x00, hex!("A000000527210101").to_vec());

        assert!(executor.transmit_checked(&select, common::SUCCESS).is_ok());
        match executor.transmit_checked(&select, common::SUCCESS) {
            Err(Error::UnexpectedStatus { expected, actual }) => {
                assert_eq!(expected, common::SUCCESS);
                assert_eq!(actual, common::CONDITIONS_NOT_SATISFIED);
            }
            other => panic!("expected a status mismatch, got {other:?}"),
        }
    }
}
