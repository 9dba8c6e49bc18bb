//! Transport traits for APDU communication with cards
//!
//! A transport moves raw byte buffers to and from a card. It knows nothing about
//! command structure, status words or response chaining.

pub mod error;

use std::fmt;

use bytes::Bytes;
pub use error::TransportError;
use tracing::{debug, trace, warn};

/// Trait for basic card transports
///
/// The transport is half-duplex: a command must not be issued before the
/// response to the previous one has been received.
pub trait CardTransport: Send + Sync + fmt::Debug {
    /// Error type returned by the transport
    type Error: Into<TransportError> + fmt::Debug;

    /// Open the connection to the card
    fn connect(&mut self) -> Result<(), Self::Error>;

    /// Send raw APDU bytes to card and return response bytes
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
        trace!(command = %hex::encode(command), "Transmitting raw command");
        let result = self.do_transmit_raw(command);
        match &result {
            Ok(response) => {
                trace!(response = %hex::encode(response), "Received raw response");
            }
            Err(e) => {
                debug!(error = ?e, "Transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_raw
    /// This is the method that concrete implementations should override
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error>;

    /// Check if the transport is connected to a physical card
    fn is_connected(&self) -> bool;

    /// Release the connection to the card
    fn close(&mut self) -> Result<(), Self::Error>;
}

/// A connected card, released when dropped
///
/// Opening the session connects the underlying transport. Dropping it closes
/// the transport on every exit path, including early returns through `?`.
#[derive(Debug)]
pub struct CardSession<'a, T: CardTransport> {
    transport: &'a mut T,
}

impl<'a, T: CardTransport> CardSession<'a, T> {
    /// Connect the transport and start a session on it
    pub fn open(transport: &'a mut T) -> Result<Self, TransportError> {
        transport.connect().map_err(Into::into)?;
        debug!("Card session opened");
        Ok(Self { transport })
    }
}

impl<T: CardTransport> CardTransport for CardSession<'_, T> {
    type Error = TransportError;

    fn connect(&mut self) -> Result<(), Self::Error> {
        self.transport.connect().map_err(Into::into)
    }

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
        self.transport.do_transmit_raw(command).map_err(Into::into)
    }

    fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.transport.close().map_err(Into::into)
    }
}

impl<T: CardTransport> Drop for CardSession<'_, T> {
    fn drop(&mut self) {
        if !self.transport.is_connected() {
            return;
        }
        match self.transport.close() {
            Ok(()) => debug!("Card session closed"),
            Err(e) => warn!(error = ?e, "Failed to close card session"),
        }
    }
}

/// Scripted transport for tests
///
/// Responses are handed out in order; once a single response is left it is
/// repeated for every further command.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    /// Mock responses to return
    pub responses: std::collections::VecDeque<Bytes>,
    /// Commands that were sent
    pub commands: Vec<Bytes>,
    /// Whether the transport is connected
    pub connected: bool,
    /// Number of successful `connect` calls
    pub connects: usize,
    /// Number of `close` calls
    pub closes: usize,
    /// Index of the transmission that fails with an I/O error, if any
    pub fail_on: Option<usize>,
    /// Whether `close` reports a device error after releasing
    pub fail_close: bool,
}

#[cfg(any(test, feature = "mock"))]
impl MockTransport {
    /// Create a new mock transport with the given responses
    pub fn new<I, B>(responses: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            connected: true,
            ..Default::default()
        }
    }

    /// Create a new mock transport that always returns the given response
    pub fn with_response(response: impl Into<Bytes>) -> Self {
        let response: Bytes = response.into();
        Self::new([response])
    }

    /// Create a new mock transport that always returns success (90 00)
    pub fn with_success() -> Self {
        Self::with_response(Bytes::from_static(&[0x90, 0x00]))
    }

    /// Start disconnected, as a freshly discovered card would be
    pub const fn disconnected(mut self) -> Self {
        self.connected = false;
        self
    }

    /// Fail the transmission with the given index (0-based)
    pub const fn failing_on(mut self, index: usize) -> Self {
        self.fail_on = Some(index);
        self
    }

    /// Make every `close` report a device error
    pub const fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }
}

#[cfg(any(test, feature = "mock"))]
impl CardTransport for MockTransport {
    type Error = TransportError;

    fn connect(&mut self) -> Result<(), Self::Error> {
        self.connected = true;
        self.connects += 1;
        Ok(())
    }

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
        if !self.connected {
            return Err(TransportError::Connection);
        }

        let index = self.commands.len();
        self.commands.push(Bytes::copy_from_slice(command));

        if self.fail_on == Some(index) {
            return Err(TransportError::Transmission);
        }

        // Either repeat the last response or take the next one
        match self.responses.len() {
            0 => Err(TransportError::Transmission),
            1 => Ok(self.responses[0].clone()),
            _ => self.responses.pop_front().ok_or(TransportError::Transmission),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.connected = false;
        self.closes += 1;
        if self.fail_close {
            return Err(TransportError::Device);
        }
        Ok(())
    }
}
