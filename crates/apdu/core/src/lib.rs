//! Core traits and types for APDU (Application Protocol Data Unit) exchanges
//!
//! This crate provides the byte-level building blocks used to talk to a smart card
//! applet according to ISO/IEC 7816-4.
//!
//! ## Overview
//!
//! - [`codec`]: hex encoding and status/payload splitting of raw response buffers
//! - [`command`]: command APDUs (`CLA INS P1 P2 [Lc data] [Le]`)
//! - [`response`]: status words and the status contract ([`require_status`])
//! - [`transport`]: the [`CardTransport`] capability and the scoped [`CardSession`]
//! - [`executor`]: the [`CardExecutor`], which hides `61 xx` response chaining from callers
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

// Main modules
pub mod codec;
pub mod command;
pub mod executor;
pub mod response;
pub mod transport;

// Core error types
mod error;
pub use error::{Error, Result};

// Re-exports for common types
pub use command::Command;
pub use executor::{CardExecutor, ChainingConfig, Executor};
pub use response::status::{Status, StatusWord};
pub use response::require_status;
pub use transport::{CardSession, CardTransport, TransportError};

#[cfg(any(test, feature = "mock"))]
pub use transport::MockTransport;

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        Bytes, BytesMut, CardExecutor, CardSession, ChainingConfig, Command, Error,
        Result, Status, StatusWord, TransportError, codec, executor::Executor, require_status,
        response::status::common as status, transport::CardTransport,
    };
}
