//! PC/SC transport implementation for APDU operations
//!
//! This crate provides an implementation of the `CardTransport` trait from
//! `oathcard-apdu-core` using the PC/SC API, so contact and contactless readers
//! attached to the host can be used as the card capability.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use oathcard_apdu_core::prelude::*;
//! use oathcard_apdu_transport_pcsc::{PcscConfig, PcscDeviceManager};
//!
//! let manager = PcscDeviceManager::new()?;
//! let reader = manager.find_reader_with_card()?;
//! let mut transport = manager.open_reader(reader.name(), PcscConfig::default())?;
//!
//! let session = CardSession::open(&mut transport)?;
//! let mut executor = CardExecutor::new(session);
//! let select = Command::new_with_data(0x00, 0xA4, 0x04, 0x00, codec::decode_hex("A000000527210101")?);
//! let response = executor.transmit_checked(&select, status::SUCCESS)?;
//! println!("Response: {}", codec::encode_hex(&response));
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

// Core modules
mod config;
mod error;
mod manager;
mod reader;
mod transport;

// Public exports
pub use config::{PcscConfig, ShareMode};
pub use error::PcscError;
pub use manager::PcscDeviceManager;
pub use reader::PcscReader;
pub use transport::PcscTransport;

// Re-export some pcsc types for convenience
pub use pcsc::Protocols;
