//! Tests for the PcscTransport implementation
//!
//! These need a reader with a card and skip themselves otherwise.

mod common;

use oathcard_apdu_core::{CardSession, CardTransport};
use oathcard_apdu_transport_pcsc::{PcscConfig, PcscDeviceManager};

#[test]
fn test_transport_creation() {
    let manager = match PcscDeviceManager::new() {
        Ok(manager) => manager,
        Err(_) => {
            println!("Skipping test, PC/SC not available");
            return;
        }
    };

    match manager.list_readers() {
        Ok(readers) => {
            assert!(!readers.is_empty(), "Expected at least one reader");

            // A freshly opened transport does not touch the card yet
            let transport = manager
                .open_reader(readers[0].name(), PcscConfig::default())
                .unwrap();
            assert!(!transport.is_connected());
            assert_eq!(transport.reader_name(), readers[0].name());
        }
        Err(e) => {
            println!("Could not list readers: {:?}", e);
        }
    }
}

#[test]
fn test_transport_transmit() {
    let Some(mut transport) = common::get_test_transport() else {
        println!("Skipping test, no card available");
        return;
    };

    {
        let mut session = match CardSession::open(&mut transport) {
            Ok(session) => session,
            Err(e) => {
                println!("Could not connect (might be expected): {:?}", e);
                return;
            }
        };
        assert!(session.is_connected());

        // SELECT with empty AID works on most cards
        let select_cmd = [0x00, 0xA4, 0x04, 0x00, 0x00];
        match session.transmit_raw(&select_cmd) {
            Ok(response) => {
                // We should get at least a 2-byte status response
                assert!(response.len() >= 2, "Response too short");
                println!("Response: {}", hex::encode_upper(&response));
            }
            Err(e) => {
                println!("Transmit failed (might be expected): {:?}", e);
            }
        }
    }

    assert!(
        !transport.is_connected(),
        "Session should release the card when dropped"
    );
}
