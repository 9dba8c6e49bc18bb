//! Common test utilities

use oathcard_apdu_transport_pcsc::{PcscConfig, PcscDeviceManager, PcscTransport};

/// Try to get a real transport for tests
///
/// Returns `None` when PC/SC is unavailable or no reader holds a card.
pub fn get_test_transport() -> Option<PcscTransport> {
    let manager = PcscDeviceManager::new().ok()?;
    let reader = manager.find_reader_with_card().ok()?;

    manager.open_reader(reader.name(), PcscConfig::default()).ok()
}
