use colored::Colorize;
use oathcard_apdu_transport_pcsc::{PcscConfig, PcscDeviceManager, PcscTransport};
use tracing::info;

/// List all available readers
pub(crate) fn list_readers(manager: &PcscDeviceManager) -> Result<(), Box<dyn std::error::Error>> {
    let readers = manager.list_readers()?;

    if readers.is_empty() {
        println!("No readers found!");
        return Ok(());
    }

    println!("Available readers:");
    for (i, reader) in readers.iter().enumerate() {
        let status = if reader.has_card() {
            "card present".green()
        } else {
            "no card".yellow()
        };
        println!("{}. {} ({})", i + 1, reader.name(), status);
    }

    Ok(())
}

/// Open the named reader, or the first one holding a card
pub(crate) fn open_transport(
    manager: &PcscDeviceManager,
    reader_name: Option<&str>,
) -> Result<PcscTransport, Box<dyn std::error::Error>> {
    let reader = match reader_name {
        Some(name) => manager.find_reader_by_name(name)?,
        None => manager.find_reader_with_card()?,
    };

    info!("Using reader: {}", reader.name());
    Ok(manager.open_reader(reader.name(), PcscConfig::default())?)
}
