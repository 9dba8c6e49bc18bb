//! Commands that talk to the OATH applet

use colored::Colorize;
use oathcard_apdu_core::{CardExecutor, CardSession, codec};
use oathcard_apdu_transport_pcsc::PcscTransport;
use oathcard_oath::{Clock, Error as OathError, FixedClock, OathApplication, OathConfig, SystemClock, compute_otp};
use std::error::Error;
use tracing::{debug, info};

/// Select the OATH applet and display its answer
pub(crate) fn select_command(mut transport: PcscTransport, config: &OathConfig) -> Result<(), Box<dyn Error>> {
    let session = CardSession::open(&mut transport)?;
    let mut app = OathApplication::new(CardExecutor::with_config(session, config.chaining()));

    let info = app.select(&config.select_command()).map_err(explain)?;

    info!("OATH applet selected successfully.");
    if info.is_empty() {
        println!("{}", "Applet selected".green());
    } else {
        println!("{} {}", "Applet selected:".green(), printable(&info));
    }

    Ok(())
}

/// Show text answers as text, anything else as hex
fn printable(data: &[u8]) -> String {
    if data.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        String::from_utf8_lossy(data).into_owned()
    } else {
        codec::encode_hex(data)
    }
}

/// Compute the code of credential `name`, now or at `time`
pub(crate) fn code_command(
    mut transport: PcscTransport,
    name: &str,
    time: Option<u64>,
    config: &OathConfig,
) -> Result<(), Box<dyn Error>> {
    let otp = match time {
        Some(secs) => {
            debug!(secs, "Using fixed time");
            compute(&mut transport, name, &FixedClock(secs), config)?
        }
        None => compute(&mut transport, name, &SystemClock, config)?,
    };

    println!("{}", otp.as_str().bold());
    Ok(())
}

fn compute(
    transport: &mut PcscTransport,
    name: &str,
    clock: &impl Clock,
    config: &OathConfig,
) -> Result<oathcard_oath::OtpCode, Box<dyn Error>> {
    compute_otp(transport, name, clock, config).map_err(explain)
}

/// Turn the common failure modes into a message a user can act on
fn explain(err: OathError) -> Box<dyn Error> {
    if err.is_applet_missing() {
        return format!("{err} (is the OATH applet installed on this card?)").into();
    }
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable() {
        assert_eq!(printable(b"Hello Fidesmo!"), "Hello Fidesmo!");
        assert_eq!(printable(&[0x79, 0x03, 0x01]), "790301");
    }
}
