//! Command-line interface for computing OATH codes on a smart card

use clap::{Parser, Subcommand};
use oathcard_apdu_core::{Bytes, codec};
use oathcard_apdu_core::executor::DEFAULT_MAX_CHAIN;
use oathcard_apdu_transport_pcsc::PcscDeviceManager;
use oathcard_oath::OathConfig;
use oathcard_oath::commands::fidesmo_aid;

mod commands;
mod utils;

use commands::*;
use utils::reader;

#[derive(Parser)]
#[command(version, about = "Compute OATH one-time passwords with a smart card")]
struct Cli {
    /// Optional reader name to use (will auto-detect if not specified)
    #[arg(short, long)]
    reader: Option<String>,

    /// Debug level output
    #[arg(short, long)]
    verbose: bool,

    /// AID of the OATH applet, as a hex string
    #[arg(long, default_value = "A000000527210101")]
    aid: String,

    /// Fidesmo application ID, as a hex string (selects A00000061700<ID>0101)
    #[arg(long, conflicts_with = "aid")]
    app_id: Option<String>,

    /// Maximum number of GET-REMAINING requests per command
    #[arg(long, default_value_t = DEFAULT_MAX_CHAIN)]
    max_chain: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available readers
    List,

    /// Select the OATH applet and show its answer
    Select,

    /// Compute the current code of a credential
    Code {
        /// Credential name, as stored on the card
        #[arg(required = true)]
        name: String,

        /// Unix time in seconds to compute the code for (defaults to now)
        #[arg(long)]
        time: Option<u64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    // Create a PC/SC device manager
    let manager = PcscDeviceManager::new()?;

    if let Commands::List = cli.command {
        reader::list_readers(&manager)?;
        return Ok(());
    }

    let aid: Bytes = match &cli.app_id {
        Some(app_id) => fidesmo_aid(&codec::decode_hex(app_id)?),
        None => codec::decode_hex(&cli.aid)?.into(),
    };
    let config = OathConfig::new()
        .with_aid(aid)
        .with_max_chain(cli.max_chain);
    let transport = reader::open_transport(&manager, cli.reader.as_deref())?;

    match &cli.command {
        Commands::List => unreachable!(), // Already handled above
        Commands::Select => select_command(transport, &config)?,
        Commands::Code { name, time } => code_command(transport, name, *time, &config)?,
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_code() {
        let cli = Cli::try_parse_from(["oathcard", "--max-chain", "8", "code", "issuer:account", "--time", "59"]).unwrap();
        assert_eq!(cli.max_chain, 8);
        assert_eq!(cli.aid, "A000000527210101");
        match cli.command {
            Commands::Code { name, time } => {
                assert_eq!(name, "issuer:account");
                assert_eq!(time, Some(59));
            }
            _ => panic!("expected the code command"),
        }
    }

    #[test]
    fn test_aid_and_app_id_conflict() {
        assert!(Cli::try_parse_from(["oathcard", "--aid", "A000000527210101", "--app-id", "C8739B19", "select"]).is_err());
        assert!(Cli::try_parse_from(["oathcard", "--app-id", "C8739B19", "select"]).is_ok());
    }
}
