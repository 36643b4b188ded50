//! AS111 Dock Control CLI
//!
//! A command-line client for AS111 Bluetooth audio docks.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use as111::{commands, parse_command_stream, Config};
use as111_transport::BdAddr;

// CLI definitions
mod cli;
use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(mac) = cli.mac.as_deref() else {
        print_usage();
        return ExitCode::FAILURE;
    };
    if mac == "help" {
        print_usage();
        return ExitCode::SUCCESS;
    }

    match run(&cli, mac) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, mac: &str) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)?;
    cli.apply(&mut config);

    // Validate everything before touching the dock
    let address: BdAddr = mac.parse()?;
    let stream = parse_command_stream(&cli.commands)?;
    config.debug |= stream.debug;

    init_logging(config.debug);
    debug!("config {:?} from {:?}", config, config_path);
    debug!("commands {:?}", stream.actions);

    commands::run_session(address, mac, &config, &stream.actions)
}

fn print_usage() {
    print!("{}", as111::USAGE);
}

/// Install the stderr subscriber; `RUST_LOG` wins over the debug flag
fn init_logging(debug: bool) {
    let default = if debug {
        "warn,as111=debug,as111_dock=debug,as111_transport=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
