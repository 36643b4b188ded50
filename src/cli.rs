// CLI definitions using clap

use clap::Parser;
use std::path::PathBuf;

use as111::Config;

#[derive(Parser)]
#[command(name = "as111")]
#[command(author, version, about = "Control client for AS111 Bluetooth audio docks")]
pub struct Cli {
    /// Bluetooth address of the dock (XX:XX:XX:XX:XX:XX)
    pub mac: Option<String>,

    /// Commands to run after connecting (vol <0-32>, mute, alarm-led <on|off>, info, json, debug, help)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub commands: Vec<String>,

    /// Config file path (default: ~/.config/as111/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print request/response flow and raw frames
    #[arg(long)]
    pub debug: bool,

    /// Show raw frames in hex instead of decimal
    #[arg(long)]
    pub hex: bool,

    /// Reject responses with a bad checksum
    #[arg(long)]
    pub validate_checksum: bool,

    /// RFCOMM channel
    #[arg(long)]
    pub channel: Option<u8>,

    /// Response timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

impl Cli {
    /// Apply command-line overrides on top of the config file
    pub fn apply(&self, config: &mut Config) {
        if let Some(channel) = self.channel {
            config.channel = channel;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        config.debug |= self.debug;
        config.hex_dump |= self.hex;
        config.validate_checksum |= self.validate_checksum;
    }
}
