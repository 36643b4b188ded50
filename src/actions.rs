//! Command stream parsing
//!
//! Everything after the dock address on the command line is a stream of
//! words like `vol 12 alarm-led on info`. The whole stream is parsed up
//! front so a bad argument is reported before the dock is touched.

use thiserror::Error;
use tracing::debug;

use as111_transport::protocol::MAX_VOLUME;

/// Usage text printed by `help`
pub const USAGE: &str = "\
 USAGE:   as111 <mac> [command ...]
 EXAMPLE: Set volume to 12
          $ as111 00:1A:7D:DA:71:13 vol 12

 vol <0-32>             Sets volume to value which is between 0 and 32
 mute                   Sets volume to 0
 alarm-led <off|on>     Activates / deactivates alarm LED
 info                   Prints device info
 json                   Prints device info in JSON format
 debug                  Activates debug mode
 help                   Information about usage, commands and parameters
";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("Volume must be between 0 and {}", MAX_VOLUME)]
    InvalidVolume(String),

    #[error("Missing value for '{0}'")]
    MissingValue(&'static str),
}

/// One step of the command stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Volume(u8),
    Mute,
    AlarmLed(bool),
    Info,
    Json,
    Help,
}

/// Parsed command stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandStream {
    pub actions: Vec<Action>,
    /// `debug` appeared somewhere in the stream
    pub debug: bool,
}

/// Volume argument: any integer, folded into the dock's range modulo 32
pub fn parse_volume(value: &str) -> Result<u8, ArgumentError> {
    let v: i64 = value
        .trim()
        .parse()
        .map_err(|_| ArgumentError::InvalidVolume(value.to_string()))?;
    Ok(v.rem_euclid(i64::from(MAX_VOLUME)) as u8)
}

/// Parse the words after the dock address
pub fn parse_command_stream<S: AsRef<str>>(tokens: &[S]) -> Result<CommandStream, ArgumentError> {
    let mut stream = CommandStream::default();
    let mut tokens = tokens.iter().map(|t| t.as_ref());

    while let Some(token) = tokens.next() {
        let action = match token {
            "vol" => {
                let value = tokens.next().ok_or(ArgumentError::MissingValue("vol"))?;
                Action::Volume(parse_volume(value)?)
            }
            "mute" => Action::Mute,
            "alarm-led" => {
                let value = tokens
                    .next()
                    .ok_or(ArgumentError::MissingValue("alarm-led"))?;
                Action::AlarmLed(value == "on")
            }
            "info" => Action::Info,
            "json" => Action::Json,
            "help" => Action::Help,
            "debug" => {
                stream.debug = true;
                continue;
            }
            other => {
                debug!("ignoring unknown command '{}'", other);
                continue;
            }
        };
        stream.actions.push(action);
    }

    Ok(stream)
}
