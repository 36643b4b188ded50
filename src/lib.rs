// AS111 dock client - shared library
// Command stream parsing, configuration and command handlers used by the
// `as111` binary

pub mod actions;
pub mod commands;
pub mod config;

pub use actions::{parse_command_stream, Action, ArgumentError, CommandStream, USAGE};
pub use config::{Config, ConfigError};
