//! Command handlers for the CLI application.
//!
//! - `query`: read-only output (info, json)
//! - `set`: setting commands (vol, mute, alarm-led)
//!
//! Output goes to a caller-supplied writer; the binary passes stdout.

pub mod query;
pub mod set;

use std::io::Write;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, warn};

use as111_dock::DockSession;
use as111_transport::BdAddr;

use crate::{Action, Config, USAGE};

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

pub fn print_usage(out: &mut impl Write) -> CommandResult {
    write!(out, "{USAGE}")?;
    Ok(())
}

/// Connect to the dock at `address` and run [`run_actions`] against it,
/// disconnecting afterwards. `mac` is the address as typed.
pub fn run_session(address: BdAddr, mac: &str, config: &Config, actions: &[Action]) -> CommandResult {
    let mut session = DockSession::new(address, config.session_options()).with_mac_label(mac);
    session.connect()?;
    debug!("connected to {} on channel {}", address, config.channel);

    let result = run_actions(
        &mut session,
        actions,
        Local::now().naive_local(),
        &mut std::io::stdout().lock(),
    );
    session.disconnect();
    result
}

/// Startup sequence on a connected session: read the dock's state, set its
/// clock to `now`, then run the command stream in order.
///
/// Failed writes are reported and skipped. Only a failure that ends the
/// session (link lost, output closed) is returned.
pub fn run_actions(
    session: &mut DockSession,
    actions: &[Action],
    now: NaiveDateTime,
    out: &mut impl Write,
) -> CommandResult {
    session.refresh_device_info()?;

    if let Err(e) = session.sync_time(now) {
        warn!("time sync failed: {}", e);
    }

    for action in actions {
        match *action {
            Action::Volume(volume) => set::volume(session, volume),
            Action::Mute => set::mute(session),
            Action::AlarmLed(on) => set::alarm_led(session, on),
            Action::Info => query::info(session, out)?,
            Action::Json => query::json(session, out)?,
            Action::Help => print_usage(out)?,
        }
    }
    Ok(())
}
