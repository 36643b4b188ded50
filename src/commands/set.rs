//! Set (write) command handlers.
//!
//! Writes are silent on success so `json` output stays clean. A failed
//! write is reported and the command stream moves on.

use as111_dock::DockSession;

/// Set volume (0-32)
pub fn volume(session: &mut DockSession, volume: u8) {
    if let Err(e) = session.set_volume(volume) {
        eprintln!("ERROR: Failed to set volume to {volume}: {e}");
    }
}

/// Set volume to 0
pub fn mute(session: &mut DockSession) {
    if let Err(e) = session.set_volume(0) {
        eprintln!("ERROR: Failed to mute: {e}");
    }
}

/// Switch the alarm LED
pub fn alarm_led(session: &mut DockSession, on: bool) {
    if let Err(e) = session.set_alarm_led(on) {
        let state = if on { "on" } else { "off" };
        eprintln!("ERROR: Failed to switch alarm LED {state}: {e}");
    }
}
