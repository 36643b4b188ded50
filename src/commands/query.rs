//! Query (read-only) command handlers.

use std::io::Write;

use super::CommandResult;
use as111_dock::DockSession;

/// Print device info
pub fn info(session: &DockSession, out: &mut impl Write) -> CommandResult {
    writeln!(out, "{}", session.device())?;
    Ok(())
}

/// Print device info as JSON
pub fn json(session: &DockSession, out: &mut impl Write) -> CommandResult {
    writeln!(out, "{}", serde_json::to_string_pretty(session.device())?)?;
    Ok(())
}
