//! Command output on stdout. Logs go to stderr.

use std::io::Write;

use serde::Serialize;

use crate::commands::CommandError;

/// Print a value as pretty JSON.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    let text = serde_json::to_string_pretty(value)?;
    line(&text)
}

/// Print one line of text.
pub fn line(text: &str) -> Result<(), CommandError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}")?;
    Ok(())
}

/// Write raw bytes (CSV exports).
pub fn raw(bytes: &[u8]) -> Result<(), CommandError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.flush()?;
    Ok(())
}
