//! Wire format of the LED controller.
//!
//! Host to board: one ASCII line per command, `LED:<mask>\n`, where `<mask>`
//! is a decimal bitmask (bit `i` lights LED `i`). Board to host: a single
//! ready line after reset. Nothing else flows in either direction.

use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

use tracing::trace;

/// Prefix of every command line.
pub const COMMAND_PREFIX: &str = "LED:";

/// Pause between reads that returned no data.
const IDLE_POLL: Duration = Duration::from_millis(5);

/// Encode the command line for `mask`.
#[must_use]
pub fn encode_command(mask: u8) -> String {
    format!("{COMMAND_PREFIX}{mask}\n")
}

/// Write the command for `mask`, flush it, then wait `delay` so the board
/// can act on it before the next line arrives.
///
/// # Errors
///
/// Returns the first write or flush error.
pub fn write_command<W: Write + ?Sized>(
    writer: &mut W,
    mask: u8,
    delay: Duration,
) -> std::io::Result<()> {
    writer.write_all(encode_command(mask).as_bytes())?;
    writer.flush()?;
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
    Ok(())
}

/// Read lines from `reader` until one equals `token` or `timeout` elapses.
///
/// Lines are compared after trimming whitespace; invalid UTF-8 is replaced
/// rather than rejected. A read timeout flushes any partial line, so a token
/// sent without a trailing newline is still recognised.
///
/// Returns `Ok(true)` when the token was seen and `Ok(false)` on timeout.
///
/// # Errors
///
/// Returns any read error other than a timeout or an interrupted call.
pub fn wait_for_token<R: Read + ?Sized>(
    reader: &mut R,
    token: &str,
    timeout: Duration,
) -> std::io::Result<bool> {
    let deadline = Instant::now() + timeout;
    let mut pending: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 64];

    while Instant::now() < deadline {
        match reader.read(&mut chunk) {
            Ok(0) => std::thread::sleep(IDLE_POLL),
            Ok(n) => {
                pending.extend_from_slice(&chunk[..n]);
                while let Some(pos) = pending.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = pending.drain(..=pos).collect();
                    if line_matches(&line, token) {
                        return Ok(true);
                    }
                }
            }
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                if !pending.is_empty() {
                    let line = std::mem::take(&mut pending);
                    if line_matches(&line, token) {
                        return Ok(true);
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    Ok(!pending.is_empty() && line_matches(&pending, token))
}

fn line_matches(line: &[u8], token: &str) -> bool {
    let text = String::from_utf8_lossy(line);
    trace!("Handshake line: {:?}", text.trim());
    text.trim() == token
}
