//! Hand-written ANSI helpers for the handful of sequences `crossterm` has no
//! `Command` for: Save/Restore Cursor Position and Device Status Report.
//! Everything else routes through `crossterm`'s queueable commands.

use std::io::{self, Write};

use crossterm::cursor::{MoveDown, MoveRight, RestorePosition, SavePosition};
use crossterm::QueueableCommand;

/// The terminal clamps cursor motion to the real screen edge, so probing
/// with an oversized offset is sufficient to reach the bottom-right corner.
pub const MAX_TERMINAL_DIMENSION: u16 = 999;

/// Device Status Report, cursor position variant (`ESC [ 6 n`). The
/// terminal responds with a CPR (`ESC [ row ; col R`) on the input stream.
fn device_status_report<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[6n")
}

/// Queue the full terminal-dimension probe sequence: save cursor, push to
/// the bottom-right corner, request a cursor position report, then restore
/// the cursor to where it started.
pub fn queue_dimension_probe<W: Write>(w: &mut W) -> io::Result<()> {
    w.queue(SavePosition)?
        .queue(MoveRight(MAX_TERMINAL_DIMENSION))?
        .queue(MoveDown(MAX_TERMINAL_DIMENSION))?;
    device_status_report(w)?;
    w.queue(RestorePosition)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_sequence_includes_device_status_report() {
        let mut buf = Vec::new();
        queue_dimension_probe(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\x1b[6n"));
    }
}
