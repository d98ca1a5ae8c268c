//! Raw-mode TTY wrapper.
//!
//! Disables canonical mode, echo, and I/O translation, but deliberately
//! keeps `ISIG` set so Ctrl-C still raises `SIGINT` instead of arriving as
//! an ordinary input byte. `crossterm::terminal::enable_raw_mode` clears
//! `ISIG` too, which is why this talks to `nix`'s termios bindings directly
//! instead.

use std::io;
use std::os::fd::AsFd;

use nix::sys::termios::{
    self, ControlFlags, InputFlags, LocalFlags, OutputFlags, SetArg, SpecialCharacterIndices,
    Termios,
};

/// RAII guard: constructing it enters raw mode, dropping it restores the
/// original termios unconditionally.
pub struct RawGuard {
    original: Termios,
}

impl RawGuard {
    pub fn enable() -> io::Result<Self> {
        let stdin = io::stdin();
        let fd = stdin.as_fd();
        let original = termios::tcgetattr(fd).map_err(io::Error::from)?;

        let mut raw = original.clone();
        raw.input_flags.remove(
            InputFlags::ICRNL | InputFlags::IXON | InputFlags::BRKINT | InputFlags::INPCK
                | InputFlags::ISTRIP,
        );
        raw.output_flags.remove(OutputFlags::OPOST);
        raw.control_flags.remove(ControlFlags::PARENB | ControlFlags::CSIZE);
        raw.control_flags.insert(ControlFlags::CS8);
        raw.local_flags.remove(
            LocalFlags::ICANON | LocalFlags::ECHO | LocalFlags::ECHONL | LocalFlags::IEXTEN,
        );
        // ISIG stays set: Ctrl-C must still deliver SIGINT.
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;

        termios::tcsetattr(fd, SetArg::TCSANOW, &raw).map_err(io::Error::from)?;
        Ok(Self { original })
    }
}

impl Drop for RawGuard {
    fn drop(&mut self) {
        let stdin = io::stdin();
        let _ = termios::tcsetattr(stdin.as_fd(), SetArg::TCSANOW, &self.original);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isig_stays_set_after_raw_mode_flags_are_computed() {
        // `tcgetattr` requires a real TTY, which is not guaranteed under a
        // test harness, so this only exercises the flag arithmetic against
        // a synthetic starting point.
        let mut flags = LocalFlags::ISIG | LocalFlags::ICANON | LocalFlags::ECHO;
        flags.remove(LocalFlags::ICANON | LocalFlags::ECHO | LocalFlags::ECHONL | LocalFlags::IEXTEN);
        assert!(flags.contains(LocalFlags::ISIG));
        assert!(!flags.contains(LocalFlags::ICANON));
    }
}
