//! External editor launch.
//!
//! `VISUAL` is preferred over `EDITOR`, falling back to `vim`. The editor is
//! located on `PATH` via the `which` crate and the current process image is
//! replaced with it via `exec`, so this function only ever returns on
//! failure.

use std::env;
use std::ffi::OsString;
use std::io;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::Command;

use crate::error::Error;

const DEFAULT_EDITOR: &str = "vim";

fn chosen_editor() -> OsString {
    env::var_os("VISUAL")
        .or_else(|| env::var_os("EDITOR"))
        .unwrap_or_else(|| OsString::from(DEFAULT_EDITOR))
}

/// Replace the current process with the user's editor, opening `note_path`.
/// Never returns on success.
pub fn launch(note_path: &Path) -> Error {
    let editor = chosen_editor();
    let resolved = match which::which(&editor) {
        Ok(path) => path,
        Err(err) => {
            return Error::EditorLaunch(io::Error::other(format!(
                "could not locate editor '{}' on PATH: {err}",
                editor.to_string_lossy()
            )));
        }
    };
    Error::EditorLaunch(Command::new(resolved).arg(note_path).exec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visual_takes_precedence_over_editor() {
        // SAFETY: test-only mutation of process environment, single-threaded access
        unsafe {
            env::set_var("VISUAL", "vis-editor");
            env::set_var("EDITOR", "ed-editor");
        }
        assert_eq!(chosen_editor(), OsString::from("vis-editor"));
        unsafe {
            env::remove_var("VISUAL");
            env::remove_var("EDITOR");
        }
    }

    #[test]
    fn falls_back_to_default_when_unset() {
        unsafe {
            env::remove_var("VISUAL");
            env::remove_var("EDITOR");
        }
        assert_eq!(chosen_editor(), OsString::from(DEFAULT_EDITOR));
    }
}
