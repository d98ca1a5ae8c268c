//! Top-level error taxonomy: every fatal condition anywhere in the program
//! converges here and crosses the orchestrator's fail channel.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::term::input::DecodeError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("terminal attribute error: {0}")]
    Tty(io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("`{tool}` exited with status {status}")]
    ExternalProcess { tool: &'static str, status: i32 },

    #[error("input decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("malformed search output: {0}")]
    SearchParse(String),

    #[error("failed to launch editor: {0}")]
    EditorLaunch(io::Error),
}
