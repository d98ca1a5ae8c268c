//! Configuration loading from `~/.go-notes`: a missing file falls back to
//! defaults, a present-but-unparsable file is fatal. Unknown keys are
//! tolerated so older and newer config files stay forward-compatible.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use etcetera::home_dir;
use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = ".go-notes";
const DEFAULT_NOTES_SUBDIR: &str = "Notes";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("failed to read configuration file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Resolved configuration used by the rest of the program.
#[derive(Debug, Clone)]
pub struct Config {
    pub notes_directory: PathBuf,
    pub log_file: Option<PathBuf>,
}

/// Direct deserialization target for `~/.go-notes`. Unknown keys are ignored
/// by default (no `#[serde(deny_unknown_fields)]`), so older and newer
/// versions of the tool can share a config file.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(rename = "NotesDirectory")]
    notes_directory: Option<PathBuf>,
    #[serde(rename = "LogFile")]
    log_file: Option<PathBuf>,
}

impl Config {
    /// Load the configuration from `~/.go-notes`, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let home = home_dir().map_err(|_| ConfigError::NoHomeDir)?;
        let path = home.join(CONFIG_FILE_NAME);
        let raw = RawConfig::load(&path)?;
        Ok(Self {
            notes_directory: raw
                .notes_directory
                .unwrap_or_else(|| home.join(DEFAULT_NOTES_SUBDIR)),
            log_file: raw.log_file,
        })
    }
}

impl RawConfig {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_are_ignored() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"NotesDirectory": "/tmp/n", "Extra": 7}"#).unwrap();
        assert_eq!(raw.notes_directory, Some(PathBuf::from("/tmp/n")));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let raw = RawConfig::load(Path::new("/nonexistent/path/.go-notes")).unwrap();
        assert!(raw.notes_directory.is_none());
        assert!(raw.log_file.is_none());
    }

    #[test]
    fn malformed_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".go-notes");
        fs::write(&path, b"not json").unwrap();
        assert!(matches!(
            RawConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
