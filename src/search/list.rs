//! One-level-deep notes directory enumeration.
//!
//! Uses `std::fs::read_dir` directly rather than a recursive walker: nested
//! directories are skipped with a log line instead of descended into, so a
//! recursive crate like `walkdir` would be the wrong tool here.

use std::fs;
use std::path::Path;

use log::warn;

const NOTE_SUFFIX: &str = ".txt";

/// List the stripped titles of every regular `.txt` file directly inside
/// `dir`. Nested directories and non-`.txt` files are skipped and logged;
/// a directory that cannot be read at all yields an empty list.
pub fn list_titles(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("failed to read notes directory {}: {err}", dir.display());
            return Vec::new();
        }
    };

    let mut titles = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("failed to read a directory entry in {}: {err}", dir.display());
                continue;
            }
        };
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                warn!("failed to stat {}: {err}", entry.path().display());
                continue;
            }
        };
        if file_type.is_dir() {
            warn!("skipping nested directory {}", entry.path().display());
            continue;
        }
        let name = entry.file_name();
        match name.to_string_lossy().strip_suffix(NOTE_SUFFIX) {
            Some(title) => titles.push(title.to_owned()),
            None => warn!("skipping non-note file {}", entry.path().display()),
        }
    }
    titles
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir, write};

    #[test]
    fn lists_txt_files_skips_others_and_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("alpha.txt"), "alpha beta").unwrap();
        write(dir.path().join("notes.md"), "ignored").unwrap();
        create_dir(dir.path().join("nested")).unwrap();

        let mut titles = list_titles(dir.path());
        titles.sort();
        assert_eq!(titles, vec!["alpha".to_string()]);
    }

    #[test]
    fn missing_directory_yields_empty_list() {
        assert!(list_titles(Path::new("/nonexistent/notes/dir")).is_empty());
    }
}
