//! External search tool invocation: a title pass feeding candidate titles
//! on stdin, and a content pass running recursively over the notes
//! directory. Exit codes 0 and 1 are both treated as success, matching
//! grep's "no matches" convention.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::Error;

const TOOL: &str = "grep";

fn finish(status: std::process::ExitStatus) -> Result<(), Error> {
    match status.code() {
        Some(0) | Some(1) => Ok(()),
        Some(status) => Err(Error::ExternalProcess { tool: TOOL, status }),
        None => Err(Error::ExternalProcess { tool: TOOL, status: -1 }),
    }
}

/// Run `grep -i <query>` feeding `titles` on stdin, one per line, returning
/// the titles that matched.
pub fn search_titles(query: &str, titles: &[String]) -> Result<Vec<String>, Error> {
    if query.is_empty() || titles.is_empty() {
        return Ok(Vec::new());
    }

    let mut child = Command::new(TOOL)
        .arg("-i")
        .arg(query)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(Error::Io)?;

    let mut stdin = child.stdin.take().expect("stdin was piped");
    let stdout = child.stdout.take().expect("stdout was piped");
    let titles = titles.to_vec();
    let writer = std::thread::spawn(move || {
        for title in titles {
            let _ = writeln!(stdin, "{title}");
        }
    });

    let matched: Vec<String> = BufReader::new(stdout)
        .lines()
        .collect::<Result<_, _>>()
        .map_err(Error::Io)?;

    let _ = writer.join();
    finish(child.wait().map_err(Error::Io)?)?;
    Ok(matched)
}

/// Run `grep -i -o -R <query> <dir>`, returning the derived titles for every
/// `path:match` line the tool emits.
pub fn search_contents(query: &str, dir: &Path) -> Result<Vec<String>, Error> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let output = Command::new(TOOL)
        .arg("-i")
        .arg("-o")
        .arg("-R")
        .arg(query)
        .arg(dir)
        .output()
        .map_err(Error::Io)?;
    finish(output.status)?;

    let text = String::from_utf8_lossy(&output.stdout);
    text.lines()
        .map(|line| {
            line.split_once(':')
                .map(|(path, _matched)| derive_title(path))
                .ok_or_else(|| Error::SearchParse(line.to_owned()))
        })
        .collect()
}

/// Derive a result title from a file path: basename with the `.txt` suffix
/// stripped.
fn derive_title(path: &str) -> String {
    let base = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_owned());
    base.strip_suffix(".txt").map(str::to_owned).unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_title_strips_directory_and_suffix() {
        assert_eq!(derive_title("/notes/alpha.txt"), "alpha");
        assert_eq!(derive_title("alpha.txt"), "alpha");
        assert_eq!(derive_title("alpha"), "alpha");
    }

    #[test]
    fn empty_query_short_circuits_without_spawning() {
        assert_eq!(search_titles("", &["alpha".into()]).unwrap(), Vec::<String>::new());
        assert_eq!(
            search_contents("", Path::new("/tmp")).unwrap(),
            Vec::<String>::new()
        );
    }
}
