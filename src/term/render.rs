//! Renderer: redraws the query line and result list on any state change.
//!
//! A multi-line frame built from a single-line draw primitive
//! (erase-in-line, CR, truncate-with-ellipsis), tracking `max_lines`, the
//! high-water mark of frame height across the process lifetime, so a
//! shrinking result count erases the stale rows left over from a taller
//! previous frame.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveRight, MoveUp, Show};
use crossterm::style::{Attribute, SetAttribute};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;

use crate::error::Error;
use crate::search::SearchState;
use crate::term::dimensions::Dimensions;
use crate::trigger::Subscription;

const ELLIPSIS: char = '…';

pub struct Renderer {
    max_lines: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Self { max_lines: 0 }
    }

    /// Draw once immediately so the UI appears without waiting, then redraw
    /// on every subsequent notification from the combined subscription.
    pub fn run(
        &mut self,
        mut subscription: Subscription,
        search: &SearchState,
        dims: &Dimensions,
    ) -> Result<(), Error> {
        self.draw(search, dims)?;
        loop {
            subscription.wait();
            self.draw(search, dims)?;
        }
    }

    fn draw(&mut self, search: &SearchState, dims: &Dimensions) -> Result<(), Error> {
        let query = search.query();
        let (selection, results) = search.results();
        let (width, _height) = dims.size();

        let stdout = io::stdout();
        let mut out = stdout.lock();
        draw_frame(&mut out, &mut self.max_lines, &query, selection, &results, width)
            .map_err(Error::Tty)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pure frame-drawing function, independent of the live terminal, so it can
/// be exercised against a plain buffer in tests. Drawing the same state
/// twice in a row produces identical output.
fn draw_frame<W: Write>(
    out: &mut W,
    max_lines: &mut usize,
    query: &str,
    selection: isize,
    results: &[String],
    width: u16,
) -> io::Result<()> {
    let effective_width = effective_width(width, query, results);

    out.queue(Hide)?;

    draw_line(out, query, selection == -1, effective_width)?;
    for (index, title) in results.iter().enumerate() {
        write!(out, "\r\n")?;
        draw_line(out, title, selection == index as isize, effective_width)?;
    }

    let lines = results.len() + 1;
    if lines < *max_lines {
        write!(out, "\r\n")?;
        out.queue(Clear(ClearType::FromCursorDown))?;
    }
    *max_lines = (*max_lines).max(lines);

    write!(out, "\r")?;
    if lines > 1 {
        out.queue(MoveUp((lines - 1) as u16))?;
    }
    let query_width = query.chars().count() as u16;
    if query_width > 0 {
        out.queue(MoveRight(query_width))?;
    }
    out.queue(Show)?;
    out.flush()
}

fn draw_line<W: Write>(out: &mut W, content: &str, selected: bool, width: usize) -> io::Result<()> {
    let rendered = truncate_to_width(content, width);
    if selected {
        out.queue(SetAttribute(Attribute::Reverse))?;
        write!(out, "\r")?;
        write!(out, "{}", " ".repeat(width))?;
        write!(out, "\r{rendered}")?;
        out.queue(SetAttribute(Attribute::Reset))?;
    } else {
        out.queue(Clear(ClearType::CurrentLine))?;
        write!(out, "\r{rendered}")?;
    }
    Ok(())
}

/// `(0, 0)` means no CPR has arrived yet; fall back to a width wide enough
/// that nothing truncates.
fn effective_width(width: u16, query: &str, results: &[String]) -> usize {
    if width > 0 {
        return width as usize;
    }
    let longest_result = results.iter().map(String::len).max().unwrap_or(0);
    query.len().max(longest_result).max(1)
}

/// Width is counted in bytes, not code points or display columns — wide
/// characters can still overflow a line by a column or two. Truncates to
/// `width - 1` bytes and appends a one-character ellipsis if the content
/// overflows.
fn truncate_to_width(content: &str, width: usize) -> String {
    if width == 0 || content.len() <= width {
        return content.to_owned();
    }
    let keep = (width - 1).min(content.len());
    let mut truncated = String::from_utf8_lossy(&content.as_bytes()[..keep]).into_owned();
    truncated.push(ELLIPSIS);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_with_empty_query_has_one_line_zero_results() {
        let mut max_lines = 0;
        let mut buf = Vec::new();
        draw_frame(&mut buf, &mut max_lines, "", -1, &[], 80).unwrap();
        assert_eq!(max_lines, 1);
    }

    #[test]
    fn frame_idempotence_for_identical_state() {
        let mut max_lines = 0;
        let mut first = Vec::new();
        draw_frame(&mut first, &mut max_lines, "a", 0, &["alpha".into(), "gamma".into()], 80).unwrap();

        let mut max_lines2 = max_lines;
        let mut second = Vec::new();
        draw_frame(&mut second, &mut max_lines2, "a", 0, &["alpha".into(), "gamma".into()], 80).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn shrinking_result_count_erases_stale_rows() {
        let mut max_lines = 0;
        let mut buf = Vec::new();
        draw_frame(&mut buf, &mut max_lines, "a", -1, &["alpha".into(), "gamma".into()], 80).unwrap();
        assert_eq!(max_lines, 3);

        let mut buf2 = Vec::new();
        draw_frame(&mut buf2, &mut max_lines, "a", -1, &["alpha".into()], 80).unwrap();
        // max_lines stays at the high-water mark
        assert_eq!(max_lines, 3);
        let text = String::from_utf8_lossy(&buf2);
        assert!(text.contains('\u{1b}'));
    }

    #[test]
    fn overlong_content_is_truncated_with_ellipsis() {
        assert_eq!(truncate_to_width("abcdefgh", 4), "abc…");
        assert_eq!(truncate_to_width("abc", 4), "abc");
    }
}
