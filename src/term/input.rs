//! Input decoder: raw bytes in, semantic events out.
//!
//! A byte-level state machine (Ground / Escape / CSI) that decodes a raw
//! input stream from scratch, rather than converting from an
//! already-decoded event source.

use std::io::Read;

use thiserror::Error;

/// A semantic event produced by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Append(char),
    Backspace,
    Select,
    MoveUp,
    MoveDown,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed escape sequence")]
    InvalidEscape,
    #[error("malformed cursor position report")]
    InvalidCpr,
    #[error("invalid utf-8 byte sequence")]
    InvalidUtf8,
}

const ESC: u8 = 0x1B;
const CSI_FINAL: u8 = b'[';

/// Decodes a raw byte stream into [`Event`]s, one byte at a time, dispatching
/// CPR reports to a caller-supplied callback instead of returning them as
/// events.
pub struct Decoder<R> {
    reader: R,
    utf8_buf: Vec<u8>,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            utf8_buf: Vec::with_capacity(4),
        }
    }

    fn read_byte(&mut self) -> std::io::Result<u8> {
        let mut byte = [0u8];
        self.reader.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    /// Read and decode the next semantic event. `on_cpr` is invoked in place
    /// whenever a CPR report is parsed; decoding then continues for the next
    /// event without returning to the caller.
    pub fn next_event(
        &mut self,
        mut on_cpr: impl FnMut(u16, u16),
    ) -> Result<Event, DecodeErrorOrIo> {
        loop {
            let byte = self.read_byte().map_err(DecodeErrorOrIo::Io)?;
            if byte == ESC {
                if let Some(event) = self.handle_escape(&mut on_cpr)? {
                    return Ok(event);
                }
                continue;
            }
            if let Some(event) = self.feed_ground_byte(byte)? {
                return Ok(event);
            }
        }
    }

    fn feed_ground_byte(&mut self, byte: u8) -> Result<Option<Event>, DecodeErrorOrIo> {
        self.utf8_buf.push(byte);
        match std::str::from_utf8(&self.utf8_buf) {
            Ok(text) => {
                let rune = text.chars().next().expect("buffer is non-empty");
                self.utf8_buf.clear();
                Ok(Some(match rune {
                    '\u{7f}' => Event::Backspace,
                    '\r' => Event::Select,
                    other => Event::Append(other),
                }))
            }
            Err(err) if err.error_len().is_none() => {
                // incomplete multi-byte sequence so far; keep accumulating
                Ok(None)
            }
            Err(_) => {
                self.utf8_buf.clear();
                Err(DecodeErrorOrIo::Decode(DecodeError::InvalidUtf8))
            }
        }
    }

    fn handle_escape(
        &mut self,
        on_cpr: &mut impl FnMut(u16, u16),
    ) -> Result<Option<Event>, DecodeErrorOrIo> {
        let b2 = self.read_byte().map_err(DecodeErrorOrIo::Io)?;
        if !(0x40..=0x5F).contains(&b2) {
            return Err(DecodeErrorOrIo::Decode(DecodeError::InvalidEscape));
        }
        if b2 != CSI_FINAL {
            // non-CSI escape with no parameters; back to Ground
            return Ok(None);
        }

        let mut params = Vec::new();
        let mut b = self.read_byte().map_err(DecodeErrorOrIo::Io)?;
        while (0x30..=0x3F).contains(&b) {
            params.push(b);
            b = self.read_byte().map_err(DecodeErrorOrIo::Io)?;
        }
        while (0x20..=0x2F).contains(&b) {
            b = self.read_byte().map_err(DecodeErrorOrIo::Io)?;
        }
        if !(0x40..=0x7E).contains(&b) {
            return Err(DecodeErrorOrIo::Decode(DecodeError::InvalidEscape));
        }

        match b {
            b'A' => Ok(Some(Event::MoveUp)),
            b'B' => Ok(Some(Event::MoveDown)),
            b'R' => {
                let text = std::str::from_utf8(&params)
                    .map_err(|_| DecodeErrorOrIo::Decode(DecodeError::InvalidCpr))?;
                let (row, col) = text
                    .split_once(';')
                    .ok_or(DecodeErrorOrIo::Decode(DecodeError::InvalidCpr))?;
                let row: u16 = row
                    .parse()
                    .map_err(|_| DecodeErrorOrIo::Decode(DecodeError::InvalidCpr))?;
                let col: u16 = col
                    .parse()
                    .map_err(|_| DecodeErrorOrIo::Decode(DecodeError::InvalidCpr))?;
                on_cpr(row, col);
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

/// Either a fatal decode error or the underlying I/O error from the byte
/// source; kept distinct from [`crate::error::Error`] so tests can assert
/// on the exact malformed-input behavior independent of I/O.
#[derive(Debug)]
pub enum DecodeErrorOrIo {
    Decode(DecodeError),
    Io(std::io::Error),
}

impl From<DecodeErrorOrIo> for crate::error::Error {
    fn from(err: DecodeErrorOrIo) -> Self {
        match err {
            DecodeErrorOrIo::Decode(err) => crate::error::Error::Decode(err),
            DecodeErrorOrIo::Io(err) => crate::error::Error::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decode_all(bytes: &[u8]) -> Vec<Result<Event, DecodeError>> {
        let mut decoder = Decoder::new(Cursor::new(bytes.to_vec()));
        let mut events = Vec::new();
        loop {
            match decoder.next_event(|_, _| {}) {
                Ok(event) => events.push(Ok(event)),
                Err(DecodeErrorOrIo::Decode(err)) => {
                    events.push(Err(err));
                    break;
                }
                Err(DecodeErrorOrIo::Io(_)) => break,
            }
        }
        events
    }

    #[test]
    fn plain_ascii_emits_append() {
        assert_eq!(decode_all(b"a"), vec![Ok(Event::Append('a'))]);
    }

    #[test]
    fn multibyte_utf8_emits_single_append() {
        // 'é' as UTF-8
        assert_eq!(decode_all("é".as_bytes()), vec![Ok(Event::Append('é'))]);
    }

    #[test]
    fn del_emits_backspace_and_cr_emits_select() {
        assert_eq!(
            decode_all(b"\x7f\r"),
            vec![Ok(Event::Backspace), Ok(Event::Select)]
        );
    }

    #[test]
    fn csi_a_and_b_map_to_move_up_and_down() {
        assert_eq!(
            decode_all(b"\x1b[A\x1b[B"),
            vec![Ok(Event::MoveUp), Ok(Event::MoveDown)]
        );
    }

    #[test]
    fn cpr_is_delivered_via_callback_not_as_an_event() {
        let mut decoder = Decoder::new(Cursor::new(b"\x1b[24;80Ra".to_vec()));
        let mut seen = None;
        let event = decoder.next_event(|row, col| seen = Some((row, col))).unwrap();
        assert_eq!(seen, Some((24, 80)));
        assert_eq!(event, Event::Append('a'));
    }

    #[test]
    fn non_csi_escape_returns_to_ground() {
        // ESC followed by a lone non-CSI final byte, then an ordinary rune
        assert_eq!(decode_all(b"\x1bOa"), vec![Ok(Event::Append('a'))]);
    }

    #[test]
    fn unknown_csi_final_byte_is_silently_ignored() {
        assert_eq!(decode_all(b"\x1b[5~a"), vec![Ok(Event::Append('a'))]);
    }

    #[test]
    fn malformed_escape_is_fatal_and_does_not_overconsume() {
        // byte after ESC is outside [0x40, 0x5F]
        let events = decode_all(b"\x1b\x01a");
        assert_eq!(events, vec![Err(DecodeError::InvalidEscape)]);
    }

    #[test]
    fn malformed_cpr_parameters_are_fatal() {
        // "2;;" has no valid column field after the second separator
        let events = decode_all(b"\x1b[2;;Rq");
        assert_eq!(events, vec![Err(DecodeError::InvalidCpr)]);
    }
}
