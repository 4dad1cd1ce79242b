//! Terminal key decoding.
//!
//! Raw-mode stdin arrives as byte chunks; [`KeyDecoder`] buffers them and
//! yields one [`Key`] at a time. Unrecognized escape sequences are consumed
//! and skipped so a stray sequence can never wedge the input stream.

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Escape,
    Up,
    Down,
    PageUp,
    PageDown,
    CtrlC,
    CtrlD,
    CtrlO,
}

#[derive(Debug, Default)]
pub struct KeyDecoder {
    buffer: Vec<u8>,
}

impl KeyDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Decodes the next key, consuming its bytes.
    ///
    /// Returns `None` when the buffer is empty or holds only an incomplete
    /// multi-byte character.
    pub fn next_key(&mut self) -> Option<Key> {
        loop {
            let (key, consumed) = decode_front(&self.buffer)?;
            self.buffer.drain(..consumed);
            if let Some(key) = key {
                return Some(key);
            }
        }
    }
}

/// Decodes one key from the front of `buffer`.
///
/// `Some((None, n))` means n bytes form a recognized-but-ignored sequence.
fn decode_front(buffer: &[u8]) -> Option<(Option<Key>, usize)> {
    let first = *buffer.first()?;

    match first {
        0x03 => Some((Some(Key::CtrlC), 1)),
        0x04 => Some((Some(Key::CtrlD), 1)),
        0x0f => Some((Some(Key::CtrlO), 1)),
        0x0d | 0x0a => Some((Some(Key::Enter), 1)),
        0x7f | 0x08 => Some((Some(Key::Backspace), 1)),
        0x1b => decode_escape(buffer),
        byte if byte < 0x20 => Some((None, 1)),
        _ => decode_char(buffer),
    }
}

fn decode_escape(buffer: &[u8]) -> Option<(Option<Key>, usize)> {
    match buffer.get(1).copied() {
        None => Some((Some(Key::Escape), 1)),
        Some(b'[') => {
            // CSI: parameter bytes, then one final byte in `@`..=`~`.
            let mut index = 2;
            while let Some(&byte) = buffer.get(index) {
                index += 1;
                if (b'@'..=b'~').contains(&byte) {
                    let key = match &buffer[2..index] {
                        b"A" => Some(Key::Up),
                        b"B" => Some(Key::Down),
                        b"5~" => Some(Key::PageUp),
                        b"6~" => Some(Key::PageDown),
                        _ => None,
                    };
                    return Some((key, index));
                }
            }
            // Incomplete sequence: wait for more bytes.
            None
        }
        Some(b'O') => {
            let key = match buffer.get(2).copied()? {
                b'A' => Some(Key::Up),
                b'B' => Some(Key::Down),
                _ => None,
            };
            Some((key, 3))
        }
        Some(_) => Some((Some(Key::Escape), 1)),
    }
}

fn decode_char(buffer: &[u8]) -> Option<(Option<Key>, usize)> {
    let len = utf8_len(buffer[0]);
    if buffer.len() < len {
        return None;
    }

    match std::str::from_utf8(&buffer[..len]) {
        Ok(text) => text.chars().next().map(|ch| (Some(Key::Char(ch)), len)),
        // Invalid byte: drop it and keep decoding.
        Err(_) => Some((None, 1)),
    }
}

fn utf8_len(first: u8) -> usize {
    match first {
        byte if byte & 0b1110_0000 == 0b1100_0000 => 2,
        byte if byte & 0b1111_0000 == 0b1110_0000 => 3,
        byte if byte & 0b1111_1000 == 0b1111_0000 => 4,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8]) -> Vec<Key> {
        let mut decoder = KeyDecoder::new();
        decoder.feed(bytes);
        let mut keys = Vec::new();
        while let Some(key) = decoder.next_key() {
            keys.push(key);
        }
        keys
    }

    #[test]
    fn decodes_plain_characters() {
        assert_eq!(
            decode_all(b"hi"),
            vec![Key::Char('h'), Key::Char('i')]
        );
    }

    #[test]
    fn decodes_multibyte_characters() {
        assert_eq!(decode_all("é".as_bytes()), vec![Key::Char('é')]);
    }

    #[test]
    fn decodes_control_keys() {
        assert_eq!(decode_all(&[0x03]), vec![Key::CtrlC]);
        assert_eq!(decode_all(&[0x0d]), vec![Key::Enter]);
        assert_eq!(decode_all(&[0x7f]), vec![Key::Backspace]);
        assert_eq!(decode_all(&[0x0f]), vec![Key::CtrlO]);
    }

    #[test]
    fn decodes_arrow_and_page_sequences() {
        assert_eq!(decode_all(b"\x1b[A"), vec![Key::Up]);
        assert_eq!(decode_all(b"\x1bOB"), vec![Key::Down]);
        assert_eq!(decode_all(b"\x1b[5~"), vec![Key::PageUp]);
        assert_eq!(decode_all(b"\x1b[6~"), vec![Key::PageDown]);
    }

    #[test]
    fn lone_escape_decodes_as_escape() {
        assert_eq!(decode_all(&[0x1b]), vec![Key::Escape]);
    }

    #[test]
    fn unknown_csi_sequence_is_skipped() {
        assert_eq!(decode_all(b"\x1b[9Zx"), vec![Key::Char('x')]);
    }

    #[test]
    fn incomplete_sequence_waits_for_more_bytes() {
        let mut decoder = KeyDecoder::new();
        decoder.feed(b"\x1b[");
        assert_eq!(decoder.next_key(), None);
        decoder.feed(b"A");
        assert_eq!(decoder.next_key(), Some(Key::Up));
    }

    #[test]
    fn incomplete_utf8_waits_for_continuation() {
        let bytes = "é".as_bytes();
        let mut decoder = KeyDecoder::new();
        decoder.feed(&bytes[..1]);
        assert_eq!(decoder.next_key(), None);
        decoder.feed(&bytes[1..]);
        assert_eq!(decoder.next_key(), Some(Key::Char('é')));
    }
}
