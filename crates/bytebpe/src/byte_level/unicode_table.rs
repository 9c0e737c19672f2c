//! # Byte/Unicode Bijection
//!
//! Bytes that are already printable (`!`..=`~`, `¡`..=`¬`, `®`..=`ÿ`) map to the
//! code point of the same value. The remaining 68 bytes (controls, space, DEL,
//! NBSP, soft hyphen) map, in ascending byte order, to `U+0100` onwards; so
//! space becomes `Ġ` and newline becomes `Ċ`.

use ahash::AHashMap;
use std::sync::LazyLock;

/// The first code point used for non-printable bytes.
const SHIFTED_BASE: u32 = 0x100;

/// The shared [`ByteUnicodeTable`].
pub static BYTE_UNICODE: LazyLock<ByteUnicodeTable> = LazyLock::new(ByteUnicodeTable::new);

/// Total `u8 <-> char` bijection.
#[derive(Debug, Clone, PartialEq)]
pub struct ByteUnicodeTable {
    byte_to_char: [char; 256],
    char_to_byte: AHashMap<char, u8>,
}

impl Default for ByteUnicodeTable {
    fn default() -> Self {
        Self::new()
    }
}

fn is_printable_byte(b: u8) -> bool {
    matches!(b, b'!'..=b'~' | 0xA1..=0xAC | 0xAE..=0xFF)
}

impl ByteUnicodeTable {
    /// Build the table.
    pub fn new() -> Self {
        let mut byte_to_char = ['\0'; 256];
        let mut shifted = SHIFTED_BASE;

        for b in 0..=255_u8 {
            let code = if is_printable_byte(b) {
                b as u32
            } else {
                let code = shifted;
                shifted += 1;
                code
            };
            // Every code point below U+0200 is a valid scalar value.
            byte_to_char[b as usize] = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
        }

        let char_to_byte = byte_to_char
            .iter()
            .enumerate()
            .map(|(b, &c)| (c, b as u8))
            .collect();

        Self {
            byte_to_char,
            char_to_byte,
        }
    }

    /// The stand-in character for a byte.
    pub fn byte_to_char(
        &self,
        byte: u8,
    ) -> char {
        self.byte_to_char[byte as usize]
    }

    /// The byte a stand-in character represents, if any.
    pub fn char_to_byte(
        &self,
        c: char,
    ) -> Option<u8> {
        self.char_to_byte.get(&c).copied()
    }

    /// The full byte-ord => char table.
    pub fn chars(&self) -> &[char; 256] {
        &self.byte_to_char
    }

    /// Append the symbol text for `bytes` to `buf`.
    pub fn append_symbol_text(
        &self,
        bytes: &[u8],
        buf: &mut String,
    ) {
        buf.extend(bytes.iter().map(|&b| self.byte_to_char(b)));
    }

    /// Append the bytes represented by `text` to `buf`.
    ///
    /// # Returns
    /// `false` (leaving a partial append) if `text` contains a character outside the table.
    pub fn append_bytes(
        &self,
        text: &str,
        buf: &mut Vec<u8>,
    ) -> bool {
        for c in text.chars() {
            match self.char_to_byte(c) {
                Some(b) => buf.push(b),
                None => return false,
            }
        }
        true
    }
}

/// Map raw bytes to their symbol text.
pub fn bytes_to_symbol_text(bytes: &[u8]) -> String {
    let mut buf = String::with_capacity(bytes.len() * 2);
    BYTE_UNICODE.append_symbol_text(bytes, &mut buf);
    buf
}

/// Map symbol text back to raw bytes; `None` if any character is not a byte stand-in.
pub fn symbol_text_to_bytes(text: &str) -> Option<Vec<u8>> {
    let mut buf = Vec::with_capacity(text.len());
    BYTE_UNICODE.append_bytes(text, &mut buf).then_some(buf)
}
