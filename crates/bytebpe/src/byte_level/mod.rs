//! # Byte-Level Mapping
//!
//! Every byte value is given a printable stand-in character, so arbitrary byte
//! strings can be segmented, merged and stored as ordinary text:
//!
//! * [`ByteUnicodeTable`] - the fixed `u8 <-> char` bijection (GPT-2 layout).
//! * [`ByteTokenTable`] - the `u8 <-> T` bijection onto a vocabulary's base tokens.

pub mod byte_table;
pub mod unicode_table;

pub use byte_table::ByteTokenTable;
pub use unicode_table::{
    BYTE_UNICODE, ByteUnicodeTable, bytes_to_symbol_text, symbol_text_to_bytes,
};
