//! # Patterns

use crate::errors::Result;
use fancy_regex::Regex;

/// The GPT-2 byte-level word pattern.
///
/// Contractions, letter runs, digit runs and punctuation runs each keep one
/// optional leading space; whitespace runs give their final space to the next
/// word (`\s+(?!\S)`), so every word except possibly the first carries the
/// preceding whitespace marker.
pub const BYTE_LEVEL_WORD_PATTERN: &str =
    r"'s|'t|'re|'ve|'m|'ll|'d| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+(?!\S)|\s+";

/// Compile a word pattern.
pub fn compile_pattern<S: AsRef<str>>(pattern: S) -> Result<Regex> {
    Ok(Regex::new(pattern.as_ref())?)
}
