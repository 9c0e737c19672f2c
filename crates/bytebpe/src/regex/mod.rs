//! # Regex Utilities
//!
//! Word splitting uses [`fancy_regex`], as the byte-level split pattern needs a
//! negative lookahead (`\s+(?!\S)`) that the basic `regex` crate cannot express.
//! Compiled [`fancy_regex::Regex`] values are `Send + Sync`, and are shared by
//! reference across encoding threads.

pub mod exact_match_union;
pub mod patterns;

pub use exact_match_union::{exact_match_union_regex, exact_match_union_regex_pattern};
pub use patterns::{BYTE_LEVEL_WORD_PATTERN, compile_pattern};
