//! # Byte-Level BPE Tokenizer
//!
//! Learns a byte-level Byte-Pair-Encoding vocabulary from a text corpus,
//! and uses it to convert text to token ids and back.
//!
//! Every byte has a base token, so encoding never fails; and decoding
//! reproduces the encoded bytes exactly.
//!
//! # Training Example
//!
//! ```rust,no_run
//! use bytebpe::{BpeTrainerOptions, ByteLevelBpeTokenizer, DEFAULT_SPECIAL_TOKENS};
//!
//! let samples = vec!["Stocks rallied on Wall Street.", "Oil prices fell."];
//!
//! let options = BpeTrainerOptions::new(30_000)
//!     .with_min_frequency(2)
//!     .with_special_tokens(DEFAULT_SPECIAL_TOKENS);
//!
//! let tokenizer: ByteLevelBpeTokenizer = ByteLevelBpeTokenizer::train(samples, options)?;
//! tokenizer.save("tokenizer")?;
//!
//! let tokenizer: ByteLevelBpeTokenizer = ByteLevelBpeTokenizer::load("tokenizer")?;
//! let encoding = tokenizer.encode("Oil prices rallied.");
//! assert_eq!(tokenizer.decode(&encoding.ids)?, "Oil prices rallied.");
//! # Ok::<(), bytebpe::Error>(())
//! ```
#![warn(missing_docs, unused)]

pub mod byte_level;
pub mod decoders;
pub mod encoders;
pub mod errors;
#[cfg(feature = "rayon")]
pub mod rayon;
pub mod regex;
pub mod segmentation;
pub mod tokenizer;
pub mod training;
pub mod types;
pub mod vocab;

pub use errors::{Error, Result};
pub use tokenizer::{ByteLevelBpeTokenizer, Encoding};
pub use training::{BpeTrainerOptions, SpecialPlacement};

/// Default value for parallel processing; based on the `rayon` feature.
#[cfg(feature = "rayon")]
pub const DEFAULT_PARALLEL: bool = true;

/// Default value for parallel processing; based on the `rayon` feature.
#[cfg(not(feature = "rayon"))]
pub const DEFAULT_PARALLEL: bool = false;

/// Constant guess for the expected bytes/token ratio.
pub const BYTES_PER_TOKEN_HINT: f64 = 4.0;

/// The number of base byte symbols.
pub const BASE_ALPHABET_SIZE: usize = 256;

/// Default target vocabulary size.
pub const DEFAULT_VOCAB_SIZE: usize = 30_000;

/// Default minimum pair frequency for a merge.
pub const DEFAULT_MIN_FREQUENCY: usize = 2;

/// RoBERTa-style special tokens: sequence start, padding, sequence end, unknown, mask.
pub const DEFAULT_SPECIAL_TOKENS: [&str; 5] = ["<s>", "<pad>", "</s>", "<unk>", "<mask>"];
