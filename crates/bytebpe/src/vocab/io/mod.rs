//! # Persistence Codec
//!
//! A [`BpeVocab`](crate::vocab::BpeVocab) is stored as two artifacts in one directory:
//! * `vocab.json` - see [`vocab_json`],
//! * `merges.txt` - see [`merges_txt`].
//!
//! The word split pattern is not stored; loaders are given the pattern.

pub mod artifacts;
pub mod merges_txt;
pub mod vocab_json;

pub use artifacts::{
    load_bpe_vocab_from_dir, load_bpe_vocab_from_paths, merges_txt_path, save_bpe_vocab_to_dir,
    vocab_json_path,
};
pub use merges_txt::{MergeList, load_merges_from_path, load_merges_from_reader, save_merges_to_writer};
pub use vocab_json::{
    load_symbols_from_json_path, load_symbols_from_json_reader, save_symbols_to_json_writer,
};
