//! # Vocabulary Structures
//!
//! * [`SymbolVocab`] - dense ``{ Symbol <-> T }`` table.
//! * [`SpecialVocab`] - the reserved special tokens.
//! * [`MergeTable`] - rank-ordered [`MergeRule`]s.
//! * [`BpeVocab`] - all of the above, immutable after training or loading.
//! * [`io`] - the `vocab.json` / `merges.txt` codec.

pub mod bpe_vocab;
pub mod io;
pub mod merge_table;
pub mod special_vocab;
pub mod symbol_vocab;
pub mod vocab_index;

pub use bpe_vocab::BpeVocab;
pub use merge_table::{MergeRule, MergeTable};
pub use special_vocab::SpecialVocab;
pub use symbol_vocab::SymbolVocab;
pub use vocab_index::TokenVocabIndex;
