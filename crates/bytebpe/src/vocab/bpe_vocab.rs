//! # Byte-Level BPE Vocabulary
//!
//! The immutable pairing of a [`SymbolVocab`] with its [`MergeTable`]; the
//! sole input of the encoders and decoders.

use crate::byte_level::{BYTE_UNICODE, ByteTokenTable, symbol_text_to_bytes};
use crate::errors::{Result, corrupt};
use crate::segmentation::SegmentationConfig;
use crate::types::{Symbol, TokenToBytesMap, TokenType};
use crate::vocab::merge_table::{MergeRule, MergeTable};
use crate::vocab::special_vocab::SpecialVocab;
use crate::vocab::symbol_vocab::SymbolVocab;
use crate::vocab::vocab_index::TokenVocabIndex;
use ahash::AHashSet;

/// Byte-level BPE vocabulary.
///
/// Holds:
/// * the [`SegmentationConfig`] (word pattern and special words),
/// * the [`SymbolVocab`], covering every base byte symbol,
/// * the [`SpecialVocab`] of reserved tokens,
/// * the [`MergeTable`], in rank order,
/// * the [`ByteTokenTable`] of base byte tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct BpeVocab<T: TokenType> {
    segmentation: SegmentationConfig,
    symbols: SymbolVocab<T>,
    specials: SpecialVocab<T>,
    merges: MergeTable<T>,
    byte_table: ByteTokenTable<T>,
}

impl<T: TokenType> BpeVocab<T> {
    /// Assemble a vocabulary from already consistent parts.
    ///
    /// # Arguments
    /// * `pattern` - the word split pattern.
    /// * `symbols` - the full symbol table.
    /// * `merges` - the merge rules, in rank order.
    /// * `special_words` - the reserved words; each must be present in `symbols`.
    pub fn new<P, S>(
        pattern: P,
        symbols: SymbolVocab<T>,
        merges: MergeTable<T>,
        special_words: &[S],
    ) -> Result<Self>
    where
        P: Into<String>,
        S: AsRef<str>,
    {
        let byte_tokens = BYTE_UNICODE
            .chars()
            .iter()
            .map(|&c| {
                let mut buf = [0_u8; 4];
                let text: &str = c.encode_utf8(&mut buf);
                symbols
                    .lookup_token(text)
                    .ok_or_else(|| corrupt(format!("missing base byte symbol {text:?}")))
            })
            .collect::<Result<Vec<T>>>()?;
        let byte_table = ByteTokenTable::from_byte_to_token(&byte_tokens)?;

        let mut specials = SpecialVocab::default();
        for word in special_words {
            let word = word.as_ref();
            let token = symbols
                .lookup_token(word)
                .ok_or_else(|| corrupt(format!("special token {word:?} is not in the vocabulary")))?;
            if byte_table.is_byte_token(token) {
                return Err(corrupt(format!(
                    "special token {word:?} collides with a base byte symbol"
                )));
            }
            specials.add_str_word(word, token);
        }

        let segmentation = SegmentationConfig::from_pattern(pattern).with_specials(specials.words());

        Ok(Self {
            segmentation,
            symbols,
            specials,
            merges,
            byte_table,
        })
    }

    /// Rebuild a vocabulary from its symbol table and symbol-level merge list.
    ///
    /// Every merge is checked against the symbols learned before it; any
    /// inconsistency rejects the whole artifact.
    ///
    /// # Arguments
    /// * `pattern` - the word split pattern.
    /// * `symbols` - the full symbol table.
    /// * `merge_pairs` - ``(left, right)`` symbol pairs, in rank order.
    /// * `declared_specials` - the special words recorded alongside the merges, if any.
    ///   When absent, the special words are every symbol which is neither a base
    ///   byte symbol nor a merge result.
    pub fn from_symbol_merges<P, L, R>(
        pattern: P,
        symbols: SymbolVocab<T>,
        merge_pairs: &[(L, R)],
        declared_specials: Option<&[String]>,
    ) -> Result<Self>
    where
        P: Into<String>,
        L: AsRef<str>,
        R: AsRef<str>,
    {
        let mut available: AHashSet<T> = AHashSet::with_capacity(symbols.len());
        for &c in BYTE_UNICODE.chars() {
            let mut buf = [0_u8; 4];
            let text: &str = c.encode_utf8(&mut buf);
            match symbols.lookup_token(text) {
                Some(token) => available.insert(token),
                None => return Err(corrupt(format!("missing base byte symbol {text:?}"))),
            };
        }

        let available_token = |available: &AHashSet<T>, rank: usize, symbol: &str| {
            symbols
                .lookup_token(symbol)
                .filter(|t| available.contains(t))
                .ok_or_else(|| {
                    corrupt(format!(
                        "merge {rank} references {symbol:?} before it is learned"
                    ))
                })
        };

        let mut produced: AHashSet<T> = AHashSet::with_capacity(merge_pairs.len());
        let mut merges = MergeTable::default();
        for (rank, (left, right)) in merge_pairs.iter().enumerate() {
            let (left, right) = (left.as_ref(), right.as_ref());
            let lt = available_token(&available, rank, left)?;
            let rt = available_token(&available, rank, right)?;

            let merged: Symbol = [left, right].concat().into();
            let mt = symbols.lookup_token(&merged).ok_or_else(|| {
                corrupt(format!(
                    "merge {rank} result {merged:?} is not in the vocabulary"
                ))
            })?;
            if mt <= lt || mt <= rt {
                return Err(corrupt(format!(
                    "merge {rank} result {merged:?} has id {mt}, not after its parts ({lt}, {rt})"
                )));
            }
            if available.contains(&mt) || !produced.insert(mt) {
                return Err(corrupt(format!(
                    "merge {rank} result {merged:?} was already learned"
                )));
            }
            merges
                .add_rule((lt, rt), mt)
                .map_err(|_| corrupt(format!("merge {rank} repeats ({left:?}, {right:?})")))?;
            available.insert(mt);
        }

        let derived: Vec<String> = symbols
            .iter()
            .filter(|(t, _)| !available.contains(t))
            .map(|(_, s)| s.to_string())
            .collect();

        if let Some(declared) = declared_specials {
            let declared_set: AHashSet<&str> = declared.iter().map(|s| s.as_str()).collect();
            let derived_set: AHashSet<&str> = derived.iter().map(|s| s.as_str()).collect();
            if declared_set.len() != declared.len() || declared_set != derived_set {
                return Err(corrupt(format!(
                    "special tokens disagree: merges declare {declared:?}, vocabulary implies {derived:?}"
                )));
            }
        }

        Self::new(pattern, symbols, merges, &derived)
    }

    /// The segmentation config.
    pub fn segmentation(&self) -> &SegmentationConfig {
        &self.segmentation
    }

    /// The word split pattern.
    pub fn pattern(&self) -> &str {
        self.segmentation.pattern()
    }

    /// The symbol table.
    pub fn symbols(&self) -> &SymbolVocab<T> {
        &self.symbols
    }

    /// The special tokens.
    pub fn specials(&self) -> &SpecialVocab<T> {
        &self.specials
    }

    /// The merge table.
    pub fn merges(&self) -> &MergeTable<T> {
        &self.merges
    }

    /// The base byte token table.
    pub fn byte_table(&self) -> &ByteTokenTable<T> {
        &self.byte_table
    }

    /// The number of tokens.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Return the token for a symbol, if any.
    pub fn lookup_token(
        &self,
        symbol: &str,
    ) -> Option<T> {
        self.symbols.lookup_token(symbol)
    }

    /// Return the symbol for a token, if any.
    pub fn lookup_symbol(
        &self,
        token: T,
    ) -> Option<&Symbol> {
        self.symbols.lookup_symbol(token)
    }

    /// Returns `true` if the token is a special token.
    pub fn is_special(
        &self,
        token: T,
    ) -> bool {
        self.specials.is_special(token)
    }

    /// The raw bytes a token stands for.
    ///
    /// Special tokens stand for their own UTF-8 text.
    pub fn token_bytes(
        &self,
        token: T,
    ) -> Option<Vec<u8>> {
        let symbol = self.lookup_symbol(token)?;
        if self.is_special(token) {
            Some(symbol.as_bytes().to_vec())
        } else {
            symbol_text_to_bytes(symbol)
        }
    }

    /// Build the full ``{ T -> Vec<u8> }`` dictionary.
    pub fn dictionary(&self) -> TokenToBytesMap<T> {
        self.symbols
            .iter()
            .filter_map(|(t, _)| self.token_bytes(t).map(|b| (t, b)))
            .collect()
    }

    /// Iterate ``(left, right, merged)`` symbols in rank order.
    pub fn merge_symbols(&self) -> impl Iterator<Item = (&Symbol, &Symbol, &Symbol)> + '_ {
        self.merges.iter().filter_map(
            |&MergeRule {
                 left,
                 right,
                 merged,
             }| {
                Some((
                    self.lookup_symbol(left)?,
                    self.lookup_symbol(right)?,
                    self.lookup_symbol(merged)?,
                ))
            },
        )
    }
}

impl<T: TokenType> TokenVocabIndex<T> for BpeVocab<T> {
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T> {
        self.symbols.unordered_tokens_iter()
    }

    fn max_token(&self) -> Option<T> {
        self.symbols.max_token()
    }
}
