//! # Special Tokens Registry

use crate::types::{Symbol, SymbolTokenMap, TokenType};
use crate::vocab::vocab_index::TokenVocabIndex;
use ahash::AHashSet;

/// Reserved ``{ Symbol -> T }`` entries.
///
/// Special tokens are matched verbatim in input text, are emitted as single
/// tokens, decode to their own UTF-8 text, and never take part in merging.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SpecialVocab<T: TokenType> {
    /// Entries, in registration order.
    entries: Vec<(Symbol, T)>,

    /// Map of ``{ Symbol -> T }``.
    index: SymbolTokenMap<T>,

    /// Reserved token ids.
    tokens: AHashSet<T>,
}

impl<T: TokenType> SpecialVocab<T> {
    /// Get the number of special tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no special tokens.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a special token.
    ///
    /// Re-registering an existing word replaces its token.
    pub fn add_str_word(
        &mut self,
        word: &str,
        token: T,
    ) {
        if let Some(old) = self.index.insert(word.into(), token) {
            self.tokens.remove(&old);
            self.entries.retain(|(w, _)| w.as_str() != word);
        }
        self.entries.push((word.into(), token));
        self.tokens.insert(token);
    }

    /// Extend the registry with the given special words.
    pub fn with_special_words<W, S>(
        self,
        special_words: W,
    ) -> Self
    where
        W: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
    {
        let mut vocab = self;
        for (word, token) in special_words {
            vocab.add_str_word(word.as_ref(), token);
        }
        vocab
    }

    /// Return the associated token for the word, if any.
    pub fn lookup_token(
        &self,
        word: &str,
    ) -> Option<T> {
        self.index.get(word).copied()
    }

    /// Returns `true` if the token is reserved.
    pub fn is_special(
        &self,
        token: T,
    ) -> bool {
        self.tokens.contains(&token)
    }

    /// Iterate ``(word, token)`` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, T)> + '_ {
        self.entries.iter().map(|(w, t)| (w.as_str(), *t))
    }

    /// The special words, in registration order.
    pub fn words(&self) -> Vec<String> {
        self.entries.iter().map(|(w, _)| w.to_string()).collect()
    }
}

impl<T: TokenType> TokenVocabIndex<T> for SpecialVocab<T> {
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T> {
        self.tokens.iter().copied()
    }
}
