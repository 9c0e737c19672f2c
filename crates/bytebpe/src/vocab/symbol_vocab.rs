//! # Symbol ``{ Symbol <-> T }`` Vocabulary

use crate::errors::{Result, config};
use crate::types::{Symbol, SymbolTokenMap, TokenType, token_index, try_token};
use crate::vocab::vocab_index::TokenVocabIndex;

/// Insertion-ordered ``{ Symbol <-> T }`` map.
///
/// Ids are dense: the `i`-th inserted symbol has id `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolVocab<T: TokenType> {
    /// Symbols, indexed by id.
    symbols: Vec<Symbol>,

    /// Map of ``{ Symbol -> T }``.
    index: SymbolTokenMap<T>,
}

impl<T: TokenType> SymbolVocab<T> {
    /// Create an empty vocabulary with room for `capacity` symbols.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            symbols: Vec::with_capacity(capacity),
            index: SymbolTokenMap::with_capacity(capacity),
        }
    }

    /// Build a vocabulary from symbols in id order.
    pub fn from_symbols<I, S>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let mut vocab = Self::default();
        for symbol in symbols {
            vocab.add_symbol(symbol)?;
        }
        Ok(vocab)
    }

    /// The number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if the vocabulary contains no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Append a symbol, assigning it the next free id.
    ///
    /// Fails if the symbol is already present or the id does not fit in `T`.
    pub fn add_symbol<S: Into<Symbol>>(
        &mut self,
        symbol: S,
    ) -> Result<T> {
        let symbol = symbol.into();
        if self.index.contains_key(&symbol) {
            return Err(config(format!("duplicate symbol: {symbol:?}")));
        }

        let token = try_token::<T>(self.symbols.len())?;
        self.index.insert(symbol.clone(), token);
        self.symbols.push(symbol);
        Ok(token)
    }

    /// Returns `true` if the symbol is present.
    pub fn contains(
        &self,
        symbol: &str,
    ) -> bool {
        self.index.contains_key(symbol)
    }

    /// Return the token for a symbol, if any.
    pub fn lookup_token(
        &self,
        symbol: &str,
    ) -> Option<T> {
        self.index.get(symbol).copied()
    }

    /// Return the symbol for a token, if any.
    pub fn lookup_symbol(
        &self,
        token: T,
    ) -> Option<&Symbol> {
        self.symbols.get(token_index(token))
    }

    /// Symbols in id order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Iterate ``(token, symbol)`` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (T, &Symbol)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .filter_map(|(i, s)| T::from_usize(i).map(|t| (t, s)))
    }

    /// Shrinks the capacity of the underlying data structures to fit its current size.
    pub fn shrink_to_fit(&mut self) {
        self.symbols.shrink_to_fit();
        self.index.shrink_to_fit();
    }
}

impl<T: TokenType> TokenVocabIndex<T> for SymbolVocab<T> {
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(t, _)| t)
    }

    fn max_token(&self) -> Option<T> {
        self.len().checked_sub(1).and_then(T::from_usize)
    }
}
