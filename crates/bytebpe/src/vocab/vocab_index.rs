//! # Token Vocabulary Index

use crate::types::TokenType;

/// Common traits for token vocabularies.
pub trait TokenVocabIndex<T: TokenType>: Send + Sync {
    /// Returns an iterator over all tokens, in no particular order.
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T>;

    /// Returns a sorted vector of all tokens.
    fn sorted_tokens(&self) -> Vec<T> {
        let mut tokens: Vec<T> = self.unordered_tokens_iter().collect();
        tokens.sort();
        tokens
    }

    /// Gets the highest ranked token, if any.
    fn max_token(&self) -> Option<T> {
        self.unordered_tokens_iter().max()
    }
}
