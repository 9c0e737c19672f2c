//! # Rank-Priority Merge Encoder

use crate::encoders::token_encoder::TokenEncoder;
use crate::errors::Result;
use crate::segmentation::TextSegmentor;
use crate::types::{BytesToTokenMap, Pair, TokenType};
use crate::vocab::{BpeVocab, SpecialVocab, TokenVocabIndex};
use std::sync::Arc;

/// A [`TokenEncoder`] which applies the [`BpeVocab`] merge table by rank.
///
/// Per word: start from the base byte tokens, then repeatedly merge the
/// present pair with the lowest merge rank, until no present pair has a rule.
#[derive(Clone, Debug)]
pub struct MergeRankEncoder<T: TokenType> {
    /// The vocabulary.
    pub vocab: Arc<BpeVocab<T>>,

    segmentor: TextSegmentor,

    /// Words whose merge result is a single token.
    whole_words: BytesToTokenMap<T>,
}

impl<T: TokenType> MergeRankEncoder<T> {
    /// Create an encoder for the vocabulary.
    pub fn new(vocab: Arc<BpeVocab<T>>) -> Result<Self> {
        let segmentor = TextSegmentor::from_config(vocab.segmentation())?;
        let mut encoder = Self {
            vocab,
            segmentor,
            whole_words: Default::default(),
        };
        encoder.whole_words = encoder.build_whole_words();
        Ok(encoder)
    }

    /// Map the bytes of every merged token which its own bytes merge back into.
    ///
    /// Not every merged token qualifies: a lower ranked rule can split its
    /// bytes differently, and then the rank order decides.
    fn build_whole_words(&self) -> BytesToTokenMap<T> {
        let mut whole_words = BytesToTokenMap::default();
        let mut tokens = Vec::new();
        for rule in self.vocab.merges().iter() {
            let Some(bytes) = self.vocab.token_bytes(rule.merged) else {
                continue;
            };
            tokens.clear();
            self.append_tokens(&bytes, &mut tokens);
            self.merge_span(&mut tokens, 0);
            if tokens.as_slice() == [rule.merged] {
                whole_words.insert(bytes, rule.merged);
            }
        }
        whole_words.shrink_to_fit();
        whole_words
    }

    /// Compiler Hint.
    fn lookup_word(
        &self,
        word: &[u8],
    ) -> Option<T> {
        self.whole_words.get(word).copied()
    }

    /// Compiler Hint.
    fn lookup_rank(
        &self,
        pair: &Pair<T>,
    ) -> usize {
        self.vocab.merges().rank(pair).unwrap_or(usize::MAX)
    }

    /// Compiler Hint.
    fn append_tokens(
        &self,
        word: &[u8],
        tokens: &mut Vec<T>,
    ) {
        self.vocab.byte_table().append_tokens(word, tokens);
    }

    /// Merge `tokens[start..]` in place.
    fn merge_span(
        &self,
        tokens: &mut Vec<T>,
        start: usize,
    ) {
        // ranks[i] is the rank of (tokens[start + i], tokens[start + i + 1]),
        // or usize::MAX when the pair has no rule.
        let mut ranks: Vec<usize> = tokens[start..]
            .windows(2)
            .map(|w| self.lookup_rank(&(w[0], w[1])))
            .collect();

        while let Some((rank, i)) = ranks
            .iter()
            .enumerate()
            .filter(|&(_, &rank)| rank != usize::MAX)
            .map(|(i, &rank)| (rank, i))
            .min()
        {
            let Some(rule) = self.vocab.merges().get(rank) else {
                break;
            };

            tokens[start + i] = rule.merged;
            tokens.remove(start + i + 1);
            ranks.remove(i);

            if i > 0 {
                ranks[i - 1] = self.lookup_rank(&(tokens[start + i - 1], tokens[start + i]));
            }
            if i < ranks.len() {
                ranks[i] = self.lookup_rank(&(tokens[start + i], tokens[start + i + 1]));
            }
        }
    }
}

impl<T: TokenType> TokenVocabIndex<T> for MergeRankEncoder<T> {
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T> {
        self.vocab.unordered_tokens_iter()
    }

    fn max_token(&self) -> Option<T> {
        self.vocab.max_token()
    }
}

impl<T: TokenType> TokenEncoder<T> for MergeRankEncoder<T> {
    fn segmentor(&self) -> &TextSegmentor {
        &self.segmentor
    }

    fn specials(&self) -> &SpecialVocab<T> {
        self.vocab.specials()
    }

    fn encode_append_word(
        &self,
        word: &[u8],
        tokens: &mut Vec<T>,
    ) {
        if let Some(token) = self.lookup_word(word) {
            tokens.push(token);
            return;
        }

        let start = tokens.len();
        self.append_tokens(word, tokens);
        if tokens.len() - start >= 2 {
            self.merge_span(tokens, start);
        }
    }
}
