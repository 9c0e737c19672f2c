//! # Parallel Encoder

use crate::encoders::TokenEncoder;
use crate::segmentation::TextSegmentor;
use crate::types::TokenType;
use crate::vocab::{SpecialVocab, TokenVocabIndex};

/// Batch-Level Parallel Encoder Wrapper.
///
/// Enables ``rayon`` encoding of batches when available.
#[derive(Clone, Debug)]
pub struct ParallelRayonEncoder<T: TokenType, D: TokenEncoder<T>> {
    /// Inner encoder.
    pub inner: D,

    _marker: std::marker::PhantomData<T>,
}

impl<T, D> ParallelRayonEncoder<T, D>
where
    T: TokenType,
    D: TokenEncoder<T>,
{
    /// Create a new parallel encoder.
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T, D> TokenVocabIndex<T> for ParallelRayonEncoder<T, D>
where
    T: TokenType,
    D: TokenEncoder<T>,
{
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T> {
        self.inner.unordered_tokens_iter()
    }

    fn max_token(&self) -> Option<T> {
        self.inner.max_token()
    }
}

impl<T, D> TokenEncoder<T> for ParallelRayonEncoder<T, D>
where
    T: TokenType,
    D: TokenEncoder<T>,
{
    fn segmentor(&self) -> &TextSegmentor {
        self.inner.segmentor()
    }

    fn specials(&self) -> &SpecialVocab<T> {
        self.inner.specials()
    }

    fn encode_append_word(
        &self,
        word: &[u8],
        tokens: &mut Vec<T>,
    ) {
        self.inner.encode_append_word(word, tokens)
    }

    fn encode_batch(
        &self,
        batch: &[String],
    ) -> Vec<Vec<T>> {
        use rayon::prelude::*;
        batch.par_iter().map(|text| self.encode(text)).collect()
    }
}
