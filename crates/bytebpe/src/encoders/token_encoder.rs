//! # Token Encoder Trait

use crate::BYTES_PER_TOKEN_HINT;
use crate::segmentation::{SpanRef, TextSegmentor};
use crate::types::TokenType;
use crate::vocab::{SpecialVocab, TokenVocabIndex};

/// A trait for token encoders.
///
/// Encoding never fails: every byte has a base token.
pub trait TokenEncoder<T: TokenType>: TokenVocabIndex<T> + Send + Sync {
    /// The pre-tokenizer.
    fn segmentor(&self) -> &TextSegmentor;

    /// The special tokens.
    fn specials(&self) -> &SpecialVocab<T>;

    /// Encode one word's bytes, and append the resulting tokens to `tokens`.
    fn encode_append_word(
        &self,
        word: &[u8],
        tokens: &mut Vec<T>,
    );

    /// Split text into spans, using the attached pattern and specials.
    fn split_spans<'a>(
        &self,
        text: &'a str,
    ) -> Vec<SpanRef<'a>> {
        self.segmentor().split_spans(text)
    }

    /// Encode text, and append the resulting tokens to `tokens`.
    ///
    /// Special words in the text become their reserved tokens.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, text, tokens)))]
    fn encode_append(
        &self,
        text: &str,
        tokens: &mut Vec<T>,
    ) {
        for span in self.split_spans(text) {
            match span {
                SpanRef::Normal(word) => self.encode_append_word(word.as_bytes(), tokens),
                SpanRef::Special(word) => match self.specials().lookup_token(word) {
                    Some(token) => tokens.push(token),
                    None => self.encode_append_word(word.as_bytes(), tokens),
                },
            }
        }
    }

    /// Encode text, treating special words as ordinary text.
    fn encode_append_ordinary(
        &self,
        text: &str,
        tokens: &mut Vec<T>,
    ) {
        let mut words = Vec::new();
        self.segmentor().split_append_normal_words(text, &mut words);
        for word in words {
            self.encode_append_word(word.as_str().as_bytes(), tokens);
        }
    }

    /// Encode arbitrary bytes.
    ///
    /// Valid UTF-8 runs are encoded as text; each invalid run is one word.
    fn encode_append_bytes(
        &self,
        bytes: &[u8],
        tokens: &mut Vec<T>,
    ) {
        for chunk in bytes.utf8_chunks() {
            if !chunk.valid().is_empty() {
                self.encode_append(chunk.valid(), tokens);
            }
            if !chunk.invalid().is_empty() {
                self.encode_append_word(chunk.invalid(), tokens);
            }
        }
    }

    /// Encode text into tokens.
    fn encode<S: AsRef<str>>(
        &self,
        text: S,
    ) -> Vec<T> {
        let text = text.as_ref();
        let mut tokens = with_capacity_for(text.len());
        self.encode_append(text, &mut tokens);
        tokens
    }

    /// Encode text into tokens, treating special words as ordinary text.
    fn encode_ordinary<S: AsRef<str>>(
        &self,
        text: S,
    ) -> Vec<T> {
        let text = text.as_ref();
        let mut tokens = with_capacity_for(text.len());
        self.encode_append_ordinary(text, &mut tokens);
        tokens
    }

    /// Encode arbitrary bytes into tokens.
    fn encode_bytes(
        &self,
        bytes: &[u8],
    ) -> Vec<T> {
        let mut tokens = with_capacity_for(bytes.len());
        self.encode_append_bytes(bytes, &mut tokens);
        tokens
    }

    /// Encode a batch of text into tokens.
    fn encode_batch(
        &self,
        batch: &[String],
    ) -> Vec<Vec<T>> {
        batch.iter().map(|s| self.encode(s)).collect()
    }
}

fn with_capacity_for<T>(num_bytes: usize) -> Vec<T> {
    let capacity = num_bytes as f64 / (BYTES_PER_TOKEN_HINT * 0.5);
    Vec::with_capacity(capacity as usize)
}
