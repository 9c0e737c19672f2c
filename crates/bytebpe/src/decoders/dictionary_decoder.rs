//! # Dictionary ``{ T -> Vec<u8> }`` Token Decoder

use crate::decoders::decode_context::TokenDecodeContext;
use crate::decoders::token_decoder::TokenDecoder;
use crate::types::{TokenToBytesMap, TokenType};
use crate::vocab::{BpeVocab, TokenVocabIndex};

/// A token dictionary [`TokenDecoder<T>`].
#[derive(Clone, Debug)]
pub struct DictionaryDecoder<T: TokenType> {
    /// Token to bytes mapping.
    pub token_to_bytes: TokenToBytesMap<T>,
}

impl<T: TokenType> DictionaryDecoder<T> {
    /// Creates a new Decoder.
    pub fn new(token_to_bytes: TokenToBytesMap<T>) -> Self {
        Self { token_to_bytes }
    }

    /// Creates a decoder for every token of the vocabulary.
    pub fn from_bpe_vocab(vocab: &BpeVocab<T>) -> Self {
        Self::new(vocab.dictionary())
    }
}

impl<T: TokenType> TokenVocabIndex<T> for DictionaryDecoder<T> {
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T> {
        self.token_to_bytes.keys().copied()
    }
}

impl<T: TokenType> TokenDecoder<T> for DictionaryDecoder<T> {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, ctx)))]
    fn incremental_decode(
        &self,
        ctx: &mut TokenDecodeContext<T>,
    ) -> bool {
        while let Some(t) = ctx.stack.pop() {
            if let Some(w) = self.token_to_bytes.get(&t) {
                ctx.buf.extend_from_slice(w.as_slice());
            } else {
                ctx.stack.push(t);
                break;
            }
        }
        ctx.stack.is_empty()
    }
}
