//! # Parallel Decoder

use crate::decoders::{TokenDecodeContext, TokenDecoder};
use crate::errors::Result;
use crate::types::TokenType;
use crate::vocab::TokenVocabIndex;

/// Batch-Level Parallel Decoder Wrapper.
///
/// Enables ``rayon`` decoding of batches when available.
#[derive(Clone, Debug)]
pub struct ParallelRayonDecoder<T: TokenType, D: TokenDecoder<T>> {
    /// Wrapped decoder.
    pub inner: D,

    _marker: std::marker::PhantomData<T>,
}

impl<T, D> ParallelRayonDecoder<T, D>
where
    T: TokenType,
    D: TokenDecoder<T>,
{
    /// Create a new parallel token decoder.
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T, D> TokenVocabIndex<T> for ParallelRayonDecoder<T, D>
where
    T: TokenType,
    D: TokenDecoder<T>,
{
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T> {
        self.inner.unordered_tokens_iter()
    }
}

impl<T, D> TokenDecoder<T> for ParallelRayonDecoder<T, D>
where
    T: TokenType,
    D: TokenDecoder<T>,
{
    fn incremental_decode(
        &self,
        ctx: &mut TokenDecodeContext<T>,
    ) -> bool {
        self.inner.incremental_decode(ctx)
    }

    fn try_decode_batch_to_bytes(
        &self,
        batch: &[Vec<T>],
    ) -> Result<Vec<Vec<u8>>> {
        use rayon::prelude::*;

        batch
            .into_par_iter()
            .map(|tokens| self.try_decode_to_bytes(tokens))
            .collect()
    }

    fn try_decode_batch_to_strings(
        &self,
        batch: &[Vec<T>],
    ) -> Result<Vec<String>> {
        use rayon::prelude::*;

        batch
            .into_par_iter()
            .map(|tokens| self.try_decode_to_string(tokens))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoders::DictionaryDecoder;
    use crate::encoders::{MergeRankEncoder, TokenEncoder};
    use crate::errors::Error;
    use crate::training::BpeTrainerOptions;
    use crate::types::{check_is_send, check_is_sync};
    use crate::vocab::BpeVocab;
    use std::sync::Arc;

    #[test]
    fn test_decoder() {
        type T = u16;

        let samples = vec![
            "hello world",
            "hello san francisco",
            "it's not the heat, it's the salt",
        ];

        let mut trainer = BpeTrainerOptions::new(1000)
            .with_min_frequency(1)
            .init::<u32>()
            .unwrap();
        trainer.update_from_samples(samples.iter());

        let vocab: Arc<BpeVocab<T>> = Arc::new(trainer.train().unwrap());
        let encoder = MergeRankEncoder::new(vocab.clone()).unwrap();

        let decoder = ParallelRayonDecoder::new(DictionaryDecoder::from_bpe_vocab(&vocab));
        check_is_send(&decoder);
        check_is_sync(&decoder);

        for sample in samples.iter() {
            let tokens = encoder.encode(sample);
            let decoded = decoder.try_decode_to_string(&tokens).unwrap();
            assert_eq!(&decoded, sample);
        }

        // Byte tokens alone also decode.
        let token_batch: Vec<Vec<T>> = samples
            .iter()
            .map(|s| {
                s.as_bytes()
                    .iter()
                    .map(|&b| vocab.byte_table().get_token(b))
                    .collect()
            })
            .collect();

        let string_batch = decoder.try_decode_batch_to_strings(&token_batch).unwrap();
        assert_eq!(string_batch, samples);

        let bad_batch = vec![vec![0, 1], vec![T::MAX]];
        assert!(matches!(
            decoder.try_decode_batch_to_bytes(&bad_batch),
            Err(Error::Decode { .. })
        ));
    }
}
