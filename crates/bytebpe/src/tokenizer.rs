//! # Byte-Level BPE Tokenizer
//!
//! [`ByteLevelBpeTokenizer`] bundles an immutable [`BpeVocab`] with an encoder
//! and a decoder over it; it is the runtime entry point:
//! * [`ByteLevelBpeTokenizer::train`] / [`ByteLevelBpeTokenizer::train_from_files`],
//! * [`ByteLevelBpeTokenizer::save`] / [`ByteLevelBpeTokenizer::load`],
//! * [`ByteLevelBpeTokenizer::encode`] / [`ByteLevelBpeTokenizer::decode`].
//!
//! The tokenizer is `Send + Sync` and cheap to clone; the vocabulary is shared.

use crate::decoders::{DictionaryDecoder, TokenDecoder};
use crate::encoders::{MergeRankEncoder, TokenEncoder};
use crate::errors::Result;
use crate::regex::BYTE_LEVEL_WORD_PATTERN;
use crate::training::BpeTrainerOptions;
use crate::types::TokenType;
use crate::vocab::io::{load_bpe_vocab_from_dir, load_bpe_vocab_from_paths, save_bpe_vocab_to_dir};
use crate::vocab::{BpeVocab, TokenVocabIndex};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(feature = "rayon")]
type BatchEncoder<T> = crate::rayon::ParallelRayonEncoder<T, MergeRankEncoder<T>>;
#[cfg(not(feature = "rayon"))]
type BatchEncoder<T> = MergeRankEncoder<T>;

#[cfg(feature = "rayon")]
type BatchDecoder<T> = crate::rayon::ParallelRayonDecoder<T, DictionaryDecoder<T>>;
#[cfg(not(feature = "rayon"))]
type BatchDecoder<T> = DictionaryDecoder<T>;

/// The result of encoding one text.
///
/// `tokens[i]` is the symbol text of `ids[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Encoding<T: TokenType> {
    /// The symbol texts, in byte-mapped form (a leading space reads as `Ġ`).
    pub tokens: Vec<String>,

    /// The token ids.
    pub ids: Vec<T>,
}

impl<T: TokenType> Encoding<T> {
    /// The number of tokens.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Is this encoding empty?
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Byte-level BPE tokenizer.
#[derive(Clone, Debug)]
pub struct ByteLevelBpeTokenizer<T: TokenType = u32> {
    vocab: Arc<BpeVocab<T>>,
    encoder: BatchEncoder<T>,
    decoder: BatchDecoder<T>,
}

impl<T: TokenType> ByteLevelBpeTokenizer<T> {
    /// Build a tokenizer over a vocabulary.
    pub fn from_vocab<V: Into<Arc<BpeVocab<T>>>>(vocab: V) -> Result<Self> {
        let vocab = vocab.into();

        let encoder = MergeRankEncoder::new(vocab.clone())?;
        let decoder = DictionaryDecoder::from_bpe_vocab(&vocab);

        #[cfg(feature = "rayon")]
        let (encoder, decoder) = (
            crate::rayon::ParallelRayonEncoder::new(encoder),
            crate::rayon::ParallelRayonDecoder::new(decoder),
        );

        Ok(Self {
            vocab,
            encoder,
            decoder,
        })
    }

    /// Train a tokenizer over a stream of text records.
    ///
    /// # Errors
    /// * [`Error::Config`](crate::errors::Error::Config) - invalid options.
    /// * [`Error::NoData`](crate::errors::Error::NoData) - the samples contain no words.
    pub fn train<I>(
        samples: I,
        options: BpeTrainerOptions,
    ) -> Result<Self>
    where
        I: IntoIterator,
        I::IntoIter: Send,
        I::Item: AsRef<str> + Send,
    {
        options.validate::<T>()?;
        let mut trainer = options.init::<u64>()?;
        trainer.update_from_samples(samples);
        Self::from_vocab(trainer.train::<T>()?)
    }

    /// Train a tokenizer over text files; each non-blank line is one record.
    pub fn train_from_files<P: AsRef<Path>>(
        paths: &[P],
        options: BpeTrainerOptions,
    ) -> Result<Self> {
        options.validate::<T>()?;
        let mut trainer = options.init::<u64>()?;
        for path in paths {
            let path = path.as_ref();
            log::info!("Reading training text from {}", path.display());
            let text = std::fs::read_to_string(path)?;
            trainer.update_from_samples(text.lines().filter(|line| !line.trim().is_empty()));
        }
        Self::from_vocab(trainer.train::<T>()?)
    }

    /// Save `vocab.json` and `merges.txt` to `dir`.
    ///
    /// # Returns
    /// The paths written.
    pub fn save<P: AsRef<Path>>(
        &self,
        dir: P,
    ) -> Result<(PathBuf, PathBuf)> {
        save_bpe_vocab_to_dir(&self.vocab, dir, None)
    }

    /// Save `{prefix}-vocab.json` and `{prefix}-merges.txt` to `dir`.
    pub fn save_with_prefix<P: AsRef<Path>>(
        &self,
        dir: P,
        prefix: &str,
    ) -> Result<(PathBuf, PathBuf)> {
        save_bpe_vocab_to_dir(&self.vocab, dir, Some(prefix))
    }

    /// Load a tokenizer saved by [`Self::save`], using the byte-level split pattern.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Self::load_with_pattern(dir, None, BYTE_LEVEL_WORD_PATTERN)
    }

    /// Load a tokenizer from explicit `vocab.json` and `merges.txt` paths.
    pub fn load_from_files<V, M>(
        vocab_path: V,
        merges_path: M,
    ) -> Result<Self>
    where
        V: AsRef<Path>,
        M: AsRef<Path>,
    {
        Self::from_vocab(load_bpe_vocab_from_paths(
            vocab_path,
            merges_path,
            BYTE_LEVEL_WORD_PATTERN,
        )?)
    }

    /// Load a tokenizer from `dir`, with an optional file prefix and a split pattern.
    pub fn load_with_pattern<P: AsRef<Path>>(
        dir: P,
        prefix: Option<&str>,
        pattern: &str,
    ) -> Result<Self> {
        Self::from_vocab(load_bpe_vocab_from_dir(dir, prefix, pattern)?)
    }

    /// The shared vocabulary.
    pub fn vocab(&self) -> &Arc<BpeVocab<T>> {
        &self.vocab
    }

    /// The number of tokens in the vocabulary.
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// The special tokens, in id order.
    pub fn special_tokens(&self) -> Vec<(&str, T)> {
        let mut specials: Vec<(&str, T)> = self.vocab.specials().iter().collect();
        specials.sort_by_key(|&(_, token)| token);
        specials
    }

    /// Iterate the merge rules as ``(left, right)`` symbol texts, in rank order.
    pub fn merge_rules(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.vocab
            .merge_symbols()
            .map(|(left, right, _)| (left.as_str(), right.as_str()))
    }

    /// Look up the id of a symbol.
    pub fn token_to_id(
        &self,
        symbol: &str,
    ) -> Option<T> {
        self.vocab.lookup_token(symbol)
    }

    /// Look up the symbol text of an id.
    pub fn id_to_token(
        &self,
        id: T,
    ) -> Option<&str> {
        self.vocab.lookup_symbol(id).map(|s| s.as_str())
    }

    fn to_encoding(
        &self,
        ids: Vec<T>,
    ) -> Encoding<T> {
        let tokens = ids
            .iter()
            .map(|&id| self.id_to_token(id).unwrap_or_default().to_string())
            .collect();
        Encoding { tokens, ids }
    }

    /// Encode text; special tokens in the text become their reserved ids.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, text)))]
    pub fn encode<S: AsRef<str>>(
        &self,
        text: S,
    ) -> Encoding<T> {
        self.to_encoding(self.encoder.encode(text))
    }

    /// Encode text, treating special-token text as ordinary text.
    pub fn encode_ordinary<S: AsRef<str>>(
        &self,
        text: S,
    ) -> Encoding<T> {
        self.to_encoding(self.encoder.encode_ordinary(text))
    }

    /// Encode arbitrary bytes, which need not be valid UTF-8.
    pub fn encode_bytes(
        &self,
        bytes: &[u8],
    ) -> Encoding<T> {
        self.to_encoding(self.encoder.encode_bytes(bytes))
    }

    /// Encode a batch of texts.
    pub fn encode_batch(
        &self,
        batch: &[String],
    ) -> Vec<Encoding<T>> {
        self.encoder
            .encode_batch(batch)
            .into_iter()
            .map(|ids| self.to_encoding(ids))
            .collect()
    }

    /// Decode ids into text.
    ///
    /// Invalid UTF-8 (from a partial id sequence) is replaced lossily.
    ///
    /// # Errors
    /// [`Error::Decode`](crate::errors::Error::Decode) for an id outside the vocabulary.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, ids)))]
    pub fn decode(
        &self,
        ids: &[T],
    ) -> Result<String> {
        self.decoder.try_decode_to_string(ids)
    }

    /// Decode ids into the exact bytes they stand for.
    pub fn decode_to_bytes(
        &self,
        ids: &[T],
    ) -> Result<Vec<u8>> {
        self.decoder.try_decode_to_bytes(ids)
    }

    /// Decode a batch of id sequences.
    pub fn decode_batch(
        &self,
        batch: &[Vec<T>],
    ) -> Result<Vec<String>> {
        self.decoder.try_decode_batch_to_strings(batch)
    }
}

impl<T: TokenType> TokenVocabIndex<T> for ByteLevelBpeTokenizer<T> {
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T> {
        self.vocab.unordered_tokens_iter()
    }

    fn max_token(&self) -> Option<T> {
        self.vocab.max_token()
    }
}
