//! # Byte-Level BPE Vocabulary Trainer

use crate::byte_level::{BYTE_UNICODE, ByteTokenTable};
use crate::errors::{Error, Result, config};
use crate::regex::{BYTE_LEVEL_WORD_PATTERN, compile_pattern};
use crate::segmentation::SegmentationConfig;
use crate::training::merge_job::MergeJob;
use crate::training::pair_index::{PairIndex, PairIndexOptions};
use crate::training::word::Word;
use crate::training::word_counter::{WordCountMap, WordCounter, WordCounterOptions};
use crate::types::{CountType, Pair, TokenType, try_token};
use crate::vocab::{BpeVocab, MergeTable, SymbolVocab};
use crate::{BASE_ALPHABET_SIZE, DEFAULT_MIN_FREQUENCY, DEFAULT_PARALLEL, DEFAULT_VOCAB_SIZE};
use ahash::AHashSet;
use dary_heap::OctonaryHeap;
use serde::{Deserialize, Serialize};

/// Words rewritten by one merge before the rewrite is spread over `rayon`.
#[cfg(feature = "rayon")]
const PARALLEL_REWRITE_MIN_WORDS: usize = 256;

/// Where special tokens are placed relative to the base byte alphabet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialPlacement {
    /// Ids `0..256` are the base alphabet; special tokens follow.
    #[default]
    AfterAlphabet,

    /// Special tokens take the first ids; the base alphabet follows.
    BeforeAlphabet,
}

/// Options for [`BpeTrainer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BpeTrainerOptions {
    /// Target vocabulary size, including the base alphabet and special tokens.
    pub vocab_size: usize,

    /// Minimum corpus count for a pair to be merged.
    pub min_frequency: usize,

    /// Reserved words, in id order.
    pub special_tokens: Vec<String>,

    /// Placement of the special tokens.
    pub special_placement: SpecialPlacement,

    /// The regex pattern used for word splitting.
    pub pattern: String,

    /// Whether to use parallel processing; requires the `rayon` feature.
    pub parallel: bool,
}

impl Default for BpeTrainerOptions {
    fn default() -> Self {
        Self::new(DEFAULT_VOCAB_SIZE)
    }
}

impl BpeTrainerOptions {
    /// Create new options.
    ///
    /// # Arguments
    /// * `vocab_size` - the target vocabulary size.
    pub fn new(vocab_size: usize) -> Self {
        Self {
            vocab_size,
            min_frequency: DEFAULT_MIN_FREQUENCY,
            special_tokens: Vec::new(),
            special_placement: SpecialPlacement::default(),
            pattern: BYTE_LEVEL_WORD_PATTERN.to_string(),
            parallel: DEFAULT_PARALLEL,
        }
    }

    /// Sets the vocab size.
    pub fn with_vocab_size(
        self,
        vocab_size: usize,
    ) -> Self {
        Self { vocab_size, ..self }
    }

    /// Sets the minimum pair frequency.
    pub fn with_min_frequency(
        self,
        min_frequency: usize,
    ) -> Self {
        Self {
            min_frequency,
            ..self
        }
    }

    /// Sets the special tokens.
    pub fn with_special_tokens<W, S>(
        self,
        special_tokens: W,
    ) -> Self
    where
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            special_tokens: special_tokens
                .into_iter()
                .map(|s| s.as_ref().to_string())
                .collect(),
            ..self
        }
    }

    /// Sets the special token placement.
    pub fn with_special_placement(
        self,
        special_placement: SpecialPlacement,
    ) -> Self {
        Self {
            special_placement,
            ..self
        }
    }

    /// Sets the regex pattern used for word splitting.
    pub fn with_pattern<P: Into<String>>(
        self,
        pattern: P,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            ..self
        }
    }

    /// Sets whether to use parallel processing; requires the `rayon` feature.
    pub fn with_parallel(
        self,
        parallel: bool,
    ) -> Self {
        Self { parallel, ..self }
    }

    /// The segmentation config implied by these options.
    pub fn segmentation(&self) -> SegmentationConfig {
        SegmentationConfig::from_pattern(self.pattern.as_str())
            .with_specials(&self.special_tokens)
    }

    /// The smallest vocabulary these options can describe, with no merges.
    pub fn base_vocab_size(&self) -> usize {
        BASE_ALPHABET_SIZE + self.special_tokens.len()
    }

    /// Validate the options for token type `T`.
    pub fn validate<T: TokenType>(&self) -> Result<()> {
        self.validate_untyped()?;
        try_token::<T>(self.vocab_size - 1)?;
        Ok(())
    }

    fn validate_untyped(&self) -> Result<()> {
        if self.min_frequency == 0 {
            return Err(config("min_frequency must be at least 1"));
        }

        let mut seen: AHashSet<&str> = AHashSet::with_capacity(self.special_tokens.len());
        for word in &self.special_tokens {
            if word.is_empty() {
                return Err(config("special tokens must be non-empty"));
            }
            if !seen.insert(word.as_str()) {
                return Err(config(format!("duplicate special token {word:?}")));
            }
            let mut chars = word.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                if BYTE_UNICODE.char_to_byte(c).is_some() {
                    return Err(config(format!(
                        "special token {word:?} collides with a base byte symbol"
                    )));
                }
            }
        }

        if self.vocab_size <= self.base_vocab_size() {
            return Err(config(format!(
                "vocab_size {} must exceed {} base symbols + {} special tokens",
                self.vocab_size,
                BASE_ALPHABET_SIZE,
                self.special_tokens.len()
            )));
        }

        compile_pattern(&self.pattern)
            .map_err(|err| config(format!("bad word pattern: {err}")))?;

        if self.parallel && !cfg!(feature = "rayon") {
            return Err(config(
                "parallel processing requires the `rayon` feature",
            ));
        }

        Ok(())
    }

    /// Initializes a [`BpeTrainer`] from these options.
    ///
    /// # Parameters
    /// * `C` - the type used to store word counts.
    pub fn init<C: CountType>(self) -> Result<BpeTrainer<C>> {
        BpeTrainer::init(self)
    }
}

/// Trainer for learning byte-level BPE vocabularies.
///
/// # Parameters
/// * `C` - the type used to store word counts.
#[derive(Debug)]
pub struct BpeTrainer<C: CountType = u64> {
    /// Trainer options.
    pub options: BpeTrainerOptions,

    /// The corpus word counter.
    pub word_counter: WordCounter<C>,
}

impl<C: CountType> BpeTrainer<C> {
    /// Initializes a [`BpeTrainer`], failing fast on invalid options.
    pub fn init(options: BpeTrainerOptions) -> Result<Self> {
        options.validate_untyped()?;

        let word_counter = WordCounter::new(
            WordCounterOptions::default()
                .with_segmentation(options.segmentation())
                .with_parallel(options.parallel),
        )?;

        Ok(Self {
            options,
            word_counter,
        })
    }

    /// Update the word counts inplace from a text string.
    pub fn update_from_text<S: AsRef<str>>(
        &mut self,
        text: S,
    ) {
        self.word_counter.update_from_text(text);
    }

    /// Update word counts inplace from a sample iterator.
    pub fn update_from_samples<I>(
        &mut self,
        samples: I,
    ) where
        I: IntoIterator,
        I::IntoIter: Send,
        I::Item: AsRef<str> + Send,
    {
        self.word_counter.update_from_samples(samples);
    }

    /// Trains a [`BpeVocab<T>`] over the counted corpus.
    pub fn train<T: TokenType>(self) -> Result<BpeVocab<T>> {
        let Self {
            options,
            word_counter,
        } = self;
        Self::train_from_word_counts(&options, word_counter.release())
    }

    /// Trains a [`BpeVocab<T>`] over a ``{ word -> count }`` map.
    ///
    /// The resulting vocab contains, in id order:
    /// * the 256 base byte symbols and the special tokens (per `special_placement`),
    /// * one symbol per learned merge, in merge order.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(options, word_counts)))]
    pub fn train_from_word_counts<T: TokenType>(
        options: &BpeTrainerOptions,
        word_counts: WordCountMap<C>,
    ) -> Result<BpeVocab<T>> {
        options.validate::<T>()?;

        if word_counts.is_empty() {
            return Err(Error::NoData(
                "the corpus contains no words to train on".to_string(),
            ));
        }

        let min_count = C::from_usize(options.min_frequency).ok_or_else(|| {
            config(format!(
                "min_frequency {} does not fit the count type",
                options.min_frequency
            ))
        })?;

        let (mut symbols, byte_table) = initial_symbols::<T>(options)?;

        let (mut words, word_counts): (Vec<Word<T>>, Vec<C>) = word_counts
            .into_iter()
            .map(|(text, count)| {
                let mut tokens = Vec::with_capacity(text.len());
                byte_table.append_tokens(text.as_bytes(), &mut tokens);
                (Word::new(tokens), count)
            })
            .unzip();

        let num_merges = options.vocab_size - symbols.len();
        log::info!(
            "Starting BPE training: {} unique words, up to {} merges",
            words.len(),
            num_merges
        );

        log::info!("Building pair index...");
        let mut index = PairIndex::index_unique_word_counts_table(
            &words,
            &word_counts,
            PairIndexOptions::default().with_parallel(options.parallel),
        );

        let zero = C::zero();

        log::info!("Building heap with {} unique pairs", index.pair_counts.len());
        let mut heap = OctonaryHeap::with_capacity(index.pair_counts.len());
        heap.extend(
            index
                .pair_counts
                .iter()
                .filter(|&(_, &count)| count > zero)
                .filter_map(|(&pair, &count)| new_job(&symbols, pair, count)),
        );

        log::info!("Starting merge loop");
        let mut merges = MergeTable::default();
        let mut last_log_percent = 0;
        let mut skipped = 0;
        let mut below_min_frequency = false;

        while symbols.len() < options.vocab_size {
            let Some(mut job) = heap.pop() else {
                break;
            };

            // Lazy refresh; counts of existing pairs only ever decrease.
            let current = index.pair_counts.get(&job.pair).copied().unwrap_or(zero);
            if job.count != current {
                job.count = current;
                if current > zero {
                    heap.push(job);
                }
                continue;
            }

            if job.count < min_count {
                below_min_frequency = true;
                break;
            }

            let merged = [job.left.as_str(), job.right.as_str()].concat();
            if symbols.contains(&merged) {
                log::warn!(
                    "Skipping merge {:?} + {:?}: {:?} is already in the vocabulary",
                    job.left,
                    job.right,
                    merged
                );
                skipped += 1;
                continue;
            }

            let new_token = symbols.add_symbol(merged)?;
            merges.add_rule(job.pair, new_token)?;

            let new_pairs = merge_words(
                &mut words,
                &word_counts,
                &mut index,
                job.pair,
                new_token,
                options.parallel,
            );
            index.pair_counts.remove(&job.pair);

            for pair in new_pairs {
                let count = index.pair_counts.get(&pair).copied().unwrap_or(zero);
                if count > zero {
                    heap.extend(new_job(&symbols, pair, count));
                }
            }

            // Log progress every 1%
            let merges_done = merges.len();
            let current_percent = (merges_done * 100) / num_merges;
            if current_percent > last_log_percent {
                log::info!(
                    "Progress: {}% ({}/{} merges) - Last merge: {:?} + {:?} -> {} (frequency: {})",
                    current_percent,
                    merges_done,
                    num_merges,
                    job.left,
                    job.right,
                    new_token,
                    job.count
                );
                last_log_percent = current_percent;
            }
        }

        if below_min_frequency {
            log::info!(
                "Stopped early: no remaining pair reaches min_frequency {}",
                options.min_frequency
            );
        }
        if skipped > 0 {
            log::info!("Skipped {skipped} merges whose result was already a symbol");
        }

        merges.shrink_to_fit();
        symbols.shrink_to_fit();

        log::info!(
            "Finished training: {} merges completed, vocabulary size {}",
            merges.len(),
            symbols.len()
        );

        BpeVocab::new(
            options.pattern.as_str(),
            symbols,
            merges,
            &options.special_tokens,
        )
    }
}

/// Build the pre-merge symbol table and its base byte tokens.
fn initial_symbols<T: TokenType>(
    options: &BpeTrainerOptions,
) -> Result<(SymbolVocab<T>, ByteTokenTable<T>)> {
    let mut symbols = SymbolVocab::with_capacity(options.vocab_size);

    let add_alphabet = |symbols: &mut SymbolVocab<T>| -> Result<()> {
        for &c in BYTE_UNICODE.chars() {
            symbols.add_symbol(c.to_string())?;
        }
        Ok(())
    };
    let add_specials = |symbols: &mut SymbolVocab<T>| -> Result<()> {
        for word in &options.special_tokens {
            symbols.add_symbol(word.as_str())?;
        }
        Ok(())
    };

    let offset = match options.special_placement {
        SpecialPlacement::AfterAlphabet => {
            add_alphabet(&mut symbols)?;
            add_specials(&mut symbols)?;
            0
        }
        SpecialPlacement::BeforeAlphabet => {
            add_specials(&mut symbols)?;
            add_alphabet(&mut symbols)?;
            options.special_tokens.len()
        }
    };

    Ok((symbols, ByteTokenTable::with_offset(offset)?))
}

fn new_job<T: TokenType, C: CountType>(
    symbols: &SymbolVocab<T>,
    pair: Pair<T>,
    count: C,
) -> Option<MergeJob<T, C>> {
    Some(MergeJob {
        count,
        pair,
        left: symbols.lookup_symbol(pair.0)?.clone(),
        right: symbols.lookup_symbol(pair.1)?.clone(),
    })
}

/// Apply `pair -> new_token` to every word indexed under `pair`.
///
/// # Returns
/// The pairs created by the merge.
fn merge_words<T: TokenType, C: CountType>(
    words: &mut [Word<T>],
    word_counts: &[C],
    index: &mut PairIndex<T, C>,
    pair: Pair<T>,
    new_token: T,
    parallel: bool,
) -> Vec<Pair<T>> {
    let mut word_indices: Vec<usize> = index
        .pair_to_word_index
        .remove(&pair)
        .map(|s| s.into_iter().collect())
        .unwrap_or_default();
    word_indices.sort_unstable();

    let mut new_pairs: AHashSet<Pair<T>> = AHashSet::new();

    #[cfg(feature = "rayon")]
    if parallel && word_indices.len() >= PARALLEL_REWRITE_MIN_WORDS {
        use rayon::prelude::*;

        let mut batch: Vec<(usize, Word<T>)> = word_indices
            .iter()
            .map(|&i| (i, std::mem::take(&mut words[i])))
            .collect();

        let deltas: Vec<Vec<(Pair<T>, i32)>> = batch
            .par_iter_mut()
            .map(|(_, word)| word.merge_pair(pair, new_token))
            .collect();

        for ((i, word), word_deltas) in batch.into_iter().zip(deltas) {
            words[i] = word;
            for (p, delta) in word_deltas {
                index.apply_delta(i, p, delta, word_counts[i]);
                if delta > 0 {
                    new_pairs.insert(p);
                }
            }
        }

        return new_pairs.into_iter().collect();
    }
    #[cfg(not(feature = "rayon"))]
    let _ = parallel;

    for i in word_indices {
        let count = word_counts[i];
        words[i].merge_pair_cb(pair, new_token, &mut |p, delta| {
            index.apply_delta(i, p, delta, count);
            if delta > 0 {
                new_pairs.insert(p);
            }
        });
    }

    new_pairs.into_iter().collect()
}
