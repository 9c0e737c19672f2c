//! # Pair Counts / Word Indexing

use crate::training::word::Word;
use crate::types::{CountType, Pair, TokenType};
use ahash::{AHashMap, AHashSet};

/// ``{ Pair -> count }`` map.
pub type PairCountMap<T, C> = AHashMap<Pair<T>, C>;

/// ``{ Pair -> word indices }`` map.
pub type PairWordIndex<T> = AHashMap<Pair<T>, AHashSet<usize>>;

/// Options for building a [`PairIndex`].
#[derive(Debug, Clone, Copy)]
pub struct PairIndexOptions {
    /// Whether to use parallel processing for indexing.
    ///
    /// Requires the `rayon` feature to be enabled.
    pub parallel: bool,
}

impl Default for PairIndexOptions {
    fn default() -> Self {
        Self {
            parallel: crate::DEFAULT_PARALLEL,
        }
    }
}

impl PairIndexOptions {
    /// Sets the parallel processing flag.
    pub fn with_parallel(
        self,
        parallel: bool,
    ) -> Self {
        Self { parallel }
    }
}

/// An index of [`Pair`]s over a table of unique ``(word, count)``.
#[derive(Debug, Default)]
pub struct PairIndex<T: TokenType, C: CountType> {
    /// ``sum(words[i].pair_occurrences(pair) * word_counts[i])`` per pair.
    pub pair_counts: PairCountMap<T, C>,

    /// The indices of the words containing each pair.
    pub pair_to_word_index: PairWordIndex<T>,
}

impl<T: TokenType, C: CountType> PairIndex<T, C> {
    /// Build a [`PairIndex`].
    ///
    /// # Arguments
    /// * `words` - the unique words.
    /// * `word_counts` - `word_counts[i]` is the corpus count of `words[i]`.
    /// * `options` - options for building the index.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(words, word_counts))
    )]
    pub fn index_unique_word_counts_table(
        words: &[Word<T>],
        word_counts: &[C],
        options: PairIndexOptions,
    ) -> Self {
        #[cfg(feature = "rayon")]
        if options.parallel {
            return Self::index_unique_word_counts_table_rayon(words, word_counts);
        }

        Self::index_unique_word_counts_table_serial(words, word_counts)
    }

    fn observe_word(
        &mut self,
        index: usize,
        word: &Word<T>,
        word_count: C,
    ) {
        if word_count == C::zero() {
            return;
        }
        for p in word.pairs() {
            *self.pair_counts.entry(p).or_default() += word_count;
            self.pair_to_word_index.entry(p).or_default().insert(index);
        }
    }

    fn absorb(
        mut self,
        other: Self,
    ) -> Self {
        for (p, c) in other.pair_counts {
            *self.pair_counts.entry(p).or_default() += c;
        }
        for (p, s) in other.pair_to_word_index {
            self.pair_to_word_index.entry(p).or_default().extend(s);
        }
        self
    }

    /// Apply one pair delta reported by [`Word::merge_pair_cb`], weighted by the word count.
    ///
    /// Word indices are only ever added; a stale index costs one no-op merge scan.
    pub fn apply_delta(
        &mut self,
        word_index: usize,
        pair: Pair<T>,
        delta: i32,
        word_count: C,
    ) {
        if delta < 0 {
            if let Some(count) = self.pair_counts.get_mut(&pair) {
                *count = if *count > word_count {
                    *count - word_count
                } else {
                    C::zero()
                };
            }
        } else if delta > 0 {
            *self.pair_counts.entry(pair).or_default() += word_count;
            self.pair_to_word_index
                .entry(pair)
                .or_default()
                .insert(word_index);
        }
    }

    /// Build a [`PairIndex`] serially.
    pub fn index_unique_word_counts_table_serial(
        words: &[Word<T>],
        word_counts: &[C],
    ) -> Self {
        let mut index = Self::default();
        for (word_index, (word, &count)) in words.iter().zip(word_counts).enumerate() {
            index.observe_word(word_index, word, count);
        }
        index
    }

    /// Build a [`PairIndex`] as a `rayon` map-reduce over the words.
    #[cfg(feature = "rayon")]
    pub fn index_unique_word_counts_table_rayon(
        words: &[Word<T>],
        word_counts: &[C],
    ) -> Self {
        use rayon::prelude::*;

        words
            .par_iter()
            .zip(word_counts.par_iter())
            .enumerate()
            .fold(Self::default, |mut acc, (word_index, (word, &count))| {
                acc.observe_word(word_index, word, count);
                acc
            })
            .reduce(Self::default, Self::absorb)
    }
}
