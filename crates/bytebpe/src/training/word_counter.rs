//! # Corpus Word Counting

use crate::errors::{Result, config};
use crate::segmentation::{SegmentationConfig, SpanRef, TextSegmentor};
use crate::types::CountType;
use ahash::AHashMap;
use compact_str::CompactString;

/// ``{ word -> count }`` map.
pub type WordCountMap<C> = AHashMap<CompactString, C>;

/// Count the normal words of one text.
///
/// Special-word spans are dropped; they never take part in merging.
pub fn word_counts_from_text<C: CountType>(
    segmentor: &TextSegmentor,
    text: &str,
) -> WordCountMap<C> {
    let mut counts = WordCountMap::default();
    update_word_counts_from_text(&mut counts, segmentor, text);
    counts
}

/// Update word counts in-place from one text.
pub fn update_word_counts_from_text<C: CountType>(
    word_counts: &mut WordCountMap<C>,
    segmentor: &TextSegmentor,
    text: &str,
) {
    for span in segmentor.split_spans(text) {
        if let SpanRef::Normal(word) = span {
            *word_counts.entry(word.into()).or_default() += C::one();
        }
    }
}

/// Merge `source` into `word_counts`.
pub fn update_word_counts<C: CountType>(
    word_counts: &mut WordCountMap<C>,
    source: WordCountMap<C>,
) {
    if word_counts.is_empty() {
        *word_counts = source;
        return;
    }
    for (k, v) in source {
        *word_counts.entry(k).or_default() += v;
    }
}

/// Options for [`WordCounter`].
#[derive(Debug, Clone)]
pub struct WordCounterOptions {
    /// Word pattern and special words.
    pub segmentation: SegmentationConfig,

    /// Whether to use parallel processing for word counting.
    ///
    /// Requires the `rayon` feature to be enabled.
    pub parallel: bool,
}

impl Default for WordCounterOptions {
    fn default() -> Self {
        Self {
            segmentation: SegmentationConfig::default(),
            parallel: crate::DEFAULT_PARALLEL,
        }
    }
}

impl WordCounterOptions {
    /// Set the parallel processing option.
    pub fn with_parallel(
        self,
        parallel: bool,
    ) -> Self {
        Self { parallel, ..self }
    }

    /// Set the segmentation config.
    pub fn with_segmentation(
        self,
        segmentation: SegmentationConfig,
    ) -> Self {
        Self {
            segmentation,
            ..self
        }
    }
}

/// Accumulates ``{ word -> count }`` over a corpus.
#[derive(Debug, Clone)]
pub struct WordCounter<C: CountType> {
    parallel: bool,
    segmentor: TextSegmentor,
    word_counts: WordCountMap<C>,
}

impl<C: CountType> WordCounter<C> {
    /// Create a new word counter.
    pub fn new(options: WordCounterOptions) -> Result<Self> {
        if options.parallel && !cfg!(feature = "rayon") {
            return Err(config(
                "parallel processing requires the `rayon` feature",
            ));
        }

        Ok(Self {
            parallel: options.parallel,
            segmentor: TextSegmentor::from_config(&options.segmentation)?,
            word_counts: Default::default(),
        })
    }

    /// Get the parallel processing flag.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Get the word counts.
    pub fn word_counts(&self) -> &WordCountMap<C> {
        &self.word_counts
    }

    /// Release the word counts and return them.
    pub fn release(self) -> WordCountMap<C> {
        self.word_counts
    }

    /// Update word counts inplace from text.
    pub fn update_from_text<S: AsRef<str>>(
        &mut self,
        text: S,
    ) {
        update_word_counts_from_text(&mut self.word_counts, &self.segmentor, text.as_ref());
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
        #[cfg(feature = "rayon")]
        if self.parallel {
            return self.update_from_samples_rayon(samples);
        }

        self.update_from_samples_serial(samples);
    }

    /// Update word counts inplace from a sample iterator.
    ///
    /// Uses serial processing, ignoring the `parallel` flag.
    pub fn update_from_samples_serial<I>(
        &mut self,
        samples: I,
    ) where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for sample in samples {
            self.update_from_text(sample);
        }
    }

    /// Update word counts inplace from a sample iterator.
    ///
    /// Uses parallel processing, ignoring the `parallel` flag.
    #[cfg(feature = "rayon")]
    pub fn update_from_samples_rayon<I>(
        &mut self,
        samples: I,
    ) where
        I: IntoIterator,
        I::IntoIter: Send,
        I::Item: AsRef<str> + Send,
    {
        use rayon::iter::ParallelBridge;
        use rayon::prelude::*;

        let segmentor = &self.segmentor;

        let updates: WordCountMap<C> = samples
            .into_iter()
            .par_bridge()
            .map(|sample| word_counts_from_text(segmentor, sample.as_ref()))
            .reduce(WordCountMap::default, |mut a, b| {
                update_word_counts(&mut a, b);
                a
            });

        update_word_counts(&mut self.word_counts, updates);
    }
}
