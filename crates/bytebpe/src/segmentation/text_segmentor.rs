//! # Text Segmentor

use crate::BYTES_PER_TOKEN_HINT;
use crate::errors::Result;
use crate::regex::{compile_pattern, exact_match_union_regex};
use crate::segmentation::segmentation_config::SegmentationConfig;
use core::ops::Range;
use fancy_regex::Regex;
use std::sync::Arc;

/// Span Reference for [`TextSegmentor`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpanRef<'a> {
    /// A normal word reference.
    Normal(&'a str),

    /// A special word reference.
    Special(&'a str),
}

impl<'a> SpanRef<'a> {
    /// Get the inner string slice.
    pub fn as_str(&self) -> &'a str {
        match self {
            SpanRef::Normal(s) => s,
            SpanRef::Special(s) => s,
        }
    }
}

/// Word Split + Special Words Segmentor
///
/// Concatenating the spans of any split reproduces the input exactly.
#[derive(Clone, Debug)]
pub struct TextSegmentor {
    word_re: Arc<Regex>,
    special_re: Option<Arc<Regex>>,
}

impl TextSegmentor {
    /// Create a new text segmentor with the given regex pattern and special words.
    pub fn create<P, S>(
        word_pattern: P,
        specials: &[S],
    ) -> Result<Self>
    where
        P: AsRef<str>,
        S: AsRef<str>,
    {
        let word_re = Arc::new(compile_pattern(word_pattern)?);

        let special_re = if specials.is_empty() {
            None
        } else {
            Some(Arc::new(exact_match_union_regex(specials)?))
        };

        Ok(Self {
            word_re,
            special_re,
        })
    }

    /// Create a new text segmentor with the given configuration.
    pub fn from_config(config: &SegmentationConfig) -> Result<Self> {
        Self::create(config.pattern(), config.specials())
    }

    /// Find the next special span in the text.
    ///
    /// # Returns
    /// * `Some(Range<usize>)` if a special span is found,
    /// * `None` otherwise.
    pub fn next_special_span<S: AsRef<str>>(
        &self,
        text: S,
    ) -> Option<Range<usize>> {
        self.special_re
            .as_ref()
            .and_then(|re| re.find(text.as_ref()).ok().flatten())
            .map(|m| m.range())
    }

    /// Split a chunk of text into [`SpanRef::Normal`].
    ///
    /// Append to the `words` buffer.
    /// The word pattern need not cover every byte; unmatched gaps become words too.
    pub fn split_append_normal_words<'a>(
        &self,
        text: &'a str,
        words: &mut Vec<SpanRef<'a>>,
    ) {
        let mut last = 0;
        for m in self.word_re.find_iter(text) {
            match m {
                Ok(m) => {
                    if m.start() > last {
                        words.push(SpanRef::Normal(&text[last..m.start()]));
                    }
                    if m.end() > m.start() {
                        words.push(SpanRef::Normal(m.as_str()));
                    }
                    last = m.end();
                }
                Err(err) => {
                    log::warn!("word split failed, keeping remainder as one word: {err}");
                    break;
                }
            }
        }
        if last < text.len() {
            words.push(SpanRef::Normal(&text[last..]));
        }
    }

    /// Split a chunk of text into `Vec<SpanRef>`.
    ///
    /// Append to the `words` buffer.
    pub fn split_append_spans<'a>(
        &self,
        text: &'a str,
        words: &mut Vec<SpanRef<'a>>,
    ) {
        let mut current = text;

        while let Some(range) = self.next_special_span(current) {
            let pre = &current[..range.start];
            self.split_append_normal_words(pre, words);

            words.push(SpanRef::Special(&current[range.clone()]));

            current = &current[range.end..];
        }

        if !current.is_empty() {
            self.split_append_normal_words(current, words);
        }
    }

    /// Split a chunk of text into `Vec<SpanRef>`.
    ///
    /// # Returns
    /// A `Vec<SpanRef>` containing the `SpanRef`s to `text`.
    pub fn split_spans<'a>(
        &self,
        text: &'a str,
    ) -> Vec<SpanRef<'a>> {
        let capacity = text.len() as f64 / (BYTES_PER_TOKEN_HINT * 0.5);
        let mut words = Vec::with_capacity(capacity as usize);

        self.split_append_spans(text, &mut words);
        words
    }

    /// Rewrite text by segmenting and de-segmenting it.
    pub fn rewrite<S: AsRef<str>>(
        &self,
        text: S,
    ) -> String {
        let text = text.as_ref();
        let mut words = Vec::new();
        self.split_append_spans(text, &mut words);
        words.into_iter().map(|w| w.as_str()).collect()
    }
}
