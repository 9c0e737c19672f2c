//! # Training Words

use crate::types::{Pair, TokenType};

/// A pre-tokenized word, as a sequence of symbol tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Word<T: TokenType> {
    tokens: Vec<T>,
}

impl<T: TokenType, S: AsRef<[T]>> From<S> for Word<T> {
    fn from(tokens: S) -> Self {
        Self::from_tokens(tokens)
    }
}

impl<T: TokenType> Word<T> {
    /// Create a new word, taking ownership of the tokens.
    pub fn new(tokens: Vec<T>) -> Self {
        Self { tokens }
    }

    /// Create a new word from a list of tokens.
    pub fn from_tokens<S: AsRef<[T]>>(tokens: S) -> Self {
        Self::new(tokens.as_ref().to_vec())
    }

    /// The tokens of this word.
    pub fn tokens(&self) -> &[T] {
        &self.tokens
    }

    /// The number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if the word has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate adjacent token pairs.
    pub fn pairs(&self) -> impl Iterator<Item = Pair<T>> + '_ {
        self.tokens.windows(2).map(|w| (w[0], w[1]))
    }

    /// Replace every non-overlapping occurrence of `pair`, scanning left to right.
    ///
    /// `on_delta(pair, delta)` is called once per adjacent pair occurrence
    /// removed (`-1`) or created (`+1`).
    pub fn merge_pair_cb<F>(
        &mut self,
        pair: Pair<T>,
        replacement: T,
        on_delta: &mut F,
    ) where
        F: FnMut(Pair<T>, i32),
    {
        let (a, b) = pair;
        let n = self.tokens.len();
        if n < 2 {
            return;
        }

        // In-place compaction: `w <= i` always holds.
        let mut w = 0;
        let mut i = 0;
        while i < n {
            if i + 1 < n && self.tokens[i] == a && self.tokens[i + 1] == b {
                if w > 0 {
                    let x = self.tokens[w - 1];
                    on_delta((x, a), -1);
                    on_delta((x, replacement), 1);
                }

                on_delta(pair, -1);

                if i + 2 < n {
                    let y = self.tokens[i + 2];
                    on_delta((b, y), -1);
                    on_delta((replacement, y), 1);
                }

                self.tokens[w] = replacement;
                i += 2;
            } else {
                self.tokens[w] = self.tokens[i];
                i += 1;
            }
            w += 1;
        }
        self.tokens.truncate(w);
    }

    /// Replace every non-overlapping occurrence of `pair`, scanning left to right.
    ///
    /// # Returns
    /// The ``(pair, delta)`` list reported by [`Word::merge_pair_cb`].
    pub fn merge_pair(
        &mut self,
        pair: Pair<T>,
        replacement: T,
    ) -> Vec<(Pair<T>, i32)> {
        let mut deltas = Vec::with_capacity(6);
        self.merge_pair_cb(pair, replacement, &mut |p, d| deltas.push((p, d)));
        deltas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_basics() {
        let word: Word<u32> = [1, 2, 3].into();
        assert_eq!(word.tokens(), &[1, 2, 3]);
        assert_eq!(word.len(), 3);
        assert_eq!(word.pairs().collect::<Vec<_>>(), vec![(1, 2), (2, 3)]);

        assert!(Word::<u32>::default().is_empty());
    }

    #[test]
    fn test_merge_pair() {
        let mut word: Word<u32> = [1, 2, 3, 1, 2, 2, 1].into();

        let deltas = word.merge_pair((1, 2), 9);
        assert_eq!(word.tokens(), &[9, 3, 9, 2, 1]);

        assert_eq!(
            deltas,
            vec![
                ((1, 2), -1),
                ((2, 3), -1),
                ((9, 3), 1),
                ((3, 1), -1),
                ((3, 9), 1),
                ((1, 2), -1),
                ((2, 2), -1),
                ((9, 2), 1),
            ]
        );
    }

    #[test]
    fn test_merge_overlapping_run() {
        let mut word: Word<u32> = [7, 7, 7, 7, 7].into();
        let deltas = word.merge_pair((7, 7), 8);
        assert_eq!(word.tokens(), &[8, 8, 7]);

        // Net deltas must match recounting the pairs.
        let mut net = ahash::AHashMap::<Pair<u32>, i32>::new();
        for (p, d) in deltas {
            *net.entry(p).or_default() += d;
        }
        assert_eq!(net.get(&(7, 7)), Some(&-4));
        assert_eq!(net.get(&(8, 8)), Some(&1));
        assert_eq!(net.get(&(8, 7)), Some(&1));
    }

    #[test]
    fn test_merge_absent_pair() {
        let mut word: Word<u32> = [1, 2, 3].into();
        assert!(word.merge_pair((3, 1), 9).is_empty());
        assert_eq!(word.tokens(), &[1, 2, 3]);
    }
}
