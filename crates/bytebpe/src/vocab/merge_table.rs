//! # Merge Table ``{ (T, T) -> T }`` by Rank

use crate::errors::{Result, config};
use crate::types::{Pair, PairRankMap, TokenType};
use crate::vocab::vocab_index::TokenVocabIndex;

/// A learned merge: ``(left, right) -> merged``.
///
/// A rule's rank is its position in the [`MergeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeRule<T: TokenType> {
    /// The left token of the pair.
    pub left: T,

    /// The right token of the pair.
    pub right: T,

    /// The token the pair merges into.
    pub merged: T,
}

impl<T: TokenType> MergeRule<T> {
    /// The ``(left, right)`` pair.
    pub fn pair(&self) -> Pair<T> {
        (self.left, self.right)
    }
}

/// Rank-ordered list of [`MergeRule`]s.
///
/// Earlier rules have priority when encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeTable<T: TokenType> {
    rules: Vec<MergeRule<T>>,
    ranks: PairRankMap<T>,
}

impl<'a, T: TokenType> IntoIterator for &'a MergeTable<T> {
    type Item = &'a MergeRule<T>;
    type IntoIter = std::slice::Iter<'a, MergeRule<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl<T: TokenType> MergeTable<T> {
    /// The number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append a rule with the next rank.
    ///
    /// # Returns
    /// The rank of the new rule; fails if the pair already has a rule.
    pub fn add_rule(
        &mut self,
        pair: Pair<T>,
        merged: T,
    ) -> Result<usize> {
        let rank = self.rules.len();
        if self.ranks.contains_key(&pair) {
            return Err(config(format!("duplicate merge pair: {pair:?}")));
        }
        self.ranks.insert(pair, rank);
        self.rules.push(MergeRule {
            left: pair.0,
            right: pair.1,
            merged,
        });
        Ok(rank)
    }

    /// The rules, in rank order.
    pub fn rules(&self) -> &[MergeRule<T>] {
        &self.rules
    }

    /// Iterate the rules in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, MergeRule<T>> {
        self.rules.iter()
    }

    /// Get the rule at a rank.
    pub fn get(
        &self,
        rank: usize,
    ) -> Option<&MergeRule<T>> {
        self.rules.get(rank)
    }

    /// Get the rank of a pair, if it has a rule.
    pub fn rank(
        &self,
        pair: &Pair<T>,
    ) -> Option<usize> {
        self.ranks.get(pair).copied()
    }

    /// Get ``(rank, merged)`` for a pair, if it has a rule.
    pub fn lookup_merge(
        &self,
        pair: &Pair<T>,
    ) -> Option<(usize, T)> {
        self.rank(pair).map(|rank| (rank, self.rules[rank].merged))
    }

    /// Shrinks the capacity of the underlying data structures to fit its current size.
    pub fn shrink_to_fit(&mut self) {
        self.rules.shrink_to_fit();
        self.ranks.shrink_to_fit();
    }
}

impl<T: TokenType> TokenVocabIndex<T> for MergeTable<T> {
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T> {
        self.rules.iter().map(|r| r.merged)
    }
}
