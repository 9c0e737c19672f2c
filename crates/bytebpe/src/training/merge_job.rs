//! # Merge Candidates

use crate::types::{CountType, Pair, Symbol, TokenType};
use core::cmp::{Ordering, Reverse};

/// A [`Pair`] that could be merged, as a max-heap entry.
///
/// The count may be stale; it is refreshed lazily when the job is popped.
#[derive(Debug, Clone, Eq)]
pub struct MergeJob<T: TokenType, C: CountType> {
    /// The number of instances of this pair in the corpus.
    pub count: C,

    /// The pair to merge.
    pub pair: Pair<T>,

    /// The left symbol of the pair.
    pub left: Symbol,

    /// The right symbol of the pair.
    pub right: Symbol,
}

impl<T: TokenType, C: CountType> MergeJob<T, C> {
    /// The job key.
    ///
    /// Max-heap by count; ties go to the lexicographically smallest
    /// ``(left, right)`` symbol pair.
    pub fn heap_key(&self) -> (C, Reverse<(&str, &str)>) {
        (self.count, Reverse((self.left.as_str(), self.right.as_str())))
    }
}

impl<T: TokenType, C: CountType> PartialEq for MergeJob<T, C> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.heap_key() == other.heap_key()
    }
}

impl<T: TokenType, C: CountType> PartialOrd for MergeJob<T, C> {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: TokenType, C: CountType> Ord for MergeJob<T, C> {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.heap_key().cmp(&other.heap_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dary_heap::OctonaryHeap;

    fn job(
        count: u64,
        left: &str,
        right: &str,
    ) -> MergeJob<u32, u64> {
        MergeJob {
            count,
            pair: (0, 0),
            left: left.into(),
            right: right.into(),
        }
    }

    #[test]
    fn test_merge_job_heap_key() {
        let a = job(3, "l", "o");
        let b = job(3, "o", "w");
        let c = job(2, "a", "a");

        assert_eq!(a.heap_key(), (3, Reverse(("l", "o"))));
        assert_eq!(a.cmp(&a), Ordering::Equal);
        assert_eq!(a.cmp(&b), Ordering::Greater);
        assert_eq!(b.cmp(&c), Ordering::Greater);
        assert_eq!(job(3, "l", "o").cmp(&job(3, "l", "ow")), Ordering::Greater);
    }

    #[test]
    fn test_heap_order() {
        let mut heap = OctonaryHeap::new();
        heap.push(job(2, "a", "a"));
        heap.push(job(5, "t", "h"));
        heap.push(job(5, "Ġ", "t"));
        heap.push(job(5, "e", "r"));

        let order: Vec<(u64, String, String)> = std::iter::from_fn(|| heap.pop())
            .map(|j| (j.count, j.left.to_string(), j.right.to_string()))
            .collect();
        assert_eq!(
            order,
            vec![
                (5, "e".to_string(), "r".to_string()),
                (5, "t".to_string(), "h".to_string()),
                (5, "Ġ".to_string(), "t".to_string()),
                (2, "a".to_string(), "a".to_string()),
            ]
        );
    }
}
