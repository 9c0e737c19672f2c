//! # Common Types and Traits
use compact_str::CompactString;
use core::hash::Hash;
use num_traits::{FromPrimitive, Num, ToPrimitive, Unsigned};
use std::fmt::{Debug, Display};
use std::ops::{AddAssign, SubAssign};

/// A type that can be used as a token id in the vocabulary.
pub trait TokenType:
    'static
    + Default
    + Debug
    + Display
    + Clone
    + Copy
    + Hash
    + Send
    + Sync
    + Unsigned
    + FromPrimitive
    + ToPrimitive
    + Ord
    + serde::Serialize
    + for<'de> serde::Deserialize<'de>
{
}

impl<T> TokenType for T where
    T: 'static
        + Default
        + Debug
        + Display
        + Clone
        + Copy
        + Hash
        + Send
        + Sync
        + Unsigned
        + FromPrimitive
        + ToPrimitive
        + Ord
        + serde::Serialize
        + for<'de> serde::Deserialize<'de>
{
}

/// A pair of tokens.
pub type Pair<T> = (T, T);

/// A type that can be used as a word count.
pub trait CountType:
    Num
    + AddAssign
    + SubAssign
    + Default
    + Copy
    + Debug
    + Display
    + Send
    + Sync
    + Hash
    + Ord
    + FromPrimitive
    + ToPrimitive
{
}

impl<T> CountType for T where
    T: Num
        + AddAssign
        + SubAssign
        + Default
        + Copy
        + Debug
        + Display
        + Send
        + Sync
        + Hash
        + Ord
        + FromPrimitive
        + ToPrimitive
{
}

/// A vocabulary unit: one byte-mapped character, a merge result, or a special token.
pub type Symbol = CompactString;

/// [`Pair<T>`] to merge rank map.
pub type PairRankMap<T> = ahash::AHashMap<Pair<T>, usize>;

/// [`Symbol`] to T map.
pub type SymbolTokenMap<T> = ahash::AHashMap<Symbol, T>;

/// T to byte vector map.
pub type TokenToBytesMap<T> = ahash::AHashMap<T, Vec<u8>>;

/// Byte vector to T map.
pub type BytesToTokenMap<T> = ahash::AHashMap<Vec<u8>, T>;

/// Convert a `usize` index into a token, failing if it does not fit.
pub fn try_token<T: TokenType>(index: usize) -> crate::errors::Result<T> {
    T::from_usize(index).ok_or_else(|| {
        crate::errors::Error::Config(format!(
            "token id {index} does not fit in {}",
            std::any::type_name::<T>()
        ))
    })
}

/// Convert a token into a `usize` index.
pub fn token_index<T: TokenType>(token: T) -> usize {
    // Every `TokenType` id in use was produced from a `usize` index.
    token.to_usize().unwrap_or(usize::MAX)
}

/// Check if a type is `Send`.
#[cfg(test)]
pub(crate) fn check_is_send<S: Send>(_: S) {}

#[cfg(test)]
/// Check if a type is `Sync`.
pub(crate) fn check_is_sync<S: Sync>(_: S) {}
