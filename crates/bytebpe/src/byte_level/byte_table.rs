//! # Byte/Token Mapping Table

use crate::errors::{Result, corrupt};
use crate::types::{TokenType, try_token};
use ahash::AHashMap;
use core::fmt::Debug;

/// 0..255 Byte/Token Bijection Table
///
/// This will always have 256 entries, one for each byte value.
/// The token values are not required to be dense, or in the range 0..255;
/// a vocabulary that places special tokens first shifts every byte token.
#[derive(Clone, PartialEq)]
pub struct ByteTokenTable<T: TokenType> {
    /// Hash map from token to byte ordinal value.
    token_to_byte: AHashMap<T, u8>,

    /// Table mapping from byte ordinal (position) to token.
    byte_to_token: [T; 256],
}

impl<T: TokenType> Debug for ByteTokenTable<T> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("ByteTokenTable")
            .field("min_token", &self.byte_to_token.iter().min())
            .field("max_token", &self.byte_to_token.iter().max())
            .finish()
    }
}

impl<T: TokenType> ByteTokenTable<T> {
    /// Build the table where byte `b` maps to token `offset + b`.
    pub fn with_offset(offset: usize) -> Result<Self> {
        let tokens = (0..256)
            .map(|b| try_token::<T>(offset + b))
            .collect::<Result<Vec<T>>>()?;
        Self::from_byte_to_token(&tokens)
    }

    /// Build a `ByteTokenTable` from a byte-ord => token table.
    ///
    /// Fails if the table is not a 1:1 bijection of 256 entries.
    pub fn from_byte_to_token(token_table: &[T]) -> Result<Self> {
        let byte_to_token: [T; 256] = token_table.try_into().map_err(|_| {
            corrupt(format!(
                "byte table needs 256 entries, found {}",
                token_table.len()
            ))
        })?;

        let token_to_byte: AHashMap<T, u8> = byte_to_token
            .iter()
            .enumerate()
            .map(|(b, &token)| (token, b as u8))
            .collect();

        if token_to_byte.len() != 256 {
            return Err(corrupt("byte table tokens are not distinct"));
        }

        Ok(Self {
            token_to_byte,
            byte_to_token,
        })
    }

    /// Get the byte-ord => token mapping table.
    pub fn byte_to_token(&self) -> &[T; 256] {
        &self.byte_to_token
    }

    /// Get the token corresponding to a given byte.
    pub fn get_token(
        &self,
        byte: u8,
    ) -> T {
        self.byte_to_token[byte as usize]
    }

    /// Get the byte corresponding to a given token, if any.
    pub fn get_byte(
        &self,
        token: T,
    ) -> Option<u8> {
        self.token_to_byte.get(&token).copied()
    }

    /// Returns true if the token is one of the 256 byte tokens.
    pub fn is_byte_token(
        &self,
        token: T,
    ) -> bool {
        self.token_to_byte.contains_key(&token)
    }

    /// Append the byte tokens for `bytes` to `tokens`.
    pub fn append_tokens(
        &self,
        bytes: &[u8],
        tokens: &mut Vec<T>,
    ) {
        tokens.extend(bytes.iter().map(|&b| self.get_token(b)));
    }
}
