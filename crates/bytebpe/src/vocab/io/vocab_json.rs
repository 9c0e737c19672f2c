//! # `vocab.json` IO
//!
//! A JSON object ``{ symbol: id }``, written in ascending id order.

use crate::errors::{Result, corrupt};
use crate::types::{TokenType, token_index};
use crate::vocab::symbol_vocab::SymbolVocab;
use ahash::AHashMap;
use serde::Serialize;
use serde::ser::Serializer;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Id-ordered ``{ symbol: id }`` view of a [`SymbolVocab`].
struct OrderedSymbolMap<'a, T: TokenType>(&'a SymbolVocab<T>);

impl<T: TokenType> Serialize for OrderedSymbolMap<'_, T> {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(token, symbol)| (symbol.as_str(), token)))
    }
}

/// Load a [`SymbolVocab`] from a `vocab.json` file.
pub fn load_symbols_from_json_path<T, P>(path: P) -> Result<SymbolVocab<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let file = std::fs::File::open(path)?;
    load_symbols_from_json_reader(BufReader::new(file))
}

/// Load a [`SymbolVocab`] from a `vocab.json` reader.
///
/// Ids must be dense (``0..n``) and unique.
pub fn load_symbols_from_json_reader<T, R>(reader: R) -> Result<SymbolVocab<T>>
where
    T: TokenType,
    R: Read,
{
    let table: AHashMap<String, u64> = serde_json::from_reader(reader)
        .map_err(|err| corrupt(format!("vocab.json is not a symbol table: {err}")))?;

    let mut entries: Vec<(u64, String)> = table.into_iter().map(|(s, id)| (id, s)).collect();
    entries.sort();

    let mut symbols = SymbolVocab::with_capacity(entries.len());
    for (expected, (id, symbol)) in entries.into_iter().enumerate() {
        let token = T::from_u64(id)
            .ok_or_else(|| corrupt(format!("id {id} of {symbol:?} does not fit the token type")))?;
        if token_index(token) != expected {
            return Err(corrupt(format!(
                "vocabulary ids are not dense: expected {expected}, found {id} for {symbol:?}"
            )));
        }
        symbols
            .add_symbol(symbol.as_str())
            .map_err(|_| corrupt(format!("duplicate symbol {symbol:?}")))?;
    }

    Ok(symbols)
}

/// Save a [`SymbolVocab`] to a `vocab.json` file.
pub fn save_symbols_to_json_path<T, P>(
    symbols: &SymbolVocab<T>,
    path: P,
) -> Result<()>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    save_symbols_to_json_writer(symbols, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Save a [`SymbolVocab`] to a [`Write`] writer.
pub fn save_symbols_to_json_writer<T, W>(
    symbols: &SymbolVocab<T>,
    writer: &mut W,
) -> Result<()>
where
    T: TokenType,
    W: Write,
{
    serde_json::to_writer(&mut *writer, &OrderedSymbolMap(symbols))?;
    Ok(())
}
