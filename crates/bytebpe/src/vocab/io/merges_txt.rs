//! # `merges.txt` IO
//!
//! ```text
//! #version: 0.2
//! #special_tokens: ["<s>","<pad>"]
//! Ġ t
//! h e
//! ```
//!
//! Header lines are only recognized before the first merge line. Symbols never
//! contain a space, so a single space separates each pair.

use crate::errors::{Result, corrupt};
use crate::types::Symbol;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// The version header line.
pub const MERGES_VERSION_HEADER: &str = "#version: 0.2";

/// The special tokens header prefix; followed by a JSON array of strings.
pub const SPECIAL_TOKENS_HEADER: &str = "#special_tokens: ";

/// The parsed contents of a `merges.txt` file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeList {
    /// The special words declared in the header, if present.
    pub special_tokens: Option<Vec<String>>,

    /// ``(left, right)`` symbol pairs, in rank order.
    pub pairs: Vec<(Symbol, Symbol)>,
}

/// Load a [`MergeList`] from a `merges.txt` file.
pub fn load_merges_from_path<P: AsRef<Path>>(path: P) -> Result<MergeList> {
    let file = std::fs::File::open(path)?;
    load_merges_from_reader(BufReader::new(file))
}

/// Load a [`MergeList`] from a [`BufRead`] stream.
pub fn load_merges_from_reader<R: BufRead>(reader: R) -> Result<MergeList> {
    let mut merges = MergeList::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        let line_no = idx + 1;

        if line.is_empty() {
            continue;
        }

        if merges.pairs.is_empty() {
            if line.starts_with("#version") {
                continue;
            }
            if let Some(json) = line.strip_prefix(SPECIAL_TOKENS_HEADER) {
                let words: Vec<String> = serde_json::from_str(json).map_err(|err| {
                    corrupt(format!("line {line_no}: bad special tokens header: {err}"))
                })?;
                merges.special_tokens = Some(words);
                continue;
            }
        }

        let pair = line
            .split_once(' ')
            .filter(|(l, r)| !l.is_empty() && !r.is_empty() && !r.contains(' '))
            .ok_or_else(|| corrupt(format!("line {line_no}: malformed merge {line:?}")))?;

        merges.pairs.push((pair.0.into(), pair.1.into()));
    }

    Ok(merges)
}

/// Save merges to a `merges.txt` file.
pub fn save_merges_to_path<'a, P, I>(
    special_tokens: &[String],
    pairs: I,
    path: P,
) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    save_merges_to_writer(special_tokens, pairs, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Save merges to a [`Write`] writer.
///
/// # Arguments
/// * `special_tokens` - the special words, in id order.
/// * `pairs` - ``(left, right)`` symbol pairs, in rank order.
/// * `writer` - the target.
pub fn save_merges_to_writer<'a, I, W>(
    special_tokens: &[String],
    pairs: I,
    writer: &mut W,
) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
    W: Write,
{
    writeln!(writer, "{MERGES_VERSION_HEADER}")?;
    writeln!(
        writer,
        "{SPECIAL_TOKENS_HEADER}{}",
        serde_json::to_string(special_tokens)?
    )?;
    for (left, right) in pairs {
        writeln!(writer, "{left} {right}")?;
    }
    Ok(())
}
