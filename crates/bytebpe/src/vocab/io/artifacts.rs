//! # Directory-Level Artifact IO

use crate::errors::Result;
use crate::types::TokenType;
use crate::vocab::bpe_vocab::BpeVocab;
use crate::vocab::io::merges_txt::{load_merges_from_path, save_merges_to_path};
use crate::vocab::io::vocab_json::{load_symbols_from_json_path, save_symbols_to_json_path};
use std::path::{Path, PathBuf};

/// The `vocab.json` path in `dir`; `{prefix}-vocab.json` when a prefix is given.
pub fn vocab_json_path<P: AsRef<Path>>(
    dir: P,
    prefix: Option<&str>,
) -> PathBuf {
    artifact_path(dir, prefix, "vocab.json")
}

/// The `merges.txt` path in `dir`; `{prefix}-merges.txt` when a prefix is given.
pub fn merges_txt_path<P: AsRef<Path>>(
    dir: P,
    prefix: Option<&str>,
) -> PathBuf {
    artifact_path(dir, prefix, "merges.txt")
}

fn artifact_path<P: AsRef<Path>>(
    dir: P,
    prefix: Option<&str>,
    name: &str,
) -> PathBuf {
    match prefix {
        Some(prefix) => dir.as_ref().join(format!("{prefix}-{name}")),
        None => dir.as_ref().join(name),
    }
}

/// Save a [`BpeVocab`] to `dir`, creating it if needed.
///
/// # Returns
/// The ``(vocab.json, merges.txt)`` paths written.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(vocab, dir)))]
pub fn save_bpe_vocab_to_dir<T, P>(
    vocab: &BpeVocab<T>,
    dir: P,
    prefix: Option<&str>,
) -> Result<(PathBuf, PathBuf)>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let vocab_path = vocab_json_path(dir, prefix);
    let merges_path = merges_txt_path(dir, prefix);

    save_symbols_to_json_path(vocab.symbols(), &vocab_path)?;
    save_merges_to_path(
        &vocab.specials().words(),
        vocab
            .merge_symbols()
            .map(|(left, right, _)| (left.as_str(), right.as_str())),
        &merges_path,
    )?;

    log::info!(
        "Saved {} tokens ({} merges) to {} and {}",
        vocab.len(),
        vocab.merges().len(),
        vocab_path.display(),
        merges_path.display()
    );

    Ok((vocab_path, merges_path))
}

/// Load a [`BpeVocab`] from the artifacts in `dir`.
pub fn load_bpe_vocab_from_dir<T, P>(
    dir: P,
    prefix: Option<&str>,
    pattern: &str,
) -> Result<BpeVocab<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let dir = dir.as_ref();
    load_bpe_vocab_from_paths(
        vocab_json_path(dir, prefix),
        merges_txt_path(dir, prefix),
        pattern,
    )
}

/// Load a [`BpeVocab`] from a `vocab.json` / `merges.txt` pair.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(vocab_path, merges_path)))]
pub fn load_bpe_vocab_from_paths<T, V, M>(
    vocab_path: V,
    merges_path: M,
    pattern: &str,
) -> Result<BpeVocab<T>>
where
    T: TokenType,
    V: AsRef<Path>,
    M: AsRef<Path>,
{
    let (vocab_path, merges_path) = (vocab_path.as_ref(), merges_path.as_ref());
    log::info!(
        "Loading vocabulary from {} and {}",
        vocab_path.display(),
        merges_path.display()
    );

    let symbols = load_symbols_from_json_path(vocab_path)?;
    let merges = load_merges_from_path(merges_path)?;

    let vocab = BpeVocab::from_symbol_merges(
        pattern,
        symbols,
        &merges.pairs,
        merges.special_tokens.as_deref(),
    )?;

    log::info!(
        "Loaded {} tokens ({} merges, {} special)",
        vocab.len(),
        vocab.merges().len(),
        vocab.specials().len()
    );

    Ok(vocab)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_level::BYTE_UNICODE;
    use crate::errors::Error;
    use crate::regex::BYTE_LEVEL_WORD_PATTERN;
    use crate::vocab::symbol_vocab::SymbolVocab;
    use std::io::Write;

    fn sample_vocab() -> BpeVocab<u32> {
        let mut symbols: Vec<String> = vec!["<s>".to_string()];
        symbols.extend(BYTE_UNICODE.chars().iter().map(|c| c.to_string()));
        symbols.extend(["Ġt", "he", "Ġthe"].map(String::from));
        BpeVocab::from_symbol_merges(
            BYTE_LEVEL_WORD_PATTERN,
            SymbolVocab::from_symbols(symbols).unwrap(),
            &[("Ġ", "t"), ("h", "e"), ("Ġt", "he")],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_paths() {
        assert_eq!(vocab_json_path("out", None), Path::new("out").join("vocab.json"));
        assert_eq!(
            merges_txt_path("out", Some("news")),
            Path::new("out").join("news-merges.txt")
        );
    }

    #[test]
    fn test_save_load_dir() {
        let vocab = sample_vocab();

        tempdir::TempDir::new("artifacts_test")
            .and_then(|dir| {
                let out = dir.path().join("tokenizer");

                let (vocab_path, merges_path) =
                    save_bpe_vocab_to_dir(&vocab, &out, None).expect("Failed to save");
                assert!(vocab_path.exists());
                assert!(merges_path.exists());

                let loaded: BpeVocab<u32> =
                    load_bpe_vocab_from_dir(&out, None, BYTE_LEVEL_WORD_PATTERN)
                        .expect("Failed to load");
                assert_eq!(loaded, vocab);

                save_bpe_vocab_to_dir(&vocab, &out, Some("x")).expect("Failed to save");
                let loaded: BpeVocab<u32> =
                    load_bpe_vocab_from_dir(&out, Some("x"), BYTE_LEVEL_WORD_PATTERN)
                        .expect("Failed to load");
                assert_eq!(loaded, vocab);

                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_load_rejects_special_mismatch() {
        let vocab = sample_vocab();

        tempdir::TempDir::new("artifacts_test")
            .and_then(|dir| {
                save_bpe_vocab_to_dir(&vocab, dir.path(), None).expect("Failed to save");

                let mut file = std::fs::File::create(merges_txt_path(dir.path(), None))?;
                writeln!(file, "#version: 0.2")?;
                writeln!(file, "#special_tokens: [\"<s>\",\"<pad>\"]")?;
                writeln!(file, "Ġ t")?;
                writeln!(file, "h e")?;
                writeln!(file, "Ġt he")?;
                drop(file);

                let result =
                    load_bpe_vocab_from_dir::<u32, _>(dir.path(), None, BYTE_LEVEL_WORD_PATTERN);
                assert!(matches!(result, Err(Error::CorruptArtifact(_))));

                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_load_missing_files() {
        tempdir::TempDir::new("artifacts_test")
            .and_then(|dir| {
                let result =
                    load_bpe_vocab_from_dir::<u32, _>(dir.path(), None, BYTE_LEVEL_WORD_PATTERN);
                assert!(matches!(result, Err(Error::Io(_))));
                Ok(())
            })
            .unwrap();
    }
}
