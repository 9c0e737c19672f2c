use bytebpe::regex::BYTE_LEVEL_WORD_PATTERN;
use bytebpe::{BpeTrainerOptions, ByteLevelBpeTokenizer, Error, SpecialPlacement};
use std::path::Path;
use tempdir::TempDir;

const CORPUS: [&str; 4] = [
    "The new movie opened to strong reviews.",
    "Critics praised the new movie and its score.",
    "The score was written for strings and piano.",
    "Reviews of the movie were strong.",
];

fn low_tokenizer() -> ByteLevelBpeTokenizer {
    ByteLevelBpeTokenizer::train(
        ["low", "lower", "lowest", "low"],
        BpeTrainerOptions::new(1_000).with_special_tokens(["<s>", "<pad>"]),
    )
    .unwrap()
}

fn rewrite_lines<F>(
    path: &Path,
    f: F,
) where
    F: Fn(&str) -> Option<String>,
{
    let text = std::fs::read_to_string(path).unwrap();
    let lines: Vec<String> = text.lines().filter_map(f).collect();
    std::fs::write(path, lines.join("\n") + "\n").unwrap();
}

#[test]
fn test_save_load_round_trip() {
    let tmp_dir = TempDir::new("bytebpe_persistence").unwrap();
    let dir = tmp_dir.path().join("tokenizer");

    for placement in [SpecialPlacement::AfterAlphabet, SpecialPlacement::BeforeAlphabet] {
        let tokenizer: ByteLevelBpeTokenizer = ByteLevelBpeTokenizer::train(
            CORPUS,
            BpeTrainerOptions::new(350)
                .with_min_frequency(1)
                .with_special_tokens(["<s>", "</s>", "<mask>"])
                .with_special_placement(placement),
        )
        .unwrap();

        let (vocab_path, merges_path) = tokenizer.save(&dir).unwrap();
        assert_eq!(vocab_path, dir.join("vocab.json"));
        assert_eq!(merges_path, dir.join("merges.txt"));

        let loaded: ByteLevelBpeTokenizer = ByteLevelBpeTokenizer::load(&dir).unwrap();
        assert_eq!(loaded.vocab(), tokenizer.vocab());
        assert_eq!(loaded.special_tokens(), tokenizer.special_tokens());
        assert_eq!(
            loaded.merge_rules().collect::<Vec<_>>(),
            tokenizer.merge_rules().collect::<Vec<_>>()
        );

        for sample in CORPUS.iter().chain(&["<s>unseen text, ünïcode</s>", ""]) {
            let expected = tokenizer.encode(sample);
            assert_eq!(loaded.encode(sample), expected);
            assert_eq!(loaded.decode(&expected.ids).unwrap(), *sample);
        }

        let from_files: ByteLevelBpeTokenizer =
            ByteLevelBpeTokenizer::load_from_files(&vocab_path, &merges_path).unwrap();
        assert_eq!(from_files.vocab(), tokenizer.vocab());
    }
}

#[test]
fn test_artifact_layout() {
    let tmp_dir = TempDir::new("bytebpe_persistence").unwrap();
    let tokenizer = low_tokenizer();
    let (vocab_path, merges_path) = tokenizer.save(tmp_dir.path()).unwrap();

    let merges = std::fs::read_to_string(&merges_path).unwrap();
    let lines: Vec<&str> = merges.lines().collect();
    assert_eq!(
        lines,
        vec![
            "#version: 0.2",
            r#"#special_tokens: ["<s>","<pad>"]"#,
            "l o",
            "lo w",
            "low e",
        ]
    );

    let vocab: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&vocab_path).unwrap()).unwrap();
    assert_eq!(vocab.len(), tokenizer.vocab_size());
    assert_eq!(vocab["Ġ"], 32);
    assert_eq!(vocab["<s>"], 256);
    assert_eq!(vocab["<pad>"], 257);
    assert_eq!(vocab["lowe"], 260);
}

#[test]
fn test_prefix_and_pattern() {
    let tmp_dir = TempDir::new("bytebpe_persistence").unwrap();
    let tokenizer = low_tokenizer();

    let (vocab_path, merges_path) = tokenizer.save_with_prefix(tmp_dir.path(), "news").unwrap();
    assert_eq!(vocab_path, tmp_dir.path().join("news-vocab.json"));
    assert_eq!(merges_path, tmp_dir.path().join("news-merges.txt"));

    assert!(matches!(
        ByteLevelBpeTokenizer::<u32>::load(tmp_dir.path()),
        Err(Error::Io(_))
    ));

    let loaded: ByteLevelBpeTokenizer =
        ByteLevelBpeTokenizer::load_with_pattern(tmp_dir.path(), Some("news"), BYTE_LEVEL_WORD_PATTERN)
            .unwrap();
    assert_eq!(loaded.vocab(), tokenizer.vocab());

    // Single character words leave nothing to merge.
    let per_char: ByteLevelBpeTokenizer =
        ByteLevelBpeTokenizer::load_with_pattern(tmp_dir.path(), Some("news"), r"\w").unwrap();
    assert_eq!(per_char.vocab().pattern(), r"\w");
    let encoding = per_char.encode("low er");
    assert_eq!(encoding.tokens, vec!["l", "o", "w", "Ġ", "e", "r"]);
    assert_eq!(per_char.decode(&encoding.ids).unwrap(), "low er");
}

#[test]
fn test_load_without_special_header() {
    let tmp_dir = TempDir::new("bytebpe_persistence").unwrap();
    let tokenizer = low_tokenizer();
    let (_, merges_path) = tokenizer.save(tmp_dir.path()).unwrap();

    rewrite_lines(&merges_path, |line| {
        (!line.starts_with("#special_tokens")).then(|| line.to_string())
    });

    let loaded: ByteLevelBpeTokenizer = ByteLevelBpeTokenizer::load(tmp_dir.path()).unwrap();
    assert_eq!(loaded.special_tokens(), vec![("<s>", 256), ("<pad>", 257)]);
    assert_eq!(loaded.encode("<pad>lower").ids, vec![257, 260, b'r' as u32]);
}

#[test]
fn test_reject_special_mismatch() {
    let tmp_dir = TempDir::new("bytebpe_persistence").unwrap();
    let (_, merges_path) = low_tokenizer().save(tmp_dir.path()).unwrap();

    rewrite_lines(&merges_path, |line| {
        if line.starts_with("#special_tokens") {
            Some(r#"#special_tokens: ["<s>"]"#.to_string())
        } else {
            Some(line.to_string())
        }
    });

    assert!(matches!(
        ByteLevelBpeTokenizer::<u32>::load(tmp_dir.path()),
        Err(Error::CorruptArtifact(_))
    ));
}

#[test]
fn test_reject_missing_merge_parent() {
    let tmp_dir = TempDir::new("bytebpe_persistence").unwrap();
    let (_, merges_path) = low_tokenizer().save(tmp_dir.path()).unwrap();

    // "lo w" now refers to a symbol no earlier merge produced.
    rewrite_lines(&merges_path, |line| {
        (line != "l o").then(|| line.to_string())
    });

    assert!(matches!(
        ByteLevelBpeTokenizer::<u32>::load(tmp_dir.path()),
        Err(Error::CorruptArtifact(_))
    ));
}

#[test]
fn test_reject_reordered_merges() {
    let tmp_dir = TempDir::new("bytebpe_persistence").unwrap();
    let (_, merges_path) = low_tokenizer().save(tmp_dir.path()).unwrap();

    rewrite_lines(&merges_path, |line| match line {
        "l o" => Some("lo w".to_string()),
        "lo w" => Some("l o".to_string()),
        _ => Some(line.to_string()),
    });

    assert!(matches!(
        ByteLevelBpeTokenizer::<u32>::load(tmp_dir.path()),
        Err(Error::CorruptArtifact(_))
    ));
}

#[test]
fn test_reject_corrupt_vocab() {
    let tmp_dir = TempDir::new("bytebpe_persistence").unwrap();
    let (vocab_path, _) = low_tokenizer().save(tmp_dir.path()).unwrap();

    let mut vocab: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&vocab_path).unwrap()).unwrap();

    // Dropping a base symbol leaves a hole in the ids.
    let mut holed = vocab.clone();
    holed.remove("a");
    std::fs::write(&vocab_path, serde_json::to_string(&holed).unwrap()).unwrap();
    assert!(matches!(
        ByteLevelBpeTokenizer::<u32>::load(tmp_dir.path()),
        Err(Error::CorruptArtifact(_))
    ));

    // A merge result missing from the vocabulary.
    vocab.remove("lowe");
    std::fs::write(&vocab_path, serde_json::to_string(&vocab).unwrap()).unwrap();
    assert!(matches!(
        ByteLevelBpeTokenizer::<u32>::load(tmp_dir.path()),
        Err(Error::CorruptArtifact(_))
    ));

    std::fs::write(&vocab_path, "{ not json").unwrap();
    assert!(matches!(
        ByteLevelBpeTokenizer::<u32>::load(tmp_dir.path()),
        Err(Error::CorruptArtifact(_))
    ));
}

#[test]
fn test_train_from_files() {
    let tmp_dir = TempDir::new("bytebpe_persistence").unwrap();
    let path = tmp_dir.path().join("train.txt");
    std::fs::write(&path, CORPUS.join("\n\n") + "\n   \n").unwrap();

    let options = BpeTrainerOptions::new(320).with_special_tokens(["<s>"]);

    let from_files: ByteLevelBpeTokenizer =
        ByteLevelBpeTokenizer::train_from_files(&[&path], options.clone()).unwrap();
    let from_samples: ByteLevelBpeTokenizer =
        ByteLevelBpeTokenizer::train(CORPUS, options.clone()).unwrap();
    assert_eq!(from_files.vocab(), from_samples.vocab());

    assert!(matches!(
        ByteLevelBpeTokenizer::<u32>::train_from_files(&[tmp_dir.path().join("missing.txt")], options),
        Err(Error::Io(_))
    ));
}
