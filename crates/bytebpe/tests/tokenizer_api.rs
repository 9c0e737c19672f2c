use bytebpe::{
    BASE_ALPHABET_SIZE, BpeTrainerOptions, ByteLevelBpeTokenizer, DEFAULT_SPECIAL_TOKENS, Error,
    SpecialPlacement,
};

const CORPUS: [&str; 8] = [
    "Stocks rallied on Wall Street after positive earnings reports.",
    "Oil prices fell sharply as markets opened on Monday.",
    "The home team won the championship in overtime!",
    "Scientists report a new species of deep-sea fish.",
    "Stocks fell on Monday after the earnings reports.",
    "The new species of fish was found on Monday.",
    "Markets rallied after the home team won.",
    "Oil prices rallied on Wall Street.",
];

fn corpus_options(vocab_size: usize) -> BpeTrainerOptions {
    BpeTrainerOptions::new(vocab_size).with_special_tokens(DEFAULT_SPECIAL_TOKENS)
}

fn train(options: BpeTrainerOptions) -> ByteLevelBpeTokenizer {
    ByteLevelBpeTokenizer::train(CORPUS, options).unwrap()
}

#[test]
fn test_round_trip_text() {
    let tokenizer = train(corpus_options(400));

    for sample in [
        "",
        " ",
        "   \t\n  ",
        "\r\n\r\n",
        "Stocks rallied on Wall Street after positive earnings reports.",
        "Never seen before: zxqv jjjj 12345678!",
        "héllo wörld — naïve café",
        "你好，世界 🎉 мир",
        "<s>Oil prices</s><pad><pad>",
        "<s <s>> </s",
        "trailing spaces   ",
    ] {
        let encoding = tokenizer.encode(sample);
        assert_eq!(encoding.tokens.len(), encoding.ids.len());
        assert_eq!(tokenizer.decode(&encoding.ids).unwrap(), sample, "{sample:?}");

        let ordinary = tokenizer.encode_ordinary(sample);
        assert_eq!(tokenizer.decode(&ordinary.ids).unwrap(), sample, "{sample:?}");
    }

    assert!(tokenizer.encode("").is_empty());
}

#[test]
fn test_round_trip_binary() {
    let tokenizer = train(corpus_options(400));

    let all_bytes: Vec<u8> = (0..=255).collect();
    let mixed: Vec<u8> = b"ok \xff\xfe text \xc3 more \xe4\xbd\xa0\xe5"
        .iter()
        .copied()
        .chain((0..=255).rev())
        .collect();

    for sample in [all_bytes, mixed, vec![], vec![0x80], b"plain".to_vec()] {
        let encoding = tokenizer.encode_bytes(&sample);
        assert_eq!(tokenizer.decode_to_bytes(&encoding.ids).unwrap(), sample);
    }

    // Valid UTF-8 encodes the same either way.
    let text = "Oil prices rallied on Monday.";
    assert_eq!(tokenizer.encode_bytes(text.as_bytes()), tokenizer.encode(text));
}

#[test]
fn test_no_oov() {
    let tokenizer = train(corpus_options(400));
    let vocab_size = tokenizer.vocab_size() as u32;

    let bytes: Vec<u8> = (0..=255).chain(0..=255).collect();
    let encoding = tokenizer.encode_bytes(&bytes);
    assert!(!encoding.is_empty());
    for (&id, token) in encoding.ids.iter().zip(&encoding.tokens) {
        assert!(id < vocab_size);
        assert_eq!(tokenizer.id_to_token(id), Some(token.as_str()));
    }

    // Unseen characters fall back to their byte symbols.
    let encoding = tokenizer.encode("🦀");
    assert_eq!(encoding.ids.len(), 4);
    assert_eq!(tokenizer.decode(&encoding.ids).unwrap(), "🦀");
}

#[test]
fn test_training_is_deterministic() {
    for parallel in [false, bytebpe::DEFAULT_PARALLEL] {
        let a = train(corpus_options(350).with_parallel(parallel));
        let b = train(corpus_options(350).with_parallel(parallel));

        let a_rules: Vec<(&str, &str)> = a.merge_rules().collect();
        let b_rules: Vec<(&str, &str)> = b.merge_rules().collect();
        assert_eq!(a_rules, b_rules);
        assert_eq!(a.vocab(), b.vocab());
    }

    let serial = train(corpus_options(350).with_parallel(false));
    let default = train(corpus_options(350));
    assert_eq!(serial.vocab(), default.vocab());
}

#[test]
fn test_bounded_growth() {
    let target = BASE_ALPHABET_SIZE + DEFAULT_SPECIAL_TOKENS.len() + 20;
    let tokenizer = train(corpus_options(target));
    assert_eq!(tokenizer.vocab_size(), target);
    assert_eq!(tokenizer.merge_rules().count(), 20);

    // A large target stops early at `min_frequency`.
    let tokenizer = train(corpus_options(5_000));
    assert!(tokenizer.vocab_size() < 5_000);

    let lenient = train(corpus_options(5_000).with_min_frequency(1));
    assert!(lenient.vocab_size() > tokenizer.vocab_size());
    assert!(lenient.vocab_size() <= 5_000);
}

#[test]
fn test_merge_validity() {
    for placement in [SpecialPlacement::AfterAlphabet, SpecialPlacement::BeforeAlphabet] {
        let tokenizer = train(corpus_options(500).with_special_placement(placement));

        let mut seen = std::collections::HashSet::new();
        for (left, right) in tokenizer.merge_rules() {
            let merged = format!("{left}{right}");
            assert!(seen.insert(merged.clone()), "{merged:?} produced twice");

            let left_id = tokenizer.token_to_id(left).unwrap();
            let right_id = tokenizer.token_to_id(right).unwrap();
            let merged_id = tokenizer.token_to_id(&merged).unwrap();
            assert!(left_id < merged_id);
            assert!(right_id < merged_id);
        }

        // Ids are dense.
        for id in 0..tokenizer.vocab_size() as u32 {
            assert!(tokenizer.id_to_token(id).is_some());
        }
    }
}

#[test]
fn test_special_token_atomicity() {
    for vocab_size in [BASE_ALPHABET_SIZE + DEFAULT_SPECIAL_TOKENS.len() + 1, 400] {
        let tokenizer = train(corpus_options(vocab_size));

        let specials = tokenizer.special_tokens();
        assert_eq!(specials.len(), DEFAULT_SPECIAL_TOKENS.len());
        for (expected, (word, id)) in DEFAULT_SPECIAL_TOKENS.iter().zip(&specials) {
            assert_eq!(expected, word);

            let encoding = tokenizer.encode(word);
            assert_eq!(encoding.ids, vec![*id]);
            assert_eq!(encoding.tokens, vec![word.to_string()]);
        }

        let encoding = tokenizer.encode("Oil<mask> prices</s>");
        let mask = tokenizer.token_to_id("<mask>").unwrap();
        let end = tokenizer.token_to_id("</s>").unwrap();
        assert_eq!(encoding.ids.iter().filter(|&&id| id == mask).count(), 1);
        assert_eq!(encoding.ids.last(), Some(&end));
    }

    let tokenizer = train(corpus_options(400).with_special_placement(SpecialPlacement::BeforeAlphabet));
    assert_eq!(tokenizer.encode("<s>").ids, vec![0]);
    assert_eq!(tokenizer.encode("<mask>").ids, vec![4]);
    assert_eq!(tokenizer.token_to_id("Ġ"), Some(5 + b' ' as u32));
}

#[test]
fn test_low_lower_lowest() {
    let corpus = ["low", "lower", "lowest", "low"];

    for vocab_size in [BASE_ALPHABET_SIZE + 3, 1_000] {
        let tokenizer: ByteLevelBpeTokenizer = ByteLevelBpeTokenizer::train(
            corpus,
            BpeTrainerOptions::new(vocab_size).with_min_frequency(2),
        )
        .unwrap();

        let rules: Vec<(&str, &str)> = tokenizer.merge_rules().collect();
        assert_eq!(rules, vec![("l", "o"), ("lo", "w"), ("low", "e")]);
        assert_eq!(tokenizer.vocab_size(), BASE_ALPHABET_SIZE + 3);

        assert_eq!(tokenizer.token_to_id("lo"), Some(256));
        assert_eq!(tokenizer.token_to_id("low"), Some(257));
        assert_eq!(tokenizer.token_to_id("lowe"), Some(258));

        let encoding = tokenizer.encode("lower lowest");
        assert_eq!(encoding.tokens, vec!["lowe", "r", "Ġ", "lowe", "s", "t"]);
        assert_eq!(encoding.ids[..2], [258, b'r' as u32]);
    }
}

#[test]
fn test_decode_unknown_id() {
    let tokenizer = train(corpus_options(300));
    let unknown = tokenizer.vocab_size() as u32 + 7;

    match tokenizer.decode(&[0, 1, unknown, 2]) {
        Err(Error::Decode { token }) => assert_eq!(token, unknown as u64),
        other => panic!("expected a decode error, got {other:?}"),
    }
    assert!(tokenizer.decode_to_bytes(&[unknown]).is_err());
    assert!(tokenizer.decode_batch(&[vec![0], vec![unknown]]).is_err());
}

#[test]
fn test_config_errors() {
    let too_small = BASE_ALPHABET_SIZE + DEFAULT_SPECIAL_TOKENS.len();
    assert!(matches!(
        ByteLevelBpeTokenizer::<u32>::train(CORPUS, corpus_options(too_small)),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        ByteLevelBpeTokenizer::<u32>::train(CORPUS, BpeTrainerOptions::new(300).with_min_frequency(0)),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        ByteLevelBpeTokenizer::<u32>::train(CORPUS, corpus_options(300).with_pattern("(")),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        ByteLevelBpeTokenizer::<u8>::train(CORPUS, BpeTrainerOptions::new(300)),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_no_data() {
    let empty: [&str; 0] = [];
    assert!(matches!(
        ByteLevelBpeTokenizer::<u32>::train(empty, corpus_options(300)),
        Err(Error::NoData(_))
    ));
    assert!(matches!(
        ByteLevelBpeTokenizer::<u32>::train(["", ""], corpus_options(300)),
        Err(Error::NoData(_))
    ));
    // Special tokens alone are not training data.
    assert!(matches!(
        ByteLevelBpeTokenizer::<u32>::train(["<s></s>"], corpus_options(300)),
        Err(Error::NoData(_))
    ));
}

#[test]
fn test_concurrent_encode_decode() {
    let tokenizer = train(corpus_options(400));

    std::thread::scope(|scope| {
        for sample in CORPUS {
            let tokenizer = &tokenizer;
            scope.spawn(move || {
                let encoding = tokenizer.encode(sample);
                assert_eq!(tokenizer.decode(&encoding.ids).unwrap(), sample);
            });
        }
    });

    let batch: Vec<String> = CORPUS.iter().map(|s| s.to_string()).collect();
    let encodings = tokenizer.encode_batch(&batch);
    let ids: Vec<Vec<u32>> = encodings.iter().map(|e| e.ids.clone()).collect();
    assert_eq!(tokenizer.decode_batch(&ids).unwrap(), batch);
}
