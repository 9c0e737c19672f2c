use anyhow::Context;
use bytebpe::{
    BpeTrainerOptions, ByteLevelBpeTokenizer, DEFAULT_MIN_FREQUENCY, DEFAULT_SPECIAL_TOKENS,
    DEFAULT_VOCAB_SIZE, SpecialPlacement,
};
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

/// Example tokenizer trainer.
///
/// Trains a byte-level BPE tokenizer on text files (one record per non-blank line),
/// saves it, reloads it from disk, and prints the encoding of a few sentences.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Training text files.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Vocab size.
    #[arg(long, default_value_t = DEFAULT_VOCAB_SIZE)]
    pub vocab_size: usize,

    /// Minimum pair frequency for a merge.
    #[arg(long, default_value_t = DEFAULT_MIN_FREQUENCY)]
    pub min_frequency: usize,

    /// Directory to save `vocab.json` and `merges.txt` to.
    #[arg(long, default_value = "tokenizer")]
    pub output_dir: PathBuf,

    /// Optional artifact file name prefix.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Special tokens; comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SPECIAL_TOKENS.map(String::from))]
    pub special_tokens: Vec<String>,

    /// Give the special tokens the lowest ids, ahead of the byte alphabet.
    #[arg(long, default_value = "false")]
    pub specials_first: bool,

    /// Sentences to encode after reloading; defaults to a few built-in ones.
    #[arg(long)]
    pub demo: Vec<String>,

    /// Enable verbose output.
    #[arg(long, default_value = "false")]
    pub verbose: bool,
}

const DEMO_SENTENCES: [&str; 3] = [
    "Oil prices fell sharply as markets opened on Monday.",
    "The home team won the championship in overtime!",
    "Scientists report a new species of deep-sea fish.",
];

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();

    if args.verbose {
        println!("{:#?}", args);
    }

    let placement = if args.specials_first {
        SpecialPlacement::BeforeAlphabet
    } else {
        SpecialPlacement::AfterAlphabet
    };

    let options = BpeTrainerOptions::new(args.vocab_size)
        .with_min_frequency(args.min_frequency)
        .with_special_tokens(&args.special_tokens)
        .with_special_placement(placement);

    log::info!("training on {} input file(s)", args.inputs.len());
    let t0 = std::time::Instant::now();
    let tokenizer: ByteLevelBpeTokenizer =
        ByteLevelBpeTokenizer::train_from_files(args.inputs.as_slice(), options)
            .context("training failed")?;

    println!("- training_duration: {:#?}", t0.elapsed());
    println!("- vocab_size: {}", tokenizer.vocab_size());

    let (vocab_path, merges_path) = match &args.prefix {
        Some(prefix) => tokenizer.save_with_prefix(&args.output_dir, prefix),
        None => tokenizer.save(&args.output_dir),
    }
    .with_context(|| format!("saving to {}", args.output_dir.display()))?;
    println!("Tokenizer saved to {}/", args.output_dir.display());

    let tokenizer: ByteLevelBpeTokenizer =
        ByteLevelBpeTokenizer::load_from_files(&vocab_path, &merges_path)
            .context("reloading saved tokenizer")?;

    let demo: Vec<String> = if args.demo.is_empty() {
        DEMO_SENTENCES.map(String::from).to_vec()
    } else {
        args.demo.clone()
    };

    println!();
    for text in &demo {
        let encoding = tokenizer.encode(text);
        println!("Input: {text}");
        println!("Tokens: {:?}", encoding.tokens);
        println!("IDs:    {:?}", encoding.ids);
        println!("{}", "-".repeat(40));

        let decoded = tokenizer.decode(&encoding.ids)?;
        anyhow::ensure!(&decoded == text, "round trip failed for {text:?}");
    }

    Ok(())
}
