//! # Vocabulary Training
//!
//! ```rust,no_run
//! use bytebpe::training::BpeTrainerOptions;
//! use bytebpe::vocab::BpeVocab;
//!
//! let samples = vec!["low", "lower", "lowest", "low"];
//!
//! let mut trainer = BpeTrainerOptions::new(1000)
//!     .with_special_tokens(["<s>", "</s>"])
//!     .init::<u64>()?;
//! trainer.update_from_samples(samples.iter());
//!
//! let vocab: BpeVocab<u32> = trainer.train()?;
//! # Ok::<(), bytebpe::errors::Error>(())
//! ```

pub mod bpe_trainer;
pub mod merge_job;
pub mod pair_index;
pub mod word;
pub mod word_counter;

pub use bpe_trainer::{BpeTrainer, BpeTrainerOptions, SpecialPlacement};
pub use word_counter::{WordCountMap, WordCounter, WordCounterOptions};
