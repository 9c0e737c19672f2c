//! # Token Encoders

pub mod merge_rank_encoder;
pub mod token_encoder;

pub use merge_rank_encoder::MergeRankEncoder;
pub use token_encoder::TokenEncoder;
