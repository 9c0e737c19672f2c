//! # Token Decoders

pub mod decode_context;
pub mod dictionary_decoder;
pub mod token_decoder;

pub use decode_context::TokenDecodeContext;
pub use dictionary_decoder::DictionaryDecoder;
pub use token_decoder::TokenDecoder;
