//! # Rayon Utilities
//!
//! Batch-level parallel wrappers; each item of a batch is still encoded
//! (or decoded) by the wrapped single-threaded implementation.

mod rayon_decoder;
mod rayon_encoder;

pub use rayon_decoder::ParallelRayonDecoder;
pub use rayon_encoder::ParallelRayonEncoder;
