//! Token-aware chunking for web search results.

pub mod chunking;

pub use chunking::{tokenizer_for, Chunker};
