//! Text-to-frequency analysis pipeline
//!
//! text → [`normalize_and_tokenize`] → [`aggregate`] → ranked [`WordFrequency`] list.
//! Both stages are pure, synchronous and deterministic.

pub mod aggregator;
pub mod tokenizer;

pub use aggregator::{aggregate, rank};
pub use tokenizer::normalize_and_tokenize;

use wfa_common::api::WordFrequency;

/// Run the full pipeline over one document's text
pub fn analyze_text(text: &str) -> Vec<WordFrequency> {
    let tokens = normalize_and_tokenize(text);
    aggregate(&tokens)
}
