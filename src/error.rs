//! Errors raised at the recognizer seam.

use thiserror::Error;

/// Failure signalled by an entity recognizer for a single input text.
///
/// The extraction loop treats every variant the same way: the record gets an
/// empty entity string and processing moves on.
#[derive(Debug, Error)]
pub enum NerError {
    #[error("tokenization failed: {0}")]
    Tokenize(String),
    #[error("model inference failed: {0}")]
    Inference(String),
    #[error("input has {tokens} tokens, model accepts at most {max}")]
    InputTooLong { tokens: usize, max: usize },
    #[error("unexpected model output: {0}")]
    Output(String),
}
