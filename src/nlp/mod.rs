//! Entity extraction over a sequence of texts.

pub mod grouping;
pub mod ner;
#[cfg(feature = "onnx")]
pub mod onnx;

use indexmap::IndexSet;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::error::NerError;
use ner::{Ner, Span};

/// Separator placed between surface forms in the entity column.
pub const ENTITY_SEPARATOR: &str = ", ";

/// Mentions of retained categories, in model order.
pub fn retained_spans(ner: &dyn Ner, text: &str) -> Result<Vec<Span>, NerError> {
    let spans = ner.extract(text)?;
    Ok(spans
        .into_iter()
        .filter(|span| span.category().is_some())
        .collect())
}

/// Join unique surface forms with [`ENTITY_SEPARATOR`].
///
/// Duplicates are collapsed on the exact surface form; the first occurrence
/// fixes the position.
pub fn join_unique(spans: &[Span]) -> String {
    let unique: IndexSet<&str> = spans.iter().map(|span| span.text.as_str()).collect();
    unique.into_iter().collect::<Vec<_>>().join(ENTITY_SEPARATOR)
}

/// Entity column value for one text.
pub fn entity_string(ner: &dyn Ner, text: &str) -> Result<String, NerError> {
    let spans = retained_spans(ner, text)?;
    Ok(join_unique(&spans))
}

/// Compute the entity string of every text, one output per input.
///
/// A recognizer failure is logged and yields an empty string for that text
/// only.
pub fn extract_entities<S: AsRef<str>>(ner: &dyn Ner, texts: &[S]) -> Vec<String> {
    let progress = progress_bar(texts.len());
    let mut failures = 0usize;
    let mut entities_col = Vec::with_capacity(texts.len());

    for (row, text) in texts.iter().enumerate() {
        match entity_string(ner, text.as_ref()) {
            Ok(entities) => entities_col.push(entities),
            Err(err) => {
                failures += 1;
                progress.suspend(|| warn!(row, %err, "Error processing text"));
                entities_col.push(String::new());
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!(
        rows = texts.len(),
        failures,
        backend = ner.name(),
        "extracted entities"
    );
    entities_col
}

fn progress_bar(len: usize) -> ProgressBar {
    let progress = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style.progress_chars("#>-"));
    progress.set_message("Extracting Entities");
    progress
}
