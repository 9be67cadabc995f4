#![allow(dead_code)]

use std::sync::Arc;

use entity_augment::{
    error::NerError,
    nlp::ner::{Ner, Span},
};

/// Recognizer driven by a closure so tests can script model output.
pub struct ScriptedNer<F>(F);

impl<F> ScriptedNer<F>
where
    F: Fn(&str) -> Result<Vec<Span>, NerError> + Send + Sync,
{
    pub fn new(script: F) -> Self {
        Self(script)
    }
}

impl<F> Ner for ScriptedNer<F>
where
    F: Fn(&str) -> Result<Vec<Span>, NerError> + Send + Sync,
{
    fn extract(&self, text: &str) -> Result<Vec<Span>, NerError> {
        (self.0)(text)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn span(text: &str, label: &str) -> Span {
    Span {
        start: 0,
        end: text.len(),
        label: label.to_string(),
        text: text.to_string(),
        score: 0.99,
    }
}

/// Parses texts of the form `Alice|PER;Acme|ORG`; a text containing `FAIL`
/// makes the recognizer error.
pub fn encoded_ner() -> ScriptedNer<impl Fn(&str) -> Result<Vec<Span>, NerError> + Send + Sync> {
    ScriptedNer::new(|text: &str| {
        if text.contains("FAIL") {
            return Err(NerError::Inference("scripted failure".into()));
        }
        Ok(text
            .split(';')
            .filter_map(|item| item.split_once('|'))
            .map(|(surface, label)| span(surface, label))
            .collect())
    })
}

/// Loader handing [`encoded_ner`] to the pipeline.
pub fn load_encoded() -> anyhow::Result<Arc<dyn Ner>> {
    let ner: Arc<dyn Ner> = Arc::new(encoded_ner());
    Ok(ner)
}
