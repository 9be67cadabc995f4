//! Entity recognizer seam plus a gazetteer-backed implementation.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{cli::Backend, config::Settings, error::NerError};

/// Extracted entity span with byte offsets relative to the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub text: String,
    pub score: f64,
}

impl Span {
    /// Category of this mention, if it is one we keep.
    pub fn category(&self) -> Option<Category> {
        Category::from_label(&self.label)
    }
}

/// Entity categories retained in the augmented column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Person,
    Organization,
    Location,
    Miscellaneous,
}

impl Category {
    /// Map a model or gazetteer label onto a retained category.
    ///
    /// Accepts CoNLL short tags (`PER`, `ORG`, `LOC`, `MISC`), their long
    /// names, and BIO-prefixed forms such as `B-PER`.
    pub fn from_label(label: &str) -> Option<Self> {
        let tag = label
            .strip_prefix("B-")
            .or_else(|| label.strip_prefix("I-"))
            .unwrap_or(label)
            .trim();
        match tag.to_ascii_uppercase().as_str() {
            "PER" | "PERSON" => Some(Self::Person),
            "ORG" | "ORGANIZATION" | "ORGANISATION" => Some(Self::Organization),
            "LOC" | "LOCATION" => Some(Self::Location),
            "MISC" | "MISCELLANEOUS" => Some(Self::Miscellaneous),
            _ => None,
        }
    }
}

/// Trait for NER implementations.
///
/// Implementations return grouped whole-entity spans, not sub-word tokens.
pub trait Ner: Send + Sync {
    fn extract(&self, text: &str) -> Result<Vec<Span>, NerError>;

    /// Short identifier used in log lines.
    fn name(&self) -> &str;
}

/// Seed terms used when no gazetteer file is configured.
static SEED_TERMS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("Barack Obama", "PER"),
        ("Angela Merkel", "PER"),
        ("Marie Curie", "PER"),
        ("Albert Einstein", "PER"),
        ("Obama", "PER"),
        ("United Nations", "ORG"),
        ("European Union", "ORG"),
        ("NASA", "ORG"),
        ("Google", "ORG"),
        ("Microsoft", "ORG"),
        ("Reuters", "ORG"),
        ("Paris", "LOC"),
        ("London", "LOC"),
        ("Berlin", "LOC"),
        ("New York", "LOC"),
        ("Germany", "LOC"),
        ("France", "LOC"),
        ("Europe", "LOC"),
        ("English", "MISC"),
        ("French", "MISC"),
        ("German", "MISC"),
        ("Nobel Prize", "MISC"),
        ("Olympics", "MISC"),
    ]
});

#[derive(Debug, Deserialize)]
struct GazetteerRow {
    term: String,
    label: String,
}

/// Whole-word, case-sensitive dictionary matcher.
pub struct DictionaryNer {
    /// Sorted longest term first so overlapping matches favour the longer one.
    terms: Vec<(String, String)>,
}

impl DictionaryNer {
    pub fn new<I, T, L>(terms: I) -> Self
    where
        I: IntoIterator<Item = (T, L)>,
        T: Into<String>,
        L: Into<String>,
    {
        let mut terms: Vec<(String, String)> = terms
            .into_iter()
            .map(|(term, label)| (term.into(), label.into()))
            .filter(|(term, _)| !term.is_empty())
            .collect();
        terms.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { terms }
    }

    /// Gazetteer built from the seed term list.
    pub fn seeded() -> Self {
        Self::new(SEED_TERMS.iter().copied())
    }

    /// Load a `term,label` CSV gazetteer.
    pub fn from_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("opening gazetteer {}", path.display()))?;
        let mut terms = Vec::new();
        for result in reader.deserialize() {
            let row: GazetteerRow =
                result.with_context(|| format!("reading gazetteer {}", path.display()))?;
            terms.push((row.term, row.label));
        }
        info!(path = %path.display(), terms = terms.len(), "loaded gazetteer");
        Ok(Self::new(terms))
    }
}

impl Ner for DictionaryNer {
    fn extract(&self, text: &str) -> Result<Vec<Span>, NerError> {
        let mut spans: Vec<Span> = Vec::new();
        for (term, label) in &self.terms {
            for (start, _) in text.match_indices(term.as_str()) {
                let end = start + term.len();
                if !on_word_boundary(text, start, end) {
                    continue;
                }
                if spans.iter().any(|s| start < s.end && s.start < end) {
                    continue;
                }
                spans.push(Span {
                    start,
                    end,
                    label: label.clone(),
                    text: text[start..end].to_string(),
                    score: 0.8,
                });
            }
        }
        spans.sort_by_key(|span| span.start);
        Ok(spans)
    }

    fn name(&self) -> &str {
        "dictionary"
    }
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// Construct the configured recognizer.
pub fn load_model(settings: &Settings) -> Result<Arc<dyn Ner>> {
    let model: Arc<dyn Ner> = match settings.backend {
        Backend::Dictionary => {
            let configured = settings.gazetteer.clone().or_else(|| {
                let candidate = settings.data_dir.join("gazetteer.csv");
                candidate.exists().then_some(candidate)
            });
            let dictionary = match configured {
                Some(path) => DictionaryNer::from_csv(&path)?,
                None => DictionaryNer::seeded(),
            };
            Arc::new(dictionary)
        }
        Backend::Onnx => load_onnx(settings)?,
    };
    info!(backend = model.name(), "loaded entity recognizer");
    Ok(model)
}

#[cfg(feature = "onnx")]
fn load_onnx(settings: &Settings) -> Result<Arc<dyn Ner>> {
    let model = super::onnx::OnnxNer::load(&settings.model_dir)?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_settings: &Settings) -> Result<Arc<dyn Ner>> {
    anyhow::bail!("the onnx backend is not compiled in; rebuild with `--features onnx`")
}
