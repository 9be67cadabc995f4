//! Turn per-token BIO predictions into whole-entity spans.

use std::collections::HashMap;

use tracing::warn;

use crate::nlp::ner::Span;

/// CoNLL-03 label order used by `dslim/bert-base-NER`.
pub const CONLL_LABELS: &[&str] = &[
    "O", "B-MISC", "I-MISC", "B-PER", "I-PER", "B-ORG", "I-ORG", "B-LOC", "I-LOC",
];

/// Label assigned to a single non-special token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPrediction {
    /// Byte offset where the token starts in the source text.
    pub start: usize,
    /// Byte offset one past the token's last byte.
    pub end: usize,
    pub label: String,
    pub score: f64,
}

/// Index and softmax probability of the highest logit.
pub fn argmax_softmax(logits: &[f32]) -> Option<(usize, f64)> {
    let (best_idx, best) = logits
        .iter()
        .copied()
        .enumerate()
        .fold(None::<(usize, f32)>, |acc, (idx, value)| match acc {
            Some((_, max)) if max >= value => acc,
            _ => Some((idx, value)),
        })?;
    let exp_sum: f32 = logits.iter().map(|v| (v - best).exp()).sum();
    Some((best_idx, f64::from(1.0 / exp_sum)))
}

/// Index-ordered label names from a model config's `id2label` map.
///
/// Ids must fall in `0..id2label.len()`; others are ignored so a malformed
/// config cannot inflate the table. Gaps become `LABEL_<id>`. An empty or
/// unusable map falls back to [`CONLL_LABELS`].
pub fn label_table(id2label: &HashMap<String, String>) -> Vec<String> {
    let size = id2label.len();
    let mut labels: Vec<Option<String>> = vec![None; size];
    for (id, label) in id2label {
        match id.parse::<usize>() {
            Ok(idx) if idx < size => labels[idx] = Some(label.clone()),
            _ => warn!(%id, %label, "ignoring out-of-range id2label entry"),
        }
    }
    if labels.iter().all(Option::is_none) {
        return CONLL_LABELS.iter().map(|label| label.to_string()).collect();
    }
    labels
        .into_iter()
        .enumerate()
        .map(|(idx, label)| label.unwrap_or_else(|| format!("LABEL_{idx}")))
        .collect()
}

fn split_tag(label: &str) -> (bool, &str) {
    if let Some(tag) = label.strip_prefix("B-") {
        (true, tag)
    } else if let Some(tag) = label.strip_prefix("I-") {
        (false, tag)
    } else {
        (false, label)
    }
}

struct OpenGroup<'a> {
    tag: &'a str,
    start: usize,
    end: usize,
    scores: Vec<f64>,
}

impl OpenGroup<'_> {
    fn close(self, text: &str) -> Option<Span> {
        let surface = text.get(self.start..self.end)?;
        if surface.trim().is_empty() {
            return None;
        }
        let score = self.scores.iter().sum::<f64>() / self.scores.len() as f64;
        Some(Span {
            start: self.start,
            end: self.end,
            label: self.tag.to_string(),
            text: surface.to_string(),
            score,
        })
    }
}

/// Merge consecutive tokens that share an entity tag.
///
/// A token joins the open group when its tag matches and it is not a `B-`
/// token. `O` tokens close the open group and are dropped. Tokens must be in
/// text order with special tokens already removed.
pub fn group_entities(text: &str, tokens: &[TokenPrediction]) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut open: Option<OpenGroup<'_>> = None;

    for token in tokens {
        if token.label == "O" {
            spans.extend(open.take().and_then(|group| group.close(text)));
            continue;
        }
        let (begins, tag) = split_tag(&token.label);
        match open.as_mut() {
            Some(group) if group.tag == tag && !begins => {
                group.end = token.end;
                group.scores.push(token.score);
            }
            _ => {
                spans.extend(open.take().and_then(|group| group.close(text)));
                open = Some(OpenGroup {
                    tag,
                    start: token.start,
                    end: token.end,
                    scores: vec![token.score],
                });
            }
        }
    }
    spans.extend(open.and_then(|group| group.close(text)));
    spans
}
