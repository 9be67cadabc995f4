use std::collections::HashMap;

use entity_augment::nlp::grouping::{
    argmax_softmax, group_entities, label_table, TokenPrediction, CONLL_LABELS,
};

fn tok(text: &str, word: &str, from: usize, label: &str) -> TokenPrediction {
    let start = text[from..].find(word).unwrap() + from;
    TokenPrediction {
        start,
        end: start + word.len(),
        label: label.to_string(),
        score: 0.9,
    }
}

#[test]
fn bio_tokens_group_into_whole_entities() {
    let text = "Barack Obama visited Paris.";
    let tokens = vec![
        tok(text, "Barack", 0, "B-PER"),
        tok(text, "Obama", 0, "I-PER"),
        tok(text, "visited", 0, "O"),
        tok(text, "Paris", 0, "B-LOC"),
        tok(text, ".", 0, "O"),
    ];
    let spans = group_entities(text, &tokens);
    let found: Vec<(&str, &str)> = spans
        .iter()
        .map(|s| (s.text.as_str(), s.label.as_str()))
        .collect();
    assert_eq!(found, vec![("Barack Obama", "PER"), ("Paris", "LOC")]);
}

#[test]
fn subword_pieces_join_into_one_surface_form() {
    let text = "Welcome to Wolfsburg";
    let tokens = vec![
        TokenPrediction { start: 11, end: 15, label: "B-LOC".into(), score: 0.8 },
        TokenPrediction { start: 15, end: 17, label: "I-LOC".into(), score: 0.6 },
        TokenPrediction { start: 17, end: 20, label: "I-LOC".into(), score: 0.7 },
    ];
    let spans = group_entities(text, &tokens);
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].text, "Wolfsburg");
    assert!((spans[0].score - 0.7).abs() < 1e-9);
}

#[test]
fn tag_change_or_new_begin_splits_groups() {
    let text = "Acme Paris Berlin";
    let tokens = vec![
        tok(text, "Acme", 0, "B-ORG"),
        tok(text, "Paris", 0, "I-LOC"),
        tok(text, "Berlin", 0, "B-LOC"),
    ];
    let spans = group_entities(text, &tokens);
    let surfaces: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(surfaces, vec!["Acme", "Paris", "Berlin"]);
    assert_eq!(spans[1].label, "LOC");
}

#[test]
fn unprefixed_labels_extend_matching_group() {
    let text = "New York";
    let tokens = vec![tok(text, "New", 0, "LOC"), tok(text, "York", 0, "LOC")];
    let spans = group_entities(text, &tokens);
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].text, "New York");
}

#[test]
fn only_outside_tokens_yield_nothing() {
    let text = "The sky is blue.";
    let tokens = vec![tok(text, "The", 0, "O"), tok(text, "sky", 0, "O")];
    assert!(group_entities(text, &tokens).is_empty());
}

#[test]
fn softmax_picks_highest_logit() {
    let (idx, prob) = argmax_softmax(&[0.1, 3.0, -1.0]).unwrap();
    assert_eq!(idx, 1);
    assert!(prob > 0.8 && prob < 1.0);

    let (idx, prob) = argmax_softmax(&[2.0, 2.0]).unwrap();
    assert_eq!(idx, 0);
    assert!((prob - 0.5).abs() < 1e-6);

    assert!(argmax_softmax(&[]).is_none());
}

fn id2label(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(id, label)| (id.to_string(), label.to_string()))
        .collect()
}

#[test]
fn label_table_orders_by_id() {
    let labels = label_table(&id2label(&[("2", "B-PER"), ("0", "O"), ("1", "B-LOC")]));
    assert_eq!(labels, vec!["O", "B-LOC", "B-PER"]);
}

#[test]
fn label_table_ignores_ids_beyond_entry_count() {
    let labels = label_table(&id2label(&[("0", "O"), ("1000000000", "B-PER"), ("x", "B-ORG")]));
    assert_eq!(labels, vec!["O", "LABEL_1", "LABEL_2"]);
}

#[test]
fn label_table_falls_back_to_conll_order() {
    assert_eq!(label_table(&HashMap::new()), CONLL_LABELS.to_vec());
    assert_eq!(
        label_table(&id2label(&[("7", "B-PER")])),
        CONLL_LABELS.to_vec()
    );
}
