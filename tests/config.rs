use std::{collections::HashMap, path::PathBuf};

use entity_augment::{
    cli::Backend,
    config::{Settings, DEFAULT_INPUT_CSV, DEFAULT_OUTPUT_CSV},
};

fn settings_from(pairs: &[(&str, &str)]) -> anyhow::Result<Settings> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_match_fixed_file_names() {
    let settings = settings_from(&[]).unwrap();
    assert_eq!(settings.input_csv, PathBuf::from(DEFAULT_INPUT_CSV));
    assert_eq!(settings.output_csv, PathBuf::from(DEFAULT_OUTPUT_CSV));
    assert_eq!(settings.text_column, "text");
    assert_eq!(settings.target_column, "target_entities");
    assert_eq!(settings.model_dir, PathBuf::from("./data/models/bert-base-NER"));
    assert_eq!(settings.backend, Backend::default());
    assert!(settings.gazetteer.is_none());
}

#[test]
fn overrides_are_honoured() {
    let settings = settings_from(&[
        ("INPUT_CSV", "in.csv"),
        ("DATA_DIR", "/srv/ner"),
        ("NER_BACKEND", "Dictionary"),
        ("GAZETTEER_PATH", "terms.csv"),
    ])
    .unwrap();
    assert_eq!(settings.input_csv, PathBuf::from("in.csv"));
    assert_eq!(settings.model_dir, PathBuf::from("/srv/ner/models/bert-base-NER"));
    assert_eq!(settings.backend, Backend::Dictionary);
    assert_eq!(settings.gazetteer, Some(PathBuf::from("terms.csv")));
}

#[test]
fn unknown_backend_is_rejected() {
    let err = settings_from(&[("NER_BACKEND", "spacy")]).unwrap_err();
    assert!(err.to_string().contains("spacy"));
}
