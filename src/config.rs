//! Runtime configuration utilities for entity-augment.

use std::{env, path::PathBuf};

use anyhow::{anyhow, Result};
use clap::ValueEnum;

use crate::cli::Backend;

/// Input file read when nothing else is configured.
pub const DEFAULT_INPUT_CSV: &str = "neon_labeled.csv";
/// Output file written when nothing else is configured.
pub const DEFAULT_OUTPUT_CSV: &str = "neon_labeled_with_entities.csv";
/// Column holding the text to annotate.
pub const DEFAULT_TEXT_COLUMN: &str = "text";
/// Column receiving the joined entity mentions.
pub const DEFAULT_TARGET_COLUMN: &str = "target_entities";

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// CSV dataset to augment.
    pub input_csv: PathBuf,
    /// Destination of the augmented CSV.
    pub output_csv: PathBuf,
    /// Name of the column that must exist in the input.
    pub text_column: String,
    /// Name of the appended entity column.
    pub target_column: String,
    /// Root folder for model and gazetteer artefacts.
    pub data_dir: PathBuf,
    /// Directory holding `model.onnx`, `tokenizer.json` and `config.json`.
    pub model_dir: PathBuf,
    /// Optional `term,label` CSV replacing the built-in gazetteer.
    pub gazetteer: Option<PathBuf>,
    /// Recognizer implementation to load.
    pub backend: Backend,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let input_csv = lookup("INPUT_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_CSV));
        let output_csv = lookup("OUTPUT_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_CSV));
        let text_column =
            lookup("TEXT_COLUMN").unwrap_or_else(|| DEFAULT_TEXT_COLUMN.to_string());
        let target_column =
            lookup("TARGET_COLUMN").unwrap_or_else(|| DEFAULT_TARGET_COLUMN.to_string());
        let data_dir = lookup("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));
        let model_dir = lookup("NER_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("models/bert-base-NER"));
        let gazetteer = lookup("GAZETTEER_PATH").map(PathBuf::from);
        let backend = match lookup("NER_BACKEND") {
            Some(name) => Backend::from_str(name.trim(), true)
                .map_err(|_| anyhow!("unknown NER_BACKEND {name:?}"))?,
            None => Backend::default(),
        };

        Ok(Self {
            input_csv,
            output_csv,
            text_column,
            target_column,
            data_dir,
            model_dir,
            gazetteer,
            backend,
        })
    }
}
