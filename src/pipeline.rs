//! Load, annotate and persist a dataset in one pass.

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use tracing::{error, info, instrument};

use crate::{
    config::Settings,
    data::{load_dataset, save_augmented_dataset},
    nlp::{self, ner::Ner},
};

/// Result of a pipeline run that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The augmented CSV was written.
    Written { path: PathBuf, rows: usize },
    /// The input lacked the text column; nothing was written.
    MissingColumn { column: String },
}

/// Augment `settings.input_csv` and write `settings.output_csv`.
///
/// File errors propagate. A missing text column is reported and returned as
/// [`Outcome::MissingColumn`] rather than as an error. `load_ner` is only
/// called once the text column is known to exist.
#[instrument(skip_all, fields(input = %settings.input_csv.display()))]
pub fn run<F>(settings: &Settings, load_ner: F) -> Result<Outcome>
where
    F: FnOnce() -> Result<Arc<dyn Ner>>,
{
    info!("Loading dataset from: {}", settings.input_csv.display());
    let mut table = load_dataset(&settings.input_csv)?;

    let Some(texts) = table.column(&settings.text_column) else {
        error!("Column '{}' not found in the CSV.", settings.text_column);
        return Ok(Outcome::MissingColumn {
            column: settings.text_column.clone(),
        });
    };

    let ner = load_ner()?;
    let entities = nlp::extract_entities(ner.as_ref(), &texts);
    table.set_column(&settings.target_column, entities)?;
    save_augmented_dataset(&table, &settings.output_csv)?;

    Ok(Outcome::Written {
        path: settings.output_csv.clone(),
        rows: table.len(),
    })
}
