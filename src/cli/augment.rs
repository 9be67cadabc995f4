//! CLI entry-point for augmenting a CSV dataset.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    cli::Backend,
    config::Settings,
    nlp::ner,
    pipeline::{self, Outcome},
};

/// Args for the `augment` command. Unset flags fall back to configuration.
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct Args {
    /// CSV file to read.
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// CSV file to write.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Column holding the text to annotate.
    #[arg(long)]
    pub text_column: Option<String>,
    /// Column receiving the entity list.
    #[arg(long)]
    pub target_column: Option<String>,
    /// Recognizer implementation.
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,
}

impl Args {
    /// Overlay explicit flags on top of loaded settings.
    pub fn apply(self, mut settings: Settings) -> Settings {
        if let Some(input) = self.input {
            settings.input_csv = input;
        }
        if let Some(output) = self.output {
            settings.output_csv = output;
        }
        if let Some(column) = self.text_column {
            settings.text_column = column;
        }
        if let Some(column) = self.target_column {
            settings.target_column = column;
        }
        if let Some(backend) = self.backend {
            settings.backend = backend;
        }
        settings
    }
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let settings = args.apply(settings);
    match pipeline::run(&settings, || ner::load_model(&settings))? {
        Outcome::Written { path, rows } => {
            info!(path = %path.display(), rows, "augmentation complete");
        }
        Outcome::MissingColumn { column } => {
            info!(%column, "augmentation skipped");
        }
    }
    Ok(())
}
