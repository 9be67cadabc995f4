//! Command-line interface wiring for entity-augment.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Settings;

pub mod augment;
pub mod extract;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Named-entity augmentation for CSV datasets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command; no sub-command means `augment`.
    pub fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Some(Commands::Augment(args)) => augment::run(args, settings),
            Some(Commands::Extract(args)) => extract::run(args, settings),
            None => augment::run(augment::Args::default(), settings),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Append a target_entities column to a CSV dataset.
    Augment(augment::Args),
    /// Print the entities found in a single text.
    Extract(extract::Args),
}

/// Entity recognizer implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Whole-word gazetteer lookup.
    Dictionary,
    /// BERT token classification through ONNX Runtime.
    Onnx,
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(feature = "onnx") {
            Self::Onnx
        } else {
            Self::Dictionary
        }
    }
}
