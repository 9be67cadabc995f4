//! CLI entry-point for inspecting the entities of one text.

use anyhow::Result;
use clap::Args as ClapArgs;
use serde::Serialize;
use tracing::instrument;

use crate::{
    cli::Backend,
    config::Settings,
    nlp::{self, ner},
};

/// Args for the `extract` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Text to run through the recognizer.
    #[arg(long)]
    pub text: String,
    /// Recognizer implementation.
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,
}

#[derive(Serialize)]
struct Mention<'a> {
    text: &'a str,
    category: ner::Category,
    start: usize,
    end: usize,
    score: f64,
}

#[instrument(skip(settings))]
pub fn run(args: Args, mut settings: Settings) -> Result<()> {
    if let Some(backend) = args.backend {
        settings.backend = backend;
    }
    let model = ner::load_model(&settings)?;
    let spans = nlp::retained_spans(model.as_ref(), &args.text)?;
    for span in &spans {
        let Some(category) = span.category() else {
            continue;
        };
        let mention = Mention {
            text: &span.text,
            category,
            start: span.start,
            end: span.end,
            score: span.score,
        };
        println!("{}", serde_json::to_string(&mention)?);
    }
    println!("{}", nlp::join_unique(&spans));
    Ok(())
}
