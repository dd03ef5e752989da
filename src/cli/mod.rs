// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
//
//   train    — learn a boundary model from annotated JSON files
//   segment  — split a text into sentences with a trained model
//
// Logs go to stderr; `segment` writes its JSON result to stdout.

pub mod commands;

use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, SegmentArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "legal-sbd",
    version,
    about = "Sentence boundary detection for legal text: train a model, then segment documents."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Segment(args) => run_segment(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    let config = crate::application::train_use_case::TrainConfig::from(args);
    tracing::info!(
        "Training on {} file(s); artifacts go to '{}'",
        config.train_files.len(),
        config.artifacts_dir.display()
    );

    let history = TrainUseCase::new(config).execute()?;
    if let Some(last) = history.last() {
        println!(
            "Training complete. Final validation F1 {:.3} (precision {:.3}, recall {:.3}).",
            last.val.f1(),
            last.val.precision(),
            last.val.recall()
        );
    }
    Ok(())
}

fn run_segment(args: SegmentArgs) -> Result<()> {
    use crate::application::segment_use_case::SegmentUseCase;

    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read input '{}'", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Cannot read text from stdin")?;
            buf
        }
    };

    let use_case     = SegmentUseCase::load(&args.artifacts_dir, args.threshold)?;
    let segmentation = use_case.segment(&text)?;
    tracing::info!("{} segments", segmentation.len());

    let json = if args.pretty {
        serde_json::to_string_pretty(&segmentation)?
    } else {
        serde_json::to_string(&segmentation)?
    };
    println!("{json}");
    Ok(())
}
