// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;
use crate::data::window::WindowingConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the boundary classifier on annotated JSON files
    Train(TrainArgs),

    /// Segment a text into sentences with a trained model
    Segment(SegmentArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Annotated JSON training files (repeatable)
    #[arg(long = "train", required = true, num_args = 1..)]
    pub train_files: Vec<PathBuf>,

    /// Annotated JSON validation files; when absent a share of the
    /// training documents is held out
    #[arg(long = "val", num_args = 1..)]
    pub val_files: Vec<PathBuf>,

    /// Where the model, tokenizer, configs and metrics are written
    #[arg(long, default_value = "artifacts")]
    pub artifacts_dir: PathBuf,

    /// Share of training documents held out when no --val is given
    #[arg(long, default_value_t = 0.2)]
    pub val_fraction: f64,

    /// Seed for the document split and batch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Batch size when scoring the train and validation sets
    #[arg(long, default_value_t = 1024)]
    pub eval_batch_size: usize,

    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Upper bound on tokenizer vocabulary entries
    #[arg(long, default_value_t = 300)]
    pub vocab_size: usize,

    /// Tokens of context on each side of a candidate
    #[arg(long, default_value_t = 6)]
    pub context_size: usize,

    #[arg(long, default_value_t = 64)]
    pub embedding_size: usize,

    #[arg(long, default_value_t = 5)]
    pub kernel_size: usize,

    #[arg(long, default_value_t = 6)]
    pub conv_channels: usize,

    #[arg(long, default_value_t = 128)]
    pub hidden_dim: usize,

    #[arg(long, default_value_t = 0.2)]
    pub dropout: f64,

    /// Decision threshold saved for segmentation
    #[arg(long, default_value_t = 0.5)]
    pub threshold: f32,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            train_files:     a.train_files,
            val_files:       a.val_files,
            artifacts_dir:   a.artifacts_dir,
            val_fraction:    a.val_fraction,
            seed:            a.seed,
            batch_size:      a.batch_size,
            eval_batch_size: a.eval_batch_size,
            epochs:          a.epochs,
            lr:              a.lr,
            vocab_size:      a.vocab_size,
            windowing:       WindowingConfig { context_size: a.context_size, ..WindowingConfig::default() },
            embedding_size:  a.embedding_size,
            kernel_size:     a.kernel_size,
            conv_channels:   a.conv_channels,
            hidden_dim:      a.hidden_dim,
            dropout:         a.dropout,
            threshold:       a.threshold,
        }
    }
}

#[derive(Args, Debug)]
pub struct SegmentArgs {
    /// Directory written by `train`
    #[arg(long, default_value = "artifacts")]
    pub artifacts_dir: PathBuf,

    /// Text file to segment; reads stdin when omitted
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Override the saved decision threshold
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_args_map_to_config() {
        let cli = Cli::try_parse_from([
            "legal-sbd", "train", "--train", "a.json", "b.json", "--epochs", "2", "--context-size", "4",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg = TrainConfig::from(args);
        assert_eq!(cfg.train_files.len(), 2);
        assert!(cfg.val_files.is_empty());
        assert_eq!(cfg.epochs, 2);
        assert_eq!(cfg.windowing.window_len(), 9);
        assert_eq!(cfg.batch_size, 32);
    }

    #[test]
    fn test_train_requires_files() {
        assert!(Cli::try_parse_from(["legal-sbd", "train"]).is_err());
    }

    #[test]
    fn test_segment_defaults() {
        let cli = Cli::try_parse_from(["legal-sbd", "segment"]).unwrap();
        let Commands::Segment(args) = cli.command else { panic!("expected segment") };
        assert_eq!(args.artifacts_dir, PathBuf::from("artifacts"));
        assert!(args.input.is_none());
        assert!(args.threshold.is_none());
    }
}
