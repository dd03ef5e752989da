// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load annotated corpus         (Layer 4 - data)
//   Step 2: Pick validation documents     (Layer 4 - data)
//   Step 3: Build + save tokenizer        (Layer 6 - infra)
//   Step 4: Prepare training examples     (Layer 4 - data)
//   Step 5: Save configs                  (Layer 6 - infra)
//   Step 6: Run training loop             (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::application::segment_use_case::SegmenterConfig;
use crate::data::{
    dataset::WindowDataset,
    loader::JsonCorpusLoader,
    splitter::split_train_val,
    training_examples::{AlignmentReport, ExampleBuilder},
    window::WindowingConfig,
};
use crate::domain::document::AnnotatedDocument;
use crate::domain::traits::{DocumentSource, TextTokenizer};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
    tokenizer::SubwordTokenizer,
    tokenizer_store::TokenizerStore,
};
use crate::ml::{default_device, model::BoundaryCnnConfig, trainer::TrainingRun, TrainBackend};

// ─── Training Configuration ──────────────────────────────────────────────────
// Every setting of a training run. Saved next to the model so
// segmentation reuses the exact windowing and threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub train_files:     Vec<PathBuf>,
    /// When empty, `val_fraction` of the training documents is held out
    pub val_files:       Vec<PathBuf>,
    pub artifacts_dir:   PathBuf,
    pub val_fraction:    f64,
    pub seed:            u64,
    pub batch_size:      usize,
    pub eval_batch_size: usize,
    pub epochs:          usize,
    pub lr:              f64,
    pub vocab_size:      usize,
    pub windowing:       WindowingConfig,
    pub embedding_size:  usize,
    pub kernel_size:     usize,
    pub conv_channels:   usize,
    pub hidden_dim:      usize,
    pub dropout:         f64,
    pub threshold:       f32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_files:     Vec::new(),
            val_files:       Vec::new(),
            artifacts_dir:   PathBuf::from("artifacts"),
            val_fraction:    0.2,
            seed:            42,
            batch_size:      32,
            eval_batch_size: 1024,
            epochs:          5,
            lr:              1e-3,
            vocab_size:      300,
            windowing:       WindowingConfig::default(),
            embedding_size:  64,
            kernel_size:     5,
            conv_channels:   6,
            hidden_dim:      128,
            dropout:         0.2,
            threshold:       0.5,
        }
    }
}

impl TrainConfig {
    /// Architecture for a tokenizer with `vocab_size` entries.
    pub fn model_config(&self, vocab_size: usize) -> BoundaryCnnConfig {
        BoundaryCnnConfig::new(vocab_size)
            .with_context_size(self.windowing.context_size)
            .with_embedding_size(self.embedding_size)
            .with_kernel_size(self.kernel_size)
            .with_conv_channels(self.conv_channels)
            .with_hidden_dim(self.hidden_dim)
            .with_dropout(self.dropout)
    }

    pub fn segmenter_config(&self) -> SegmenterConfig {
        SegmenterConfig {
            windowing: self.windowing.clone(),
            threshold: self.threshold,
        }
    }

    /// Pieces that must get their own vocabulary entry.
    pub fn reserved_tokens(&self) -> Vec<String> {
        let mut reserved = self.windowing.target_tokens.clone();
        reserved.push(self.windowing.newline_marker.clone());
        reserved
    }

    fn validate(&self) -> Result<()> {
        if self.train_files.is_empty() {
            bail!("No training files given");
        }
        if self.windowing.window_len() < self.kernel_size {
            bail!(
                "Kernel size {} is wider than the {}-token window",
                self.kernel_size,
                self.windowing.window_len()
            );
        }
        if self.val_files.is_empty() && !(0.0..1.0).contains(&self.val_fraction) {
            bail!("Validation fraction must be in [0, 1), got {}", self.val_fraction);
        }
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline end to end. Returns the per-epoch metrics.
    pub fn execute(&self) -> Result<Vec<EpochMetrics>> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load the annotated corpus ────────────────────────────────
        let docs = JsonCorpusLoader::new(cfg.train_files.iter().cloned()).load_all()?;
        if docs.is_empty() {
            bail!("Training files contain no documents");
        }

        // ── Step 2: Validation documents ─────────────────────────────────────
        // Split by document so a document's windows stay on one side.
        let (train_docs, val_docs) = if cfg.val_files.is_empty() {
            split_train_val(docs, 1.0 - cfg.val_fraction, cfg.seed)
        } else {
            (docs, JsonCorpusLoader::new(cfg.val_files.iter().cloned()).load_all()?)
        };
        tracing::info!("Documents: {} train, {} validation", train_docs.len(), val_docs.len());

        // ── Step 3: Tokenizer from the training texts only ───────────────────
        let store     = TokenizerStore::new(&cfg.artifacts_dir);
        let tokenizer = SubwordTokenizer::new(store.build_and_save(
            train_docs.iter().map(|d| d.text.as_str()),
            cfg.vocab_size,
            &cfg.reserved_tokens(),
        )?)?;

        // ── Step 4: Candidate windows + labels ───────────────────────────────
        let builder       = ExampleBuilder::new(&tokenizer, &cfg.windowing);
        let train_dataset = build_dataset(&builder, &train_docs, "train")?;
        let val_dataset   = build_dataset(&builder, &val_docs, "validation")?;

        // ── Step 5: Configs for segmentation ─────────────────────────────────
        let ckpt      = CheckpointManager::new(&cfg.artifacts_dir)?;
        let model_cfg = cfg.model_config(tokenizer.vocab_size());
        ckpt.save_config(cfg)?;
        ckpt.save_model_config(&model_cfg)?;

        // ── Step 6: Train ────────────────────────────────────────────────────
        let logger = MetricsLogger::new(&cfg.artifacts_dir)?;
        let run = TrainingRun {
            config:     cfg,
            model:      &model_cfg,
            checkpoint: &ckpt,
            logger:     &logger,
        };
        run.run::<TrainBackend>(train_dataset, val_dataset, &default_device())
    }
}

fn build_dataset<T: TextTokenizer>(
    builder: &ExampleBuilder<'_, T>,
    docs:    &[AnnotatedDocument],
    split:   &str,
) -> Result<WindowDataset> {
    let mut dataset = WindowDataset::default();
    let mut total   = AlignmentReport::default();

    for doc in docs {
        let examples = match builder.prepare_training_examples(&doc.text, doc.ends()) {
            Ok(examples) => examples,
            Err(e) => {
                tracing::warn!("{}: skipped, {e:#}", doc.source);
                total += AlignmentReport::failed(doc.ends().len());
                continue;
            }
        };
        let report = examples.report;
        if report.empty_documents > 0 {
            tracing::warn!("{}: empty text, skipped", doc.source);
        } else if report.dropped() > 0 {
            tracing::warn!(
                "{} ({} chars): dropped {} of {} sentence ends ({} out of range, {} not on a token)",
                doc.source,
                doc.char_len(),
                report.dropped(),
                report.annotated_ends,
                report.out_of_range_ends,
                report.unmatched_ends,
            );
        }
        total += report;
        dataset.extend(examples);
    }

    tracing::info!(
        "{split}: {} windows ({} positive) from {} documents ({} failed); {} of {} ends matched",
        dataset.sample_count(),
        dataset.positive_count(),
        total.documents,
        total.failed_documents,
        total.matched_ends,
        total.annotated_ends,
    );
    Ok(dataset)
}
