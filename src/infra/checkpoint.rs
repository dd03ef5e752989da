// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Persists everything inference needs to rebuild the pipeline:
//
//   artifacts/
//     model.mpk.gz        ← final-epoch weights (CompactRecorder)
//     model_config.json   ← BoundaryCnnConfig (architecture)
//     train_config.json   ← TrainConfig (windowing, threshold, ...)
//     tokenizer.json      ← written by TokenizerStore
//
// Only the final-epoch model is kept; there is no selection by
// validation metric.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{prelude::*, record::CompactRecorder};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::{BoundaryCnn, BoundaryCnnConfig};

const MODEL_FILE:        &str = "model";
const MODEL_CONFIG_FILE: &str = "model_config.json";
const TRAIN_CONFIG_FILE: &str = "train_config.json";

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create artifacts directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Open an existing artifacts directory without creating it.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            anyhow::bail!("Artifacts directory '{}' does not exist. Run 'train' first.", dir.display());
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save model weights (the recorder adds `.mpk.gz`).
    pub fn save_model<B: Backend>(&self, model: &BoundaryCnn<B>) -> Result<()> {
        let path = self.dir.join(MODEL_FILE);
        model
            .clone()
            .save_file(path.clone(), &CompactRecorder::new())
            .with_context(|| format!("Failed to save model to '{}'", path.display()))?;
        tracing::debug!("Saved model weights to '{}'", path.display());
        Ok(())
    }

    /// Load weights into a freshly initialised model of the same
    /// architecture.
    pub fn load_model<B: Backend>(&self, model: BoundaryCnn<B>, device: &B::Device) -> Result<BoundaryCnn<B>> {
        let path = self.dir.join(MODEL_FILE);
        model
            .load_file(path.clone(), &CompactRecorder::new(), device)
            .with_context(|| {
                format!("Cannot load model '{}'. Have you trained the model first?", path.display())
            })
    }

    pub fn save_model_config(&self, cfg: &BoundaryCnnConfig) -> Result<()> {
        let path = self.dir.join(MODEL_CONFIG_FILE);
        cfg.save(&path)
            .with_context(|| format!("Cannot write model config to '{}'", path.display()))
    }

    pub fn load_model_config(&self) -> Result<BoundaryCnnConfig> {
        let path = self.dir.join(MODEL_CONFIG_FILE);
        BoundaryCnnConfig::load(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read model config '{}': {e:?}", path.display()))
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(TRAIN_CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(TRAIN_CONFIG_FILE);
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read config from '{}'. Make sure you have run 'train'.", path.display())
        })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config '{}'", path.display()))
    }
}
