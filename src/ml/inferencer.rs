// ============================================================
// Layer 5 — CNN Boundary Classifier
// ============================================================
// BoundaryClassifier implementation over a trained BoundaryCnn.
// Windows are evaluated in fixed-size batches; results come back
// in input order so callers can map each probability to its
// candidate.

use anyhow::{bail, Result};
use burn::prelude::*;

use crate::domain::traits::BoundaryClassifier;
use crate::domain::window::ContextWindow;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{BoundaryCnn, BoundaryCnnConfig};

pub const DEFAULT_INFER_BATCH: usize = 1024;

pub struct CnnClassifier<B: Backend> {
    model:      BoundaryCnn<B>,
    window_len: usize,
    batch_size: usize,
    device:     B::Device,
}

impl<B: Backend> CnnClassifier<B> {
    /// `model` should already be in inference mode (no autodiff).
    pub fn new(model: BoundaryCnn<B>, config: &BoundaryCnnConfig, device: B::Device) -> Self {
        Self {
            model,
            window_len: config.window_len(),
            batch_size: DEFAULT_INFER_BATCH,
            device,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Rebuild the architecture from its saved config and load the
    /// final weights. Any failure here is fatal for the caller.
    pub fn from_checkpoint(ckpt: &CheckpointManager, device: B::Device) -> Result<Self> {
        let cfg = ckpt.load_model_config()?.with_dropout(0.0);
        let model: BoundaryCnn<B> = cfg.init(&device);
        let model = ckpt.load_model(model, &device)?;
        tracing::info!("Boundary model loaded (vocab={}, window={})", cfg.vocab_size, cfg.window_len());
        Ok(Self::new(model, &cfg, device))
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }
}

impl<B: Backend> BoundaryClassifier for CnnClassifier<B> {
    fn classify(&self, windows: &[ContextWindow]) -> Result<Vec<f32>> {
        let mut probabilities = Vec::with_capacity(windows.len());

        for chunk in windows.chunks(self.batch_size) {
            if let Some(bad) = chunk.iter().find(|w| w.width() != self.window_len) {
                bail!(
                    "Window at token {} has {} ids, model expects {}",
                    bad.token_index,
                    bad.width(),
                    self.window_len
                );
            }

            let flat: Vec<i32> = chunk
                .iter()
                .flat_map(|w| w.ids.iter().map(|&id| id as i32))
                .collect();
            let input = Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
                .reshape([chunk.len(), self.window_len]);

            let batch: Vec<f32> = self
                .model
                .probabilities(input)
                .into_data()
                .convert::<f32>()
                .to_vec()
                .map_err(|e| anyhow::anyhow!("Cannot read model output: {e:?}"))?;
            probabilities.extend(batch);
        }

        tracing::debug!("Classified {} windows", windows.len());
        Ok(probabilities)
    }
}
