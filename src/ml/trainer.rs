// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Train + evaluate loop using Burn's DataLoader and Adam.
//
//   - Training runs on the autodiff backend B.
//   - model.valid() returns the model on B::InnerBackend, with
//     dropout off; both evaluation loaders use that backend.
//   - After every epoch the train and validation sets are scored
//     with a confusion matrix at the configured threshold.
//   - Only the final-epoch weights are written.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{WindowBatch, WindowBatcher},
    dataset::WindowDataset,
};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{ConfusionMatrix, EpochMetrics, MetricsLogger},
};
use crate::ml::model::{BoundaryCnn, BoundaryCnnConfig};

pub struct TrainingRun<'a> {
    pub config:     &'a TrainConfig,
    pub model:      &'a BoundaryCnnConfig,
    pub checkpoint: &'a CheckpointManager,
    pub logger:     &'a MetricsLogger,
}

impl TrainingRun<'_> {
    /// Train for `config.epochs`, then save the final model.
    /// Returns one metrics row per epoch.
    pub fn run<B: AutodiffBackend>(
        &self,
        train_dataset: WindowDataset,
        val_dataset:   WindowDataset,
        device:        &B::Device,
    ) -> Result<Vec<EpochMetrics>> {
        let cfg = self.config;
        if train_dataset.sample_count() == 0 {
            bail!("No training windows. Check the corpus and its annotations.");
        }
        if val_dataset.sample_count() == 0 {
            tracing::warn!("Validation set is empty; validation metrics will be zero");
        }

        let mut model: BoundaryCnn<B> = self.model.init(device);
        tracing::info!(
            "Model ready: vocab={}, window={}, conv_channels={}, hidden={}",
            self.model.vocab_size,
            self.model.window_len(),
            self.model.conv_channels,
            self.model.hidden_dim,
        );

        let mut optim = AdamConfig::new().init::<B, BoundaryCnn<B>>();

        // ── Loaders ───────────────────────────────────────────────────────────
        let train_loader = DataLoaderBuilder::new(WindowBatcher::<B>::new(device.clone()))
            .batch_size(cfg.batch_size.max(1))
            .shuffle(cfg.seed)
            .num_workers(1)
            .build(train_dataset.clone());

        let train_eval_loader =
            DataLoaderBuilder::new(WindowBatcher::<B::InnerBackend>::new(device.clone()))
                .batch_size(cfg.eval_batch_size.max(1))
                .num_workers(1)
                .build(train_dataset);

        let val_loader =
            DataLoaderBuilder::new(WindowBatcher::<B::InnerBackend>::new(device.clone()))
                .batch_size(cfg.eval_batch_size.max(1))
                .num_workers(1)
                .build(val_dataset);

        // ── Epoch loop ────────────────────────────────────────────────────────
        let mut history = Vec::with_capacity(cfg.epochs);

        for epoch in 1..=cfg.epochs {
            let mut loss_sum = 0.0f64;
            let mut batches  = 0usize;

            for batch in train_loader.iter() {
                let (loss, _) = model.forward_loss(batch.windows, batch.targets);

                loss_sum += loss.clone().into_scalar().elem::<f64>();
                batches  += 1;

                let grads = GradientsParams::from_grads(loss.backward(), &model);
                model = optim.step(cfg.lr, model, grads);
            }

            let train_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };

            let model_valid = model.valid();
            let metrics = EpochMetrics {
                epoch,
                train_loss,
                train: evaluate(&model_valid, train_eval_loader.iter(), cfg.threshold)?,
                val:   evaluate(&model_valid, val_loader.iter(), cfg.threshold)?,
            };

            tracing::info!(
                "Epoch {:>3}/{} | loss={:.4} | train acc={:.3} f1={:.3} | val acc={:.3} p={:.3} r={:.3} f1={:.3}",
                epoch,
                cfg.epochs,
                metrics.train_loss,
                metrics.train.accuracy(),
                metrics.train.f1(),
                metrics.val.accuracy(),
                metrics.val.precision(),
                metrics.val.recall(),
                metrics.val.f1(),
            );
            tracing::debug!(
                "Confusion [[TN, FP], [FN, TP]]: train {:?}, val {:?}",
                metrics.train.as_matrix(),
                metrics.val.as_matrix(),
            );

            self.logger.log(&metrics)?;
            history.push(metrics);
        }

        self.checkpoint.save_model(&model)?;
        tracing::info!("Training complete; model saved to '{}'", self.checkpoint.dir().display());
        Ok(history)
    }
}

/// Score every batch with dropout off and accumulate a confusion matrix.
fn evaluate<B: Backend>(
    model:     &BoundaryCnn<B>,
    batches:   impl Iterator<Item = WindowBatch<B>>,
    threshold: f32,
) -> Result<ConfusionMatrix> {
    let mut cm = ConfusionMatrix::default();
    for batch in batches {
        let probs: Vec<f32> = model
            .probabilities(batch.windows)
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|e| anyhow::anyhow!("Cannot read model output: {e:?}"))?;
        cm.record_batch(&probs, &batch.labels, threshold);
    }
    Ok(cm)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use burn::data::{dataloader::batcher::Batcher, dataset::Dataset};
    use crate::data::dataset::WindowSample;

    type B = Autodiff<NdArray>;

    fn dataset(n: usize) -> WindowDataset {
        // Center id 3 marks a boundary; everything else does not.
        WindowDataset::new(
            (0..n)
                .map(|i| {
                    let label = i % 3 == 0;
                    let mut ids = vec![(i % 7) as u32 + 4; 13];
                    ids[6] = if label { 3 } else { 2 };
                    WindowSample { ids, label }
                })
                .collect(),
        )
    }

    #[test]
    fn test_two_epochs_log_metrics_and_save_model() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path()).unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        let config = TrainConfig { epochs: 2, batch_size: 8, ..TrainConfig::default() };
        let model  = BoundaryCnnConfig::new(12);

        let run = TrainingRun { config: &config, model: &model, checkpoint: &ckpt, logger: &logger };
        let history = run.run::<B>(dataset(30), dataset(9), &Default::default()).unwrap();

        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|m| m.train_loss.is_finite()));
        assert_eq!(history[1].train.total(), 30);
        assert_eq!(history[1].val.total(), 9);

        let device = Default::default();
        let fresh: BoundaryCnn<NdArray> = model.init(&device);
        assert!(ckpt.load_model(fresh, &device).is_ok());

        let csv = std::fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_empty_training_set_is_rejected() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path()).unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        let config = TrainConfig::default();
        let model  = BoundaryCnnConfig::new(12);

        let run = TrainingRun { config: &config, model: &model, checkpoint: &ckpt, logger: &logger };
        assert!(run.run::<B>(WindowDataset::default(), dataset(3), &Default::default()).is_err());
    }

    #[test]
    fn test_evaluate_counts_every_sample() {
        let device = Default::default();
        let model: BoundaryCnn<NdArray> = BoundaryCnnConfig::new(12).init(&device);
        let batcher = WindowBatcher::<NdArray>::new(device);
        let ds = dataset(5);
        let samples: Vec<WindowSample> = (0..5).filter_map(|i| ds.get(i)).collect();
        let batch = batcher.batch(samples);
        let cm = evaluate(&model, std::iter::once(batch), 0.5).unwrap();
        assert_eq!(cm.total(), 5);
    }
}
