// ============================================================
// Layer 4 — Window Batcher
// ============================================================
// Implements Burn's Batcher trait to stack WindowSamples into
// tensors:
//
//   Input:  Vec of N WindowSamples, each 2c+1 ids long
//   Output: WindowBatch { windows: [N, 2c+1], targets: [N] }
//
// Windows are padded upstream, so every row has the same width.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::WindowSample;

#[derive(Debug, Clone)]
pub struct WindowBatch<B: Backend> {
    /// Token ids — shape: [batch_size, window_len]
    pub windows: Tensor<B, 2, Int>,

    /// 1 = sentence end, 0 = not — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,

    /// Same labels kept on the host for metric computation
    pub labels: Vec<bool>,
}

#[derive(Clone, Debug)]
pub struct WindowBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> WindowBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<WindowSample, WindowBatch<B>> for WindowBatcher<B> {
    fn batch(&self, items: Vec<WindowSample>) -> WindowBatch<B> {
        let batch_size = items.len();
        let width      = items.first().map_or(0, |s| s.ids.len());
        debug_assert!(items.iter().all(|s| s.ids.len() == width), "ragged window batch");

        let flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.ids.iter().map(|&id| id as i32))
            .collect();
        let labels: Vec<bool> = items.iter().map(|s| s.label).collect();
        let targets: Vec<i32> = labels.iter().map(|&l| l as i32).collect();

        let windows = Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, width]);
        let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), &self.device);

        WindowBatch { windows, targets, labels }
    }
}
