// ============================================================
// Layer 5 — Boundary CNN
// ============================================================
// Small convolutional classifier over one context window:
//
//   ids        [batch, w]            w = 2c + 1
//   embedding  [batch, w, e]
//   swap       [batch, e, w]
//   conv1d     [batch, ch, w - k + 1]
//   flatten    [batch, ch * (w - k + 1)]
//   linear     [batch, hidden] → ReLU → dropout
//   linear     [batch, 1] → reshape [batch]   (logits)
//
// The model emits logits; `probabilities` applies the sigmoid.
// Training uses BCE on logits, which is the numerically stable
// form of sigmoid + BCE.

use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        loss::BinaryCrossEntropyLossConfig,
        Dropout, DropoutConfig, Embedding, EmbeddingConfig, Linear, LinearConfig, Relu,
    },
    prelude::*,
    tensor::activation::sigmoid,
};

#[derive(Config, Debug)]
pub struct BoundaryCnnConfig {
    pub vocab_size: usize,
    #[config(default = 6)]
    pub context_size: usize,
    #[config(default = 64)]
    pub embedding_size: usize,
    #[config(default = 5)]
    pub kernel_size: usize,
    #[config(default = 6)]
    pub conv_channels: usize,
    #[config(default = 128)]
    pub hidden_dim: usize,
    #[config(default = 0.2)]
    pub dropout: f64,
}

impl BoundaryCnnConfig {
    pub fn window_len(&self) -> usize {
        2 * self.context_size + 1
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> BoundaryCnn<B> {
        let conv_len = self.window_len().saturating_sub(self.kernel_size) + 1;
        BoundaryCnn {
            embedding:  EmbeddingConfig::new(self.vocab_size, self.embedding_size).init(device),
            conv:       Conv1dConfig::new(self.embedding_size, self.conv_channels, self.kernel_size).init(device),
            hidden:     LinearConfig::new(conv_len * self.conv_channels, self.hidden_dim).init(device),
            activation: Relu::new(),
            dropout:    DropoutConfig::new(self.dropout).init(),
            output:     LinearConfig::new(self.hidden_dim, 1).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct BoundaryCnn<B: Backend> {
    pub embedding:  Embedding<B>,
    pub conv:       Conv1d<B>,
    pub hidden:     Linear<B>,
    pub activation: Relu,
    pub dropout:    Dropout,
    pub output:     Linear<B>,
}

impl<B: Backend> BoundaryCnn<B> {
    /// windows: [batch, w] → logits: [batch]
    pub fn forward(&self, windows: Tensor<B, 2, Int>) -> Tensor<B, 1> {
        let [batch_size, _] = windows.dims();

        let x = self.embedding.forward(windows).swap_dims(1, 2);
        let x = self.conv.forward(x);
        let x: Tensor<B, 2> = x.flatten(1, 2);
        let x = self.dropout.forward(self.activation.forward(self.hidden.forward(x)));

        self.output.forward(x).reshape([batch_size])
    }

    /// Boundary probability per window.
    pub fn probabilities(&self, windows: Tensor<B, 2, Int>) -> Tensor<B, 1> {
        sigmoid(self.forward(windows))
    }

    /// Mean binary cross-entropy against 0/1 targets, plus logits.
    pub fn forward_loss(
        &self,
        windows: Tensor<B, 2, Int>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 1>) {
        let logits = self.forward(windows);
        let loss = BinaryCrossEntropyLossConfig::new()
            .with_logits(true)
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type B = NdArray;

    #[test]
    fn test_forward_shape_and_probability_range() {
        let device = Default::default();
        let model: BoundaryCnn<B> = BoundaryCnnConfig::new(30).init(&device);

        let ids: Vec<i32> = (0..3 * 13).map(|i| (i % 30) as i32).collect();
        let windows = Tensor::<B, 1, Int>::from_ints(ids.as_slice(), &device).reshape([3, 13]);

        assert_eq!(model.forward(windows.clone()).dims(), [3]);
        let probs: Vec<f32> = model.probabilities(windows).into_data().convert::<f32>().to_vec().unwrap();
        assert_eq!(probs.len(), 3);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_custom_context_size() {
        let device = Default::default();
        let cfg = BoundaryCnnConfig::new(10).with_context_size(3).with_kernel_size(3);
        assert_eq!(cfg.window_len(), 7);
        let model: BoundaryCnn<B> = cfg.init(&device);
        let windows = Tensor::<B, 2, Int>::zeros([2, 7], &device);
        assert_eq!(model.forward(windows).dims(), [2]);
    }

    #[test]
    fn test_loss_is_finite_scalar() {
        let device = Default::default();
        let model: BoundaryCnn<B> = BoundaryCnnConfig::new(10).init(&device);
        let windows = Tensor::<B, 2, Int>::zeros([4, 13], &device);
        let targets = Tensor::<B, 1, Int>::from_ints([1, 0, 0, 1].as_slice(), &device);
        let (loss, logits) = model.forward_loss(windows, targets);
        assert_eq!(logits.dims(), [4]);
        let loss: f32 = loss.into_scalar().elem();
        assert!(loss.is_finite() && loss > 0.0);
    }
}
