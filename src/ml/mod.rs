// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn modelling and training code lives here. The data
// layer only builds tensors through the Batcher trait.
//
//   model.rs      — BoundaryCnn: embedding → conv1d → MLP → logit
//   trainer.rs    — epoch loop, Adam updates, per-epoch metrics
//   inferencer.rs — CnnClassifier, the BoundaryClassifier used
//                   at segmentation time
//
// Backend: NdArray on the CPU by default. Build with
// `--features wgpu` to train and infer on the GPU instead.
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

use burn::tensor::backend::AutodiffBackend;

/// Boundary CNN architecture
pub mod model;

/// Training loop with per-epoch evaluation
pub mod trainer;

/// Batched inference over context windows
pub mod inferencer;

#[cfg(not(feature = "wgpu"))]
pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

#[cfg(feature = "wgpu")]
pub type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// Same device, no gradient tracking.
pub type InferBackend = <TrainBackend as AutodiffBackend>::InnerBackend;

pub fn default_device() -> <TrainBackend as burn::tensor::backend::Backend>::Device {
    let device = Default::default();
    tracing::info!("Using device: {:?}", device);
    device
}
