// ============================================================
// Layer 3 — Predictions and Segmentation Result
// ============================================================

use serde::{Deserialize, Serialize};

/// Classifier output for one boundary candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Index of the candidate in the unpadded token sequence
    pub token_index: usize,
    /// Exclusive character offset where the candidate token ends
    pub char_end:    usize,
    pub probability: f32,
}

/// Result of `segment`: `ends[k]` is the exclusive character
/// offset that closes `segments[k]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    pub segments: Vec<String>,
    pub ends:     Vec<usize>,
}

impl Segmentation {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
