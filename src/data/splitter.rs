// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Used when no validation files are given: documents (not
// windows) are shuffled with a seeded RNG and split, so windows
// from one document never land on both sides.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `items` with `seed` and split into (train, validation).
/// `train_fraction` is clamped to `[0, 1]`.
pub fn split_train_val<T>(mut items: Vec<T>, train_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let total    = items.len();
    let fraction = train_fraction.clamp(0.0, 1.0);
    let split_at = ((total as f64) * fraction).round() as usize;
    let val      = items.split_off(split_at.min(total));

    tracing::debug!("Document split: {} train, {} validation", items.len(), val.len());

    (items, val)
}
