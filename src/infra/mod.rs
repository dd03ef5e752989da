// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by several layers:
//
//   checkpoint.rs      — model weights + configs on disk
//   metrics.rs         — confusion-matrix metrics, CSV logging
//   tokenizer_store.rs — builds, saves and loads the vocabulary
//   tokenizer.rs       — TextTokenizer adapter over `tokenizers`
//
// Reference: Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Binary classification metrics and CSV logger
pub mod metrics;

/// TextTokenizer implementation over the tokenizers crate
pub mod tokenizer;

/// Tokenizer building, saving, and loading
pub mod tokenizer_store;
