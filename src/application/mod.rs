// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: no model math, no printing.
//
//   train_use_case.rs   — corpus → tokenizer → windows → trained model
//   segment_use_case.rs — text → sentence segments, from saved artifacts
//
// Reference: Clean Architecture pattern

/// The training workflow
pub mod train_use_case;

/// The segmentation workflow
pub mod segment_use_case;
