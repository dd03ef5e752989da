// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between raw annotated text and tensor batches,
// plus the inverse step from predicted ends back to text.
//
//   JSON annotation files
//       │
//       ▼
//   JsonCorpusLoader     → AnnotatedDocument (text + end set)
//       │
//       ▼
//   TextTokenizer        → padded TokenizedText
//       │
//       ▼
//   label_tokens         → one bool per token
//       │
//       ▼
//   CandidateSelector    → candidate token indices
//       │
//       ▼
//   WindowExtractor      → fixed-width id windows
//       │
//       ▼
//   WindowDataset        → Burn Dataset
//       │
//       ▼
//   WindowBatcher        → tensor batches for the DataLoader
//
// Inference reuses the tokenizer, selector and extractor, then
// `reconstruct_segments` maps predicted ends back to sentences.

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Training vs. inference candidate policies
pub mod candidates;

/// Implements Burn's Dataset trait for window samples
pub mod dataset;

/// Character end offsets → token labels
pub mod labeler;

/// Loads annotated JSON corpora
pub mod loader;

/// Predicted ends → sentence strings
pub mod reconstruct;

/// Shuffles and splits documents into train/validation sets
pub mod splitter;

/// Per-document training window generation
pub mod training_examples;

/// Window extraction and the shared windowing config
pub mod window;
