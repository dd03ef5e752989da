// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain value types and traits shared by the training and
// inference paths.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - NO direct dependency on the tokenizers crate
//
// The tokenizer and the classifier are only seen through the
// two traits in `traits.rs`, so both can be swapped out.

// Annotated source documents (text + gold sentence ends)
pub mod document;

// Predictions and the final segmentation result
pub mod segmentation;

// Tokens, spans and tokenized (optionally padded) text
pub mod token;

// Core abstractions (traits) that other layers implement
pub mod traits;

// Fixed-width token-id windows fed to the classifier
pub mod window;
