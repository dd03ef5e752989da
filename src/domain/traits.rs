// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The pipeline treats three collaborators as pluggable:
//
//   DocumentSource     → where annotated training texts come from
//   TextTokenizer      → text → ordered tokens with char spans
//   BoundaryClassifier → window of token ids → boundary probability
//
// Implementations:
//   - JsonCorpusLoader  (data/loader.rs)      : DocumentSource
//   - SubwordTokenizer  (infra/tokenizer.rs)  : TextTokenizer
//   - CnnClassifier     (ml/inferencer.rs)    : BoundaryClassifier

use anyhow::Result;

use crate::domain::document::AnnotatedDocument;
use crate::domain::token::TokenizedText;
use crate::domain::window::ContextWindow;

// ─── DocumentSource ───────────────────────────────────────────────────────────
/// Any component that can load annotated documents.
pub trait DocumentSource {
    fn load_all(&self) -> Result<Vec<AnnotatedDocument>>;
}

// ─── TextTokenizer ────────────────────────────────────────────────────────────
/// Tokenizer adapter contract.
///
/// `tokenize` returns tokens whose spans are monotonically
/// non-decreasing character ranges over `text`; the covered
/// characters include every non-whitespace character of `text`.
/// Empty `text` is an error: callers special-case it.
pub trait TextTokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<TokenizedText>;

    /// Id used for symmetric sentence-level padding.
    fn pad_id(&self) -> u32;

    fn vocab_size(&self) -> usize;
}

// ─── BoundaryClassifier ───────────────────────────────────────────────────────
/// Maps fixed-length windows to boundary probabilities.
///
/// Returns exactly one probability in `[0, 1]` per window, in the
/// same order. Implementations hold no per-request state.
pub trait BoundaryClassifier {
    fn classify(&self, windows: &[ContextWindow]) -> Result<Vec<f32>>;
}
