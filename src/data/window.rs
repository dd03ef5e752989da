// ============================================================
// Layer 4 — Context Window Extractor
// ============================================================
// For a candidate at token index i the window is
//
//   ids[max(0, i - c) .. min(n, i + c + 1)]
//
// with c = context_size. The sequence is always padded with c pad
// tokens on each side first, so every real candidate gets a full
// window of 2c + 1 ids and the batcher never sees ragged rows.
//
//   c = 2, candidate "." at padded index 4:
//   [PAD] [PAD] The fee [.] It is [PAD] [PAD]
//               └──── window ────┘

use serde::{Deserialize, Serialize};

use crate::domain::token::TokenizedText;
use crate::domain::window::ContextWindow;

/// Default punctuation tokens that may close a sentence.
pub const DEFAULT_TARGET_TOKENS: [&str; 10] = [".", "\"", "]", ")", ":", "\"", "'", "*", ">", ";"];

/// Token text that marks a physical line break.
pub const NEWLINE_MARKER: &str = "\n";

pub const DEFAULT_CONTEXT_SIZE: usize = 6;

/// Windowing settings shared by training and inference. Both
/// paths must use the same values or the classifier sees inputs
/// it was never trained on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowingConfig {
    pub context_size:   usize,
    pub target_tokens:  Vec<String>,
    pub newline_marker: String,
}

impl WindowingConfig {
    pub fn window_len(&self) -> usize {
        2 * self.context_size + 1
    }
}

impl Default for WindowingConfig {
    fn default() -> Self {
        Self {
            context_size:   DEFAULT_CONTEXT_SIZE,
            target_tokens:  DEFAULT_TARGET_TOKENS.iter().map(|t| t.to_string()).collect(),
            newline_marker: NEWLINE_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WindowExtractor {
    context_size: usize,
}

impl WindowExtractor {
    pub fn new(context_size: usize) -> Self {
        Self { context_size }
    }

    pub fn context_size(&self) -> usize {
        self.context_size
    }

    /// Extract one window per candidate, in candidate order.
    pub fn extract(&self, text: &TokenizedText, candidates: &[usize]) -> Vec<ContextWindow> {
        let ids = text.ids();
        candidates
            .iter()
            .map(|&i| {
                let start = i.saturating_sub(self.context_size);
                let end   = (i + self.context_size + 1).min(ids.len());
                ContextWindow {
                    ids:         ids[start..end].to_vec(),
                    center:      i - start,
                    token_index: i,
                }
            })
            .collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::{Span, Token};

    fn tokens(n: usize) -> TokenizedText {
        let toks = (0..n)
            .map(|i| Token::new(format!("w{i}"), 10 + i as u32, Span::new(2 * i, 2 * i + 1)))
            .collect();
        TokenizedText::new(toks, 2 * n)
    }

    #[test]
    fn test_padded_windows_have_full_width_at_both_edges() {
        let text = tokens(3).pad_both(6, 1);
        let first = 6;
        let last  = 8;
        let windows = WindowExtractor::new(6).extract(&text, &[first, last]);
        assert!(windows.iter().all(|w| w.width() == 13));
        assert!(windows.iter().all(|w| w.center == 6));
        assert_eq!(windows[0].center_id(), 10);
        assert_eq!(windows[1].center_id(), 12);
        assert_eq!(&windows[0].ids[..6], &[1; 6]);
        assert_eq!(&windows[1].ids[7..], &[1; 6]);
    }

    #[test]
    fn test_unpadded_windows_are_clipped() {
        let text = tokens(4);
        let windows = WindowExtractor::new(2).extract(&text, &[0, 3]);
        assert_eq!(windows[0].ids, vec![10, 11, 12]);
        assert_eq!(windows[0].center, 0);
        assert_eq!(windows[1].ids, vec![11, 12, 13]);
        assert_eq!(windows[1].center, 2);
    }

    #[test]
    fn test_windows_keep_candidate_order() {
        let text = tokens(10).pad_both(3, 1);
        let windows = WindowExtractor::new(3).extract(&text, &[5, 9, 12]);
        let centers: Vec<usize> = windows.iter().map(|w| w.token_index).collect();
        assert_eq!(centers, vec![5, 9, 12]);
    }

    #[test]
    fn test_default_config() {
        let cfg = WindowingConfig::default();
        assert_eq!(cfg.window_len(), 13);
        assert!(cfg.target_tokens.iter().any(|t| t == ";"));
    }
}
