// ============================================================
// Layer 4 — Candidate Selector
// ============================================================
// Picks the token positions the classifier is asked about.
//
// A real (non-padding) token is a candidate when
//   1. its text is one of the target punctuation tokens, or
//   2. it ends a physical line: the next token is the newline
//      marker and the token itself is not one.
//
// Training additionally includes every positively labelled
// token, so no gold boundary is ever left out of the training
// set. Inference never sees labels. The two policies are kept as
// two separate methods rather than one function with a flag.

use std::collections::HashSet;

use crate::data::window::WindowingConfig;
use crate::domain::token::{Token, TokenizedText};

#[derive(Debug, Clone)]
pub struct CandidateSelector {
    targets: HashSet<String>,
    newline: String,
}

impl CandidateSelector {
    pub fn new(config: &WindowingConfig) -> Self {
        Self {
            targets: config.target_tokens.iter().cloned().collect(),
            newline: config.newline_marker.clone(),
        }
    }

    /// Heuristic candidates only.
    pub fn inference_candidates(&self, text: &TokenizedText) -> Vec<usize> {
        let tokens = text.tokens();
        (0..tokens.len())
            .filter(|&i| self.is_heuristic_candidate(tokens, i))
            .collect()
    }

    /// Heuristic candidates plus every positively labelled token.
    /// `labels` must be aligned with `text`.
    pub fn training_candidates(&self, text: &TokenizedText, labels: &[bool]) -> Vec<usize> {
        let tokens = text.tokens();
        (0..tokens.len())
            .filter(|&i| {
                let positive = labels.get(i).copied().unwrap_or(false) && !tokens[i].pad;
                positive || self.is_heuristic_candidate(tokens, i)
            })
            .collect()
    }

    fn is_heuristic_candidate(&self, tokens: &[Token], i: usize) -> bool {
        let token = &tokens[i];
        if token.pad {
            return false;
        }
        self.targets.contains(&token.text) || self.is_end_of_line(tokens, i)
    }

    fn is_end_of_line(&self, tokens: &[Token], i: usize) -> bool {
        match tokens.get(i + 1) {
            Some(next) => tokens[i].text != self.newline && !next.pad && next.text == self.newline,
            None => false,
        }
    }
}
