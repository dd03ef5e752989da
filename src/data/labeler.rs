// ============================================================
// Layer 4 — Boundary Labeler
// ============================================================
// Aligns character-level gold sentence ends to tokens.
//
// A token with span [left, right) is positive when the last
// character of a sentence (`end - 1`) falls inside it. Tokens and
// ends are both sorted, so a single left-to-right merge is enough:
//
//   tokens:  [The 0..3] [fee 4..7] [. 7..8] [It 9..11] [. 11..12]
//   ends:    {8, 12}
//   labels:   F          F          T        F          T
//
// An end that no token contains (it lands on stripped whitespace,
// or two ends fall inside the same token) is dropped and counted.
// Dropping an end never blocks the ends after it. This departs
// from a plain two-pointer merge, where the pointer stays on an
// unmatched end and silently drops every later end as well. Keep
// it this way.

use crate::domain::token::Span;

/// Output of `label_tokens`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labeling {
    /// One label per token, same order as the token sequence
    pub labels: Vec<bool>,

    /// Token indices that were marked positive, ascending
    pub positives: Vec<usize>,

    /// Ends that could not be matched to any token span
    pub unmatched_ends: usize,
}

impl Labeling {
    pub fn matched(&self) -> usize {
        self.positives.len()
    }
}

/// Label each token span against sorted, deduplicated `ends`.
pub fn label_tokens(spans: &[Span], ends: &[usize]) -> Labeling {
    let mut labels    = Vec::with_capacity(spans.len());
    let mut positives = Vec::new();
    let mut unmatched = 0usize;
    let mut pointer   = 0usize;

    for (index, span) in spans.iter().enumerate() {
        // Ends whose last character lies before this token can no
        // longer be matched by it or any later token.
        if !span.is_empty() {
            while pointer < ends.len() && last_char(ends[pointer]).map_or(true, |c| c < span.start) {
                unmatched += 1;
                pointer   += 1;
            }
        }

        let hit = pointer < ends.len()
            && last_char(ends[pointer]).is_some_and(|c| span.contains(c));

        if hit {
            positives.push(index);
            pointer += 1;
        }
        labels.push(hit);
    }

    unmatched += ends.len() - pointer;

    Labeling { labels, positives, unmatched_ends: unmatched }
}

fn last_char(end: usize) -> Option<usize> {
    end.checked_sub(1)
}
