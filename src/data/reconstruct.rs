// ============================================================
// Layer 4 — Segment Reconstructor
// ============================================================
// Turns predicted end offsets back into sentence strings.
//
//   segment 0   = text[0 .. ends[0]]
//   segment k>0 = text[ends[k-1] .. ends[k]].trim()
//
// Only whitespace between sentences is dropped, so joining the
// segments and re-inserting that whitespace gives back `text`.
//
// Edge cases:
//   - empty text                   → no segments, no ends
//   - no predicted end             → one segment, ends = [len]
//   - non-whitespace after the last
//     predicted end                → extra final segment ending at len
//
// Offsets are character offsets; ends outside [1, len] are ignored.

use crate::domain::segmentation::Segmentation;
use crate::domain::token::CharOffsets;

pub fn reconstruct_segments(text: &str, ends: &[usize]) -> Segmentation {
    if text.is_empty() {
        return Segmentation::default();
    }

    let offsets  = CharOffsets::new(text);
    let char_len = offsets.char_len();

    let mut ends: Vec<usize> = ends
        .iter()
        .copied()
        .filter(|&e| (1..=char_len).contains(&e))
        .collect();
    ends.sort_unstable();
    ends.dedup();

    let last = ends.last().copied().unwrap_or(0);
    let tail = offsets.slice(text, last, char_len);
    if ends.is_empty() || !tail.trim().is_empty() {
        ends.push(char_len);
    }

    let mut segments = Vec::with_capacity(ends.len());
    let mut previous = 0usize;
    for (k, &end) in ends.iter().enumerate() {
        let slice = offsets.slice(text, previous, end);
        segments.push(if k == 0 { slice.to_string() } else { slice.trim().to_string() });
        previous = end;
    }

    Segmentation { segments, ends }
}
