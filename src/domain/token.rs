// ============================================================
// Layer 3 — Token Domain Types
// ============================================================
// A tokenized text is the bridge between character-level
// annotations and token-level classifier input.
//
// All offsets in this crate are CHARACTER offsets (Unicode
// scalar values), never byte offsets. `CharOffsets` converts
// between the two when we need to slice a Rust `str`.
//
// Example:
//   text   = "Hi there."
//   tokens = ["Hi" 0..2] ["there" 3..8] ["." 8..9]
//   padded with 2 pads on each side:
//            [PAD 0..0] [PAD 0..0] Hi there . [PAD 9..9] [PAD 9..9]

use serde::{Deserialize, Serialize};

/// Half-open character range `[start, end)` in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end:   usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// True if the character at `offset` lies inside this span.
    /// Empty spans (padding sentinels) contain nothing.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// One token of a tokenized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text covered by `span` (pads carry the pad token text)
    pub text: String,
    pub id:   u32,
    pub span: Span,
    /// Padding tokens are never candidates and never labelled positive
    pub pad:  bool,
}

impl Token {
    pub fn new(text: impl Into<String>, id: u32, span: Span) -> Self {
        Self { text: text.into(), id, span, pad: false }
    }

    fn padding(id: u32, at: usize) -> Self {
        Self {
            text: PAD_TOKEN.to_string(),
            id,
            span: Span::new(at, at),
            pad: true,
        }
    }
}

/// Surface text of padding tokens.
pub const PAD_TOKEN: &str = "[PAD]";

/// Which end of the sequence to pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadSide {
    Left,
    Right,
}

/// An immutable, ordered token sequence over one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedText {
    tokens:    Vec<Token>,
    /// Length of the source text in characters
    char_len:  usize,
    left_pad:  usize,
    right_pad: usize,
}

impl TokenizedText {
    /// Wrap tokens produced by a tokenizer. Spans must be ordered
    /// ascending; the tokenizer adapter checks this before calling.
    pub fn new(tokens: Vec<Token>, char_len: usize) -> Self {
        Self { tokens, char_len, left_pad: 0, right_pad: 0 }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub fn left_pad(&self) -> usize {
        self.left_pad
    }

    pub fn ids(&self) -> Vec<u32> {
        self.tokens.iter().map(|t| t.id).collect()
    }

    pub fn spans(&self) -> Vec<Span> {
        self.tokens.iter().map(|t| t.span).collect()
    }

    /// Number of real (non-padding) tokens.
    pub fn real_len(&self) -> usize {
        self.tokens.len() - self.left_pad - self.right_pad
    }

    /// Insert `n` pad tokens on one side. Left pads get the span
    /// `(0, 0)`, right pads `(len, len)`; neither can contain a
    /// real end offset.
    pub fn pad(mut self, n: usize, side: PadSide, pad_id: u32) -> Self {
        match side {
            PadSide::Left => {
                let mut padded: Vec<Token> = (0..n).map(|_| Token::padding(pad_id, 0)).collect();
                padded.append(&mut self.tokens);
                self.tokens = padded;
                self.left_pad += n;
            }
            PadSide::Right => {
                let at = self.char_len;
                self.tokens.extend((0..n).map(|_| Token::padding(pad_id, at)));
                self.right_pad += n;
            }
        }
        self
    }

    /// Symmetric padding: `n` pads on each side.
    pub fn pad_both(self, n: usize, pad_id: u32) -> Self {
        self.pad(n, PadSide::Left, pad_id).pad(n, PadSide::Right, pad_id)
    }
}

/// Maps character offsets to byte offsets for one `str`.
#[derive(Debug, Clone)]
pub struct CharOffsets {
    /// `bytes[i]` is the byte offset of char `i`; one extra entry
    /// holds `text.len()` so `char_len` maps to the end.
    bytes: Vec<usize>,
}

impl CharOffsets {
    pub fn new(text: &str) -> Self {
        let mut bytes: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        bytes.push(text.len());
        Self { bytes }
    }

    pub fn char_len(&self) -> usize {
        self.bytes.len() - 1
    }

    /// Slice `text` by character range. Out-of-range ends are clamped.
    pub fn slice<'t>(&self, text: &'t str, start: usize, end: usize) -> &'t str {
        let len = self.char_len();
        let end = end.min(len);
        let start = start.min(end);
        &text[self.bytes[start]..self.bytes[end]]
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TokenizedText {
        TokenizedText::new(
            vec![
                Token::new("Hi", 5, Span::new(0, 2)),
                Token::new("there", 6, Span::new(3, 8)),
                Token::new(".", 7, Span::new(8, 9)),
            ],
            9,
        )
    }

    #[test]
    fn test_span_contains_is_half_open() {
        let s = Span::new(3, 8);
        assert!(s.contains(3));
        assert!(s.contains(7));
        assert!(!s.contains(8));
        assert!(!Span::new(4, 4).contains(4));
    }

    #[test]
    fn test_pad_both_sides() {
        let padded = sample().pad_both(2, 1);
        assert_eq!(padded.len(), 7);
        assert_eq!(padded.real_len(), 3);
        assert_eq!(padded.left_pad(), 2);
        assert_eq!(padded.ids(), vec![1, 1, 5, 6, 7, 1, 1]);
        assert_eq!(padded.tokens()[0].span, Span::new(0, 0));
        assert_eq!(padded.tokens()[6].span, Span::new(9, 9));
        assert!(padded.tokens()[6].pad);
        assert!(!padded.tokens()[2].pad);
    }

    #[test]
    fn test_char_offsets_handle_multibyte() {
        let text = "§ 12. Fine.";
        let offsets = CharOffsets::new(text);
        assert_eq!(offsets.char_len(), 11);
        assert_eq!(offsets.slice(text, 0, 5), "§ 12.");
        assert_eq!(offsets.slice(text, 6, 11), "Fine.");
        assert_eq!(offsets.slice(text, 6, 99), "Fine.");
    }
}
