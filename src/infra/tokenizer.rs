// ============================================================
// Layer 6 — Tokenizer Adapter
// ============================================================
// Wraps a `tokenizers::Tokenizer` behind the TextTokenizer trait
// and turns its encodings into immutable `TokenizedText` values.
//
// Encoding uses character offsets (`encode_char_offsets`) so
// spans line up with annotation ends. Token text is the surface
// text under the span, not the vocabulary entry, so unknown
// words keep their real text and punctuation checks still work.

use anyhow::{bail, Result};
use tokenizers::Tokenizer;

use crate::domain::token::{CharOffsets, Span, Token, TokenizedText, PAD_TOKEN};
use crate::domain::traits::TextTokenizer;

pub struct SubwordTokenizer {
    inner:  Tokenizer,
    pad_id: u32,
}

impl SubwordTokenizer {
    /// Fails if the vocabulary has no pad token.
    pub fn new(inner: Tokenizer) -> Result<Self> {
        let Some(pad_id) = inner.token_to_id(PAD_TOKEN) else {
            bail!("Tokenizer vocabulary has no {PAD_TOKEN} token");
        };
        Ok(Self { inner, pad_id })
    }

    pub fn inner(&self) -> &Tokenizer {
        &self.inner
    }
}

impl TextTokenizer for SubwordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenizedText> {
        if text.is_empty() {
            bail!("Cannot tokenize empty text");
        }

        let encoding = self
            .inner
            .encode_char_offsets(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;

        let chars = CharOffsets::new(text);
        let mut tokens = Vec::with_capacity(encoding.len());
        let mut last_start = 0usize;

        for (&id, &(start, end)) in encoding.get_ids().iter().zip(encoding.get_offsets()) {
            if start < last_start || end < start || end > chars.char_len() {
                bail!("Tokenizer produced an out-of-order span {start}..{end}");
            }
            last_start = start;
            tokens.push(Token::new(chars.slice(text, start, end), id, Span::new(start, end)));
        }

        Ok(TokenizedText::new(tokens, chars.char_len()))
    }

    fn pad_id(&self) -> u32 {
        self.pad_id
    }

    fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }
}
