// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Builds, saves and loads the tokenizer.
//
// Pre-tokenization (shared by vocabulary building and encoding):
//   1. "\n" is split off as its own piece
//   2. keep runs of `\w+` or `[^\w\t ]+`, drop tabs and spaces
//   3. punctuation characters are isolated
//
// The model is BPE, trained with `BpeTrainer` on the training
// texts. Unseen words fall back to known subword pieces instead
// of a single [UNK].
//
//   [UNK] = 0, [PAD] = 1, then the character alphabet (which
//   always holds the target punctuation and the newline), then
//   merges up to `vocab_size`.
//
// [UNK] and [PAD] live in the model vocabulary only, not in the
// added-token table, so a literal "[PAD]" in a document is
// tokenized like any other text and never gets the pad id.
//
// Reference: HuggingFace tokenizers JSON format

use std::{collections::HashSet, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use tokenizers::{
    models::{
        bpe::{BpeTrainerBuilder, BPE},
        TrainerWrapper,
    },
    pre_tokenizers::{
        punctuation::Punctuation,
        sequence::Sequence,
        split::{Split, SplitPattern},
        PreTokenizerWrapper,
    },
    AddedToken, SplitDelimiterBehavior, Tokenizer,
};

use crate::domain::token::PAD_TOKEN;

pub const UNK_TOKEN: &str = "[UNK]";

const TOKENIZER_FILE: &str = "tokenizer.json";

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    /// Load a previously saved tokenizer. Failure is fatal for
    /// the caller: there is no fallback vocabulary.
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.path();
        Tokenizer::from_file(&path).map_err(|e| {
            anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e)
        })
    }

    /// Build a fresh vocabulary from `texts` and write it to disk.
    pub fn build_and_save<'t>(
        &self,
        texts:      impl IntoIterator<Item = &'t str>,
        vocab_size: usize,
        reserved:   &[String],
    ) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let tokenizer = build_tokenizer(texts, vocab_size, reserved)?;
        let path = self.path();
        tokenizer
            .save(&path, true)
            .map_err(|e| anyhow::anyhow!("Cannot write tokenizer to '{}': {}", path.display(), e))?;

        tracing::info!(
            "Tokenizer built with {} entries, saved to '{}'",
            tokenizer.get_vocab_size(true),
            path.display()
        );
        Ok(tokenizer)
    }
}

/// The pre-tokenizer pipeline described at the top of this file.
pub fn legal_pre_tokenizer() -> Result<PreTokenizerWrapper> {
    let newline = Split::new(SplitPattern::String("\n".into()), SplitDelimiterBehavior::Isolated, false)
        .map_err(|e| anyhow::anyhow!("Invalid newline split: {e}"))?;
    let words = Split::new(
        SplitPattern::Regex(r"\w+|[^\w\t ]+".into()),
        SplitDelimiterBehavior::Removed,
        true,
    )
    .map_err(|e| anyhow::anyhow!("Invalid word split: {e}"))?;

    Ok(PreTokenizerWrapper::Sequence(Sequence::new(vec![
        newline.into(),
        words.into(),
        Punctuation::default().into(),
    ])))
}

/// Train an in-memory BPE tokenizer on `texts`. The vocabulary
/// holds at most `vocab_size` entries unless the special tokens
/// and the character alphabet alone exceed it. Every character of
/// `reserved` is part of the alphabet.
pub fn build_tokenizer<'t>(
    texts:      impl IntoIterator<Item = &'t str>,
    vocab_size: usize,
    reserved:   &[String],
) -> Result<Tokenizer> {
    let model = BPE::builder()
        .unk_token(UNK_TOKEN.to_string())
        .build()
        .map_err(|e| anyhow::anyhow!("Cannot build BPE model: {e}"))?;

    let mut tokenizer = Tokenizer::new(model);
    tokenizer.with_pre_tokenizer(Some(legal_pre_tokenizer()?));

    let alphabet: HashSet<char> = reserved.iter().flat_map(|r| r.chars()).collect();
    let mut trainer: TrainerWrapper = BpeTrainerBuilder::new()
        .vocab_size(vocab_size)
        .min_frequency(0)
        .show_progress(false)
        .special_tokens(vec![
            AddedToken::from(UNK_TOKEN, true),
            AddedToken::from(PAD_TOKEN, true),
        ])
        .initial_alphabet(alphabet)
        .build()
        .into();

    let texts: Vec<&str> = texts.into_iter().collect();
    tokenizer
        .train(&mut trainer, texts.iter())
        .map_err(|e| anyhow::anyhow!("Tokenizer training failed: {e}"))?;

    // Training registers the specials as added tokens, which would
    // match them verbatim inside documents. Keep them in the model
    // vocabulary only.
    let json = (*tokenizer)
        .to_string(false)
        .map_err(|e| anyhow::anyhow!("Cannot serialise tokenizer: {e}"))?;
    let mut value: serde_json::Value = serde_json::from_str(&json)?;
    value["added_tokens"] = serde_json::json!([]);

    Tokenizer::from_str(&value.to_string())
        .map_err(|e| anyhow::anyhow!("Cannot assemble tokenizer: {e}"))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn reserved() -> Vec<String> {
        vec![".".to_string(), ";".to_string(), "\n".to_string()]
    }

    #[test]
    fn test_special_and_reserved_ids() {
        let tok = build_tokenizer(["alpha beta"], 100, &reserved()).unwrap();
        assert_eq!(tok.token_to_id(UNK_TOKEN), Some(0));
        assert_eq!(tok.token_to_id(PAD_TOKEN), Some(1));
        // Reserved pieces are in the vocabulary even when the corpus lacks them
        assert!(tok.token_to_id(".").is_some());
        assert!(tok.token_to_id(";").is_some());
        assert!(tok.token_to_id("\n").is_some());
    }

    #[test]
    fn test_vocab_size_is_respected() {
        let text = "the seller shall deliver the goods to the buyer within thirty days";
        let tok  = build_tokenizer([text], 40, &reserved()).unwrap();
        let size = tok.get_vocab_size(true);
        assert!(size <= 40, "vocab grew to {size}");
        assert!(size > 25);
    }

    #[test]
    fn test_unseen_word_splits_into_known_pieces() {
        let tok = build_tokenizer(["The Buyer shall pay the Seller."], 300, &reserved()).unwrap();
        let enc = tok.encode("Sellers", false).unwrap();
        assert!(enc.get_ids().len() > 1);
        assert!(enc.get_ids().iter().all(|&id| id != 0), "{:?}", enc.get_tokens());
    }

    #[test]
    fn test_specials_are_not_added_tokens() {
        let tok = build_tokenizer(["Fill in here."], 300, &reserved()).unwrap();
        assert!(tok.get_added_tokens_decoder().is_empty());
        let enc = tok.encode("[PAD]", false).unwrap();
        assert!(enc.get_ids().iter().all(|&id| id != 1));
    }

    #[test]
    fn test_pre_tokenization_splits_punctuation_and_newlines() {
        let tok = build_tokenizer(["Section 2(a); see\nbelow."], 100, &reserved()).unwrap();
        let enc = tok.encode_char_offsets("Section 2(a); see\nbelow.", false).unwrap();
        let offsets = enc.get_offsets();
        assert_eq!(
            offsets,
            &[(0, 7), (8, 9), (9, 10), (10, 11), (11, 12), (12, 13), (14, 17), (17, 18), (18, 23), (23, 24)]
        );
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        let built = store.build_and_save(["The Buyer shall pay."], 50, &reserved()).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(built.get_vocab(true), loaded.get_vocab(true));
    }

    #[test]
    fn test_load_without_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TokenizerStore::new(dir.path()).load().is_err());
    }
}
