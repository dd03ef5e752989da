// ============================================================
// Layer 2 — Segmentation
// ============================================================
// segment(text):
//
//   tokenize → pad (c each side) → inference candidates
//            → windows → classifier → p > threshold
//            → candidate char ends → reconstruct segments
//
// Segmenter is generic over the tokenizer and the classifier so
// the pipeline can be exercised with a stand-in classifier.
// SegmentUseCase wires it to the trained artifacts, loaded once.

use std::path::Path;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    candidates::CandidateSelector,
    reconstruct::reconstruct_segments,
    window::{WindowExtractor, WindowingConfig},
};
use crate::domain::segmentation::{Prediction, Segmentation};
use crate::domain::traits::{BoundaryClassifier, TextTokenizer};
use crate::infra::{
    checkpoint::CheckpointManager,
    tokenizer::SubwordTokenizer,
    tokenizer_store::TokenizerStore,
};
use crate::ml::{default_device, inferencer::CnnClassifier, InferBackend};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmenterConfig {
    pub windowing: WindowingConfig,
    /// A candidate is a boundary when its probability is strictly
    /// greater than this.
    pub threshold: f32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self { windowing: WindowingConfig::default(), threshold: 0.5 }
    }
}

pub struct Segmenter<T: TextTokenizer, C: BoundaryClassifier> {
    tokenizer:  T,
    classifier: C,
    selector:   CandidateSelector,
    extractor:  WindowExtractor,
    threshold:  f32,
}

impl<T: TextTokenizer, C: BoundaryClassifier> Segmenter<T, C> {
    pub fn new(tokenizer: T, classifier: C, config: &SegmenterConfig) -> Self {
        Self {
            tokenizer,
            classifier,
            selector:  CandidateSelector::new(&config.windowing),
            extractor: WindowExtractor::new(config.windowing.context_size),
            threshold: config.threshold,
        }
    }

    /// One prediction per inference candidate, in token order.
    pub fn predict(&self, text: &str) -> Result<Vec<Prediction>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let tokenized = self.tokenizer.tokenize(text)?;
        if tokenized.is_empty() {
            return Ok(Vec::new());
        }
        let padded = tokenized.pad_both(self.extractor.context_size(), self.tokenizer.pad_id());

        let candidates = self.selector.inference_candidates(&padded);
        tracing::debug!("{} tokens, {} candidates", padded.real_len(), candidates.len());
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let windows       = self.extractor.extract(&padded, &candidates);
        let probabilities = self.classifier.classify(&windows)?;
        if probabilities.len() != windows.len() {
            bail!(
                "Classifier returned {} probabilities for {} windows",
                probabilities.len(),
                windows.len()
            );
        }

        let left = padded.left_pad();
        windows
            .iter()
            .zip(probabilities)
            .map(|(window, probability)| {
                if !(0.0..=1.0).contains(&probability) {
                    bail!("Classifier returned probability {probability} outside [0, 1]");
                }
                let Some(token) = padded.token(window.token_index) else {
                    bail!("Candidate {} is outside the token sequence", window.token_index);
                };
                Ok(Prediction {
                    token_index: window.token_index - left,
                    char_end: token.span.end,
                    probability,
                })
            })
            .collect()
    }

    pub fn segment(&self, text: &str) -> Result<Segmentation> {
        let ends: Vec<usize> = self
            .predict(text)?
            .into_iter()
            .filter(|p| p.probability > self.threshold)
            .map(|p| p.char_end)
            .collect();

        tracing::debug!("{} predicted sentence ends", ends.len());
        Ok(reconstruct_segments(text, &ends))
    }
}

// ─── SegmentUseCase ───────────────────────────────────────────────────────────
pub struct SegmentUseCase {
    segmenter: Segmenter<SubwordTokenizer, CnnClassifier<InferBackend>>,
}

impl SegmentUseCase {
    /// Load tokenizer, model and configs from a training run.
    /// `threshold` overrides the saved one.
    pub fn load(artifacts_dir: impl AsRef<Path>, threshold: Option<f32>) -> Result<Self> {
        let dir  = artifacts_dir.as_ref();
        let ckpt = CheckpointManager::open(dir)?;

        let train_cfg  = ckpt.load_config()?;
        let mut config = train_cfg.segmenter_config();
        if let Some(t) = threshold {
            config.threshold = t;
        }

        let tokenizer  = SubwordTokenizer::new(TokenizerStore::new(dir).load()?)?;
        let classifier = CnnClassifier::<InferBackend>::from_checkpoint(&ckpt, default_device())?
            .with_batch_size(train_cfg.eval_batch_size);
        if classifier.window_len() != config.windowing.window_len() {
            bail!(
                "Model expects {}-token windows but the saved windowing gives {}",
                classifier.window_len(),
                config.windowing.window_len()
            );
        }

        tracing::info!("Segmenter ready (threshold {})", config.threshold);
        Ok(Self { segmenter: Segmenter::new(tokenizer, classifier, &config) })
    }

    pub fn segment(&self, text: &str) -> Result<Segmentation> {
        self.segmenter.segment(text)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::window::ContextWindow;
    use crate::infra::tokenizer::test_support::corpus_tokenizer;

    /// Scores 0.9 for windows centred on `boundary_id`, 0.1 otherwise.
    struct CenterClassifier {
        boundary_id: Option<u32>,
    }

    impl BoundaryClassifier for CenterClassifier {
        fn classify(&self, windows: &[ContextWindow]) -> Result<Vec<f32>> {
            Ok(windows
                .iter()
                .map(|w| match self.boundary_id {
                    Some(id) if w.center_id() == id => 0.9,
                    None => 0.9,
                    _ => 0.1,
                })
                .collect())
        }
    }

    struct ConstantClassifier(Vec<f32>);

    impl BoundaryClassifier for ConstantClassifier {
        fn classify(&self, _windows: &[ContextWindow]) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    fn period_segmenter(texts: &[&str]) -> Segmenter<SubwordTokenizer, CenterClassifier> {
        let tok = corpus_tokenizer(texts);
        let period = tok.inner().token_to_id(".");
        Segmenter::new(tok, CenterClassifier { boundary_id: period }, &SegmenterConfig::default())
    }

    #[test]
    fn test_three_sentences() {
        let text = "This is a test. This is a test. This is a test.";
        let seg  = period_segmenter(&[text]).segment(text).unwrap();
        assert_eq!(seg.segments, vec!["This is a test."; 3]);
        assert_eq!(seg.ends, vec![15, 31, 47]);
    }

    #[test]
    fn test_empty_text() {
        let seg = period_segmenter(&["a."]).segment("").unwrap();
        assert!(seg.segments.is_empty());
        assert!(seg.ends.is_empty());
    }

    #[test]
    fn test_no_candidates_gives_whole_text() {
        let text = "no punctuation here";
        let seg  = period_segmenter(&[text]).segment(text).unwrap();
        assert_eq!(seg.segments, vec![text]);
        assert_eq!(seg.ends, vec![19]);
    }

    #[test]
    fn test_whitespace_only_text_is_one_segment() {
        let text = "  \t ";
        let seg  = period_segmenter(&["a."]).segment(text).unwrap();
        assert_eq!(seg.segments, vec![text]);
        assert_eq!(seg.ends, vec![4]);
    }

    #[test]
    fn test_line_end_is_a_candidate() {
        let text = "Section 1\nThe parties agree";
        let tok  = corpus_tokenizer(&[text]);
        let seg  = Segmenter::new(tok, CenterClassifier { boundary_id: None }, &SegmenterConfig::default())
            .segment(text)
            .unwrap();
        assert_eq!(seg.segments, vec!["Section 1", "The parties agree"]);
        assert_eq!(seg.ends, vec![9, 27]);
    }

    #[test]
    fn test_predictions_use_unpadded_indices() {
        let text  = "Pay now. Thanks.";
        let preds = period_segmenter(&[text]).predict(text).unwrap();
        let idx: Vec<usize> = preds.iter().map(|p| p.token_index).collect();
        let ends: Vec<usize> = preds.iter().map(|p| p.char_end).collect();
        assert_eq!(idx, vec![2, 4]);
        assert_eq!(ends, vec![8, 16]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let text = "One. Two.";
        let tok  = corpus_tokenizer(&[text]);
        let seg  = Segmenter::new(tok, ConstantClassifier(vec![0.5, 0.5]), &SegmenterConfig::default())
            .segment(text)
            .unwrap();
        assert_eq!(seg.segments, vec![text]);
    }

    #[test]
    fn test_probability_count_mismatch_fails_whole_request() {
        let text = "One. Two.";
        let tok  = corpus_tokenizer(&[text]);
        let seg  = Segmenter::new(tok, ConstantClassifier(vec![0.9]), &SegmenterConfig::default());
        assert!(seg.segment(text).is_err());
    }

    #[test]
    fn test_segments_preserve_non_whitespace() {
        let text = "Article 2.  Term; the lease runs (12) months\n\nSigned \"X\"";
        let seg  = period_segmenter(&[text]).segment(text).unwrap();
        let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        assert_eq!(strip(&seg.segments.concat()), strip(text));
        assert!(seg.ends.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seg.ends.len(), seg.segments.len());
    }

    #[test]
    fn test_train_then_segment_from_artifacts() {
        use crate::application::train_use_case::{TrainConfig, TrainUseCase};

        let dir    = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus.json");
        std::fs::write(
            &corpus,
            r#"{
                "a": { "text": "The fee is due. It is paid.", "annotations": [{"start": 0, "end": 15}, {"start": 16, "end": 27}] },
                "b": { "text": "Section 1\nThe term is one year.", "annotations": [{"start": 0, "end": 9}, {"start": 10, "end": 31}] },
                "c": { "text": "Rent is owed. Notice is given.", "annotations": [{"start": 0, "end": 13}, {"start": 14, "end": 30}] }
            }"#,
        )
        .unwrap();

        let artifacts = dir.path().join("artifacts");
        let config = TrainConfig {
            train_files:   vec![corpus.clone()],
            val_files:     vec![corpus],
            artifacts_dir: artifacts.clone(),
            epochs:        1,
            batch_size:    4,
            ..TrainConfig::default()
        };
        let history = TrainUseCase::new(config).execute().unwrap();
        assert_eq!(history.len(), 1);

        let use_case = SegmentUseCase::load(&artifacts, Some(0.5)).unwrap();
        let text = "The fee is due. Rent is owed.";
        let seg  = use_case.segment(text).unwrap();
        assert!(!seg.is_empty());
        assert_eq!(seg.ends.last(), Some(&29));
        assert!(use_case.segment("").unwrap().is_empty());
    }

    #[test]
    fn test_loading_missing_artifacts_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SegmentUseCase::load(dir.path().join("missing"), None).is_err());
    }
}
