// ============================================================
// Layer 4 — Training Example Preparation
// ============================================================
// prepare_training_examples(text, annotation_ends) runs, per
// document:
//
//   tokenize → pad (c each side) → label → training candidates
//            → windows + labels (same order)
//
// Problems with a single document are recorded in an
// `AlignmentReport`, never raised, so one bad record cannot stop
// a corpus run.

use std::ops::AddAssign;

use anyhow::Result;

use crate::data::candidates::CandidateSelector;
use crate::data::labeler::label_tokens;
use crate::data::window::{WindowExtractor, WindowingConfig};
use crate::domain::traits::TextTokenizer;

/// Per-document (or aggregated) alignment bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentReport {
    pub documents:         usize,
    pub empty_documents:   usize,
    /// Documents skipped because tokenization failed
    pub failed_documents:  usize,
    pub annotated_ends:    usize,
    pub matched_ends:      usize,
    /// Ends outside `[1, len(text)]`
    pub out_of_range_ends: usize,
    /// In-range ends that no token span contains
    pub unmatched_ends:    usize,
}

impl AlignmentReport {
    pub fn dropped(&self) -> usize {
        self.out_of_range_ends + self.unmatched_ends
    }

    pub fn is_clean(&self) -> bool {
        self.dropped() == 0 && self.failed_documents == 0
    }

    /// Report for a document that produced no examples because it
    /// could not be processed.
    pub fn failed(annotated_ends: usize) -> Self {
        Self { documents: 1, failed_documents: 1, annotated_ends, ..Self::default() }
    }
}

impl AddAssign for AlignmentReport {
    fn add_assign(&mut self, other: Self) {
        self.documents         += other.documents;
        self.empty_documents   += other.empty_documents;
        self.failed_documents  += other.failed_documents;
        self.annotated_ends    += other.annotated_ends;
        self.matched_ends      += other.matched_ends;
        self.out_of_range_ends += other.out_of_range_ends;
        self.unmatched_ends    += other.unmatched_ends;
    }
}

/// Windows and labels for one document, index-aligned.
#[derive(Debug, Clone, Default)]
pub struct TrainingExamples {
    pub windows: Vec<Vec<u32>>,
    pub labels:  Vec<bool>,
    pub report:  AlignmentReport,
}

impl TrainingExamples {
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l).count()
    }
}

/// Builds training windows with a fixed tokenizer and windowing.
pub struct ExampleBuilder<'a, T: TextTokenizer> {
    tokenizer: &'a T,
    selector:  CandidateSelector,
    extractor: WindowExtractor,
}

impl<'a, T: TextTokenizer> ExampleBuilder<'a, T> {
    pub fn new(tokenizer: &'a T, config: &WindowingConfig) -> Self {
        Self {
            tokenizer,
            selector:  CandidateSelector::new(config),
            extractor: WindowExtractor::new(config.context_size),
        }
    }

    /// `annotation_ends` may be unsorted and contain duplicates.
    pub fn prepare_training_examples(
        &self,
        text:            &str,
        annotation_ends: &[usize],
    ) -> Result<TrainingExamples> {
        let mut ends: Vec<usize> = annotation_ends.to_vec();
        ends.sort_unstable();
        ends.dedup();

        let mut report = AlignmentReport {
            documents: 1,
            annotated_ends: ends.len(),
            ..AlignmentReport::default()
        };

        if text.is_empty() {
            report.empty_documents   = 1;
            report.out_of_range_ends = ends.len();
            return Ok(TrainingExamples { report, ..TrainingExamples::default() });
        }

        let tokenized = self.tokenizer.tokenize(text)?;
        let char_len  = tokenized.char_len();

        let in_range: Vec<usize> = ends.iter().copied().filter(|&e| e >= 1 && e <= char_len).collect();
        report.out_of_range_ends = ends.len() - in_range.len();

        let padded   = tokenized.pad_both(self.extractor.context_size(), self.tokenizer.pad_id());
        let labeling = label_tokens(&padded.spans(), &in_range);
        report.matched_ends   = labeling.matched();
        report.unmatched_ends = labeling.unmatched_ends;

        let candidates = self.selector.training_candidates(&padded, &labeling.labels);
        let windows    = self.extractor.extract(&padded, &candidates);

        let labels  = candidates.iter().map(|&i| labeling.labels[i]).collect();
        let windows = windows.into_iter().map(|w| w.ids).collect();

        Ok(TrainingExamples { windows, labels, report })
    }
}
