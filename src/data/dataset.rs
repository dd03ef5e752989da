use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::training_examples::TrainingExamples;

/// One candidate window and its gold label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSample {
    pub ids:   Vec<u32>,
    pub label: bool,
}

#[derive(Debug, Clone, Default)]
pub struct WindowDataset {
    samples: Vec<WindowSample>,
}

impl WindowDataset {
    pub fn new(samples: Vec<WindowSample>) -> Self {
        Self { samples }
    }

    /// Append one document's windows, keeping window/label pairing.
    pub fn extend(&mut self, examples: TrainingExamples) {
        self.samples.extend(
            examples
                .windows
                .into_iter()
                .zip(examples.labels)
                .map(|(ids, label)| WindowSample { ids, label }),
        );
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn positive_count(&self) -> usize {
        self.samples.iter().filter(|s| s.label).count()
    }
}

impl Dataset<WindowSample> for WindowDataset {
    fn get(&self, index: usize) -> Option<WindowSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_pairs_windows_with_labels() {
        let mut ds = WindowDataset::default();
        ds.extend(TrainingExamples {
            windows: vec![vec![1, 2, 3], vec![4, 5, 6]],
            labels:  vec![false, true],
            ..TrainingExamples::default()
        });
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.positive_count(), 1);
        assert_eq!(ds.get(1).unwrap().ids, vec![4, 5, 6]);
        assert!(ds.get(2).is_none());
    }
}
