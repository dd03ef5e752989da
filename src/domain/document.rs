// ============================================================
// Layer 3 — Annotated Document
// ============================================================
// A source text together with its gold sentence end offsets.
//
// `ends` are exclusive character offsets: `end - 1` is the last
// character of a sentence. Annotation files may list ends in any
// order and repeat them; here they always form a sorted set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    /// File and record key — kept so data-quality warnings can
    /// point at the offending record
    pub source: String,

    pub text: String,

    /// Sorted, deduplicated sentence end offsets
    ends: Vec<usize>,
}

impl AnnotatedDocument {
    pub fn new(
        source: impl Into<String>,
        text:   impl Into<String>,
        ends:   impl IntoIterator<Item = usize>,
    ) -> Self {
        let ends: BTreeSet<usize> = ends.into_iter().collect();
        Self {
            source: source.into(),
            text:   text.into(),
            ends:   ends.into_iter().collect(),
        }
    }

    pub fn ends(&self) -> &[usize] {
        &self.ends
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ends_are_sorted_and_deduplicated() {
        let doc = AnnotatedDocument::new("a.json#1", "One. Two. Three.", [16, 4, 9, 4]);
        assert_eq!(doc.ends(), &[4, 9, 16]);
        assert_eq!(doc.char_len(), 16);
    }
}
