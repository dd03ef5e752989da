// ============================================================
// Layer 4 — Annotated Corpus Loader
// ============================================================
// Reads JSON annotation files of the form
//
//   {
//     "<record key>": {
//       "text": "...",
//       "annotations": [ { "start": 0, "end": 35 }, ... ]
//     },
//     ...
//   }
//
// Only `end` is used. Extra fields on records and annotations
// are ignored. Several files are concatenated in the order given.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::document::AnnotatedDocument;
use crate::domain::traits::DocumentSource;

#[derive(Debug, Deserialize)]
struct RawRecord {
    text: String,
    #[serde(default)]
    annotations: Vec<RawAnnotation>,
}

#[derive(Debug, Deserialize)]
struct RawAnnotation {
    end: usize,
}

pub struct JsonCorpusLoader {
    paths: Vec<PathBuf>,
}

impl JsonCorpusLoader {
    pub fn new<P: Into<PathBuf>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self { paths: paths.into_iter().map(Into::into).collect() }
    }
}

impl DocumentSource for JsonCorpusLoader {
    fn load_all(&self) -> Result<Vec<AnnotatedDocument>> {
        let mut docs = Vec::new();
        for path in &self.paths {
            let loaded = load_file(path)?;
            tracing::debug!("Loaded {} records from '{}'", loaded.len(), path.display());
            docs.extend(loaded);
        }
        tracing::info!("Loaded {} annotated documents from {} files", docs.len(), self.paths.len());
        Ok(docs)
    }
}

fn load_file(path: &Path) -> Result<Vec<AnnotatedDocument>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read annotation file '{}'", path.display()))?;
    parse_corpus(&json, &path.display().to_string())
}

/// Parse one annotation file's contents. `origin` prefixes each
/// document's source name.
pub fn parse_corpus(json: &str, origin: &str) -> Result<Vec<AnnotatedDocument>> {
    let records: BTreeMap<String, RawRecord> = serde_json::from_str(json)
        .with_context(|| format!("Malformed annotation file '{origin}'"))?;

    Ok(records
        .into_iter()
        .map(|(key, record)| {
            AnnotatedDocument::new(
                format!("{origin}#{key}"),
                record.text,
                record.annotations.into_iter().map(|a| a.end),
            )
        })
        .collect())
}
