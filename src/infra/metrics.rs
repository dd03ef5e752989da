// ============================================================
// Layer 6 — Metrics
// ============================================================
// Binary classification metrics over candidate windows, and a
// CSV logger that appends one row per epoch.
//
// Every rate is guarded: a zero denominator gives 0.0 so a run
// with, say, no predicted positives keeps training.
//
// Output file: <artifacts>/metrics.csv
//
//   epoch,train_loss,train_accuracy,...,train_fn,val_accuracy,...,val_fn
//   1,0.412300,0.912000,...

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// Counts of predicted vs. gold boundary labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tp: u64,
    pub fp: u64,
    pub tn: u64,
    pub fn_: u64,
}

impl ConfusionMatrix {
    pub fn record(&mut self, predicted: bool, actual: bool) {
        match (predicted, actual) {
            (true, true)   => self.tp  += 1,
            (true, false)  => self.fp  += 1,
            (false, false) => self.tn  += 1,
            (false, true)  => self.fn_ += 1,
        }
    }

    /// Threshold `probabilities` (`p >= threshold` is positive) and
    /// record them against `labels`, pairwise.
    pub fn record_batch(&mut self, probabilities: &[f32], labels: &[bool], threshold: f32) {
        for (&p, &actual) in probabilities.iter().zip(labels) {
            self.record(p >= threshold, actual);
        }
    }

    pub fn total(&self) -> u64 {
        self.tp + self.fp + self.tn + self.fn_
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 }
    }

    /// `[[TN, FP], [FN, TP]]`
    pub fn as_matrix(&self) -> [[u64; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// One row of metrics for a single training epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    /// Mean BCE loss over the epoch's training batches
    pub train_loss: f64,
    pub train: ConfusionMatrix,
    pub val:   ConfusionMatrix,
}

const CSV_HEADER: &str = "epoch,train_loss,\
train_accuracy,train_precision,train_recall,train_f1,\
train_tp,train_fp,train_tn,train_fn,\
val_accuracy,val_precision,val_recall,val_f1,\
val_tp,val_fp,val_tn,val_fn";

/// Appends epoch metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{CSV_HEADER}")?;
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(f, "{},{:.6},{},{}", m.epoch, m.train_loss, csv_columns(&m.train), csv_columns(&m.val))?;
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

/// accuracy,precision,recall,f1,tp,fp,tn,fn
fn csv_columns(cm: &ConfusionMatrix) -> String {
    format!(
        "{:.6},{:.6},{:.6},{:.6},{},{},{},{}",
        cm.accuracy(),
        cm.precision(),
        cm.recall(),
        cm.f1(),
        cm.tp,
        cm.fp,
        cm.tn,
        cm.fn_,
    )
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let mut cm = ConfusionMatrix::default();
        cm.record_batch(&[0.9, 0.8, 0.2, 0.1, 0.5], &[true, false, false, true, true], 0.5);
        assert_eq!(cm, ConfusionMatrix { tp: 2, fp: 1, tn: 1, fn_: 1 });
        assert!((cm.accuracy() - 0.6).abs() < 1e-9);
        assert!((cm.precision() - 2.0 / 3.0).abs() < 1e-9);
        assert!((cm.recall() - 2.0 / 3.0).abs() < 1e-9);
        assert!((cm.f1() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(cm.as_matrix(), [[1, 1], [1, 2]]);
    }

    #[test]
    fn test_zero_denominators_give_zero() {
        let empty = ConfusionMatrix::default();
        assert_eq!(empty.accuracy(), 0.0);
        assert_eq!(empty.precision(), 0.0);
        assert_eq!(empty.recall(), 0.0);
        assert_eq!(empty.f1(), 0.0);

        // Nothing predicted positive, nothing actually positive
        let negatives = ConfusionMatrix { tn: 10, ..ConfusionMatrix::default() };
        assert_eq!(negatives.accuracy(), 1.0);
        assert_eq!(negatives.precision(), 0.0);
        assert_eq!(negatives.f1(), 0.0);
    }

    #[test]
    fn test_logger_appends_rows() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        let row    = EpochMetrics {
            epoch:      1,
            train_loss: 0.5,
            train:      ConfusionMatrix { tp: 1, ..Default::default() },
            val:        ConfusionMatrix::default(),
        };
        logger.log(&row).unwrap();
        logger.log(&EpochMetrics { epoch: 2, ..row }).unwrap();

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[2].starts_with("2,0.500000,1.000000"));

        let header: Vec<&str> = lines[0].split(',').collect();
        let row: Vec<&str>    = lines[1].split(',').collect();
        assert_eq!(header.len(), row.len());
        let column = |name: &str| row[header.iter().position(|h| *h == name).unwrap()];
        assert_eq!(column("train_tp"), "1");
        assert_eq!(column("train_fn"), "0");
        assert_eq!(column("val_tn"), "0");
    }
}
