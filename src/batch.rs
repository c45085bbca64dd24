use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, Level, Span};

use crate::cache::ArtifactCache;
use crate::compare::{Comparator, PairVerdict};
use crate::error::CompareError;
use crate::unit::{SourceFile, SourceUnit};

/// A file that could not be prepared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileFailure {
    pub filename: String,
    pub error: String,
}

/// A pair whose comparison failed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PairFailure {
    pub left: String,
    pub right: String,
    pub error: String,
}

/// Outcome of an all-pairs batch.
///
/// `verdicts` and `failures` follow pair order: `(i, j)` with `i < j` over
/// the files that prepared successfully, in input order. The ordering does not
/// depend on the worker count.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BatchReport {
    pub files: usize,
    pub pairs_total: usize,
    pub verdicts: Vec<PairVerdict>,
    pub failures: Vec<PairFailure>,
    pub input_errors: Vec<FileFailure>,
    /// Pairs not started because the batch was cancelled.
    pub skipped_pairs: usize,
    pub cancelled: bool,
}

impl BatchReport {
    pub fn flagged(&self) -> impl Iterator<Item = &PairVerdict> + '_ {
        self.verdicts.iter().filter(|v| v.verdict.is_plagiarized)
    }
}

enum PairOutcome {
    Done(PairVerdict),
    Failed(PairFailure),
    Skipped,
}

impl Comparator {
    /// Compare every pair of `files` in parallel.
    ///
    /// Files that fail to prepare are reported once in `input_errors` and
    /// left out of pairing. `cancel` is checked before each pair starts;
    /// pairs already running finish normally. Only failing to start the
    /// worker pool is an error.
    ///
    /// Artifacts are shared between the batch's pairs through a cache that
    /// is dropped when the batch returns; the comparator's own cache is not
    /// touched. Prepare and compare spans on worker threads are children of
    /// the `copydetect.batch` span.
    pub fn compare_batch(
        &self,
        files: Vec<SourceFile>,
        cancel: &AtomicBool,
    ) -> Result<BatchReport, CompareError> {
        let span = tracing::span!(Level::INFO, "copydetect.batch", files = files.len());
        let _guard = span.enter();
        let start = Instant::now();

        let report = match self.config().worker_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("copydetect-worker-{i}"))
                    .build()
                    .map_err(|e| CompareError::WorkerPool(e.to_string()))?;
                pool.install(|| self.run_batch(files, cancel, &span))
            }
            None => self.run_batch(files, cancel, &span),
        };

        info!(
            files = report.files,
            pairs = report.pairs_total,
            verdicts = report.verdicts.len(),
            failures = report.failures.len(),
            input_errors = report.input_errors.len(),
            skipped = report.skipped_pairs,
            elapsed_micros = start.elapsed().as_micros(),
            "batch_complete"
        );
        Ok(report)
    }

    fn run_batch(&self, files: Vec<SourceFile>, cancel: &AtomicBool, span: &Span) -> BatchReport {
        let file_count = files.len();
        let cache = ArtifactCache::new();
        // Rayon workers do not inherit the caller's entered span.
        let prepared: Vec<(String, Result<SourceUnit, CompareError>)> = files
            .into_par_iter()
            .map(|file| {
                span.in_scope(|| (file.filename.clone(), self.prepare_in(file, &cache)))
            })
            .collect();

        let mut units = Vec::with_capacity(prepared.len());
        let mut input_errors = Vec::new();
        for (filename, result) in prepared {
            match result {
                Ok(unit) => units.push(unit),
                Err(err) => input_errors.push(FileFailure {
                    filename,
                    error: err.to_string(),
                }),
            }
        }

        let pairs: Vec<(usize, usize)> = (0..units.len())
            .flat_map(|i| (i + 1..units.len()).map(move |j| (i, j)))
            .collect();

        let outcomes: Vec<PairOutcome> = pairs
            .par_iter()
            .map(|&(i, j)| {
                if cancel.load(Ordering::Relaxed) {
                    return PairOutcome::Skipped;
                }
                let (left, right) = (&units[i], &units[j]);
                match span.in_scope(|| self.compare(left, right)) {
                    Ok(verdict) => PairOutcome::Done(verdict),
                    Err(err) => PairOutcome::Failed(PairFailure {
                        left: left.filename.clone(),
                        right: right.filename.clone(),
                        error: err.to_string(),
                    }),
                }
            })
            .collect();

        let mut report = BatchReport {
            files: file_count,
            pairs_total: pairs.len(),
            input_errors,
            ..BatchReport::default()
        };
        for outcome in outcomes {
            match outcome {
                PairOutcome::Done(verdict) => report.verdicts.push(verdict),
                PairOutcome::Failed(failure) => report.failures.push(failure),
                PairOutcome::Skipped => report.skipped_pairs += 1,
            }
        }
        report.cancelled = report.skipped_pairs > 0 || cancel.load(Ordering::Relaxed);
        report
    }
}
