//! Batch generation over many description files.
//!
//! A batch is a sequential fold over its inputs: every unique file gets
//! exactly one invocation, failures are recorded and never stop the batch,
//! and the success set keeps input order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::GenerateResult;
use crate::invocation::Invocation;
use crate::launcher::{LaunchOutput, ProcessLauncher};
use crate::runner::Runner;

/// A description file whose invocation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// The description file.
    pub path: PathBuf,
    /// Stable error code, see [`crate::GenerateError::code`].
    pub code: String,
    /// Error message, including compiler stderr when present.
    pub message: String,
    /// Time spent on this file in milliseconds.
    pub duration_ms: u64,
}

/// Per-file entry of a batch, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResult {
    /// The description file.
    pub path: PathBuf,
    /// Whether generation succeeded.
    pub success: bool,
    /// Time spent on this file in milliseconds.
    pub duration_ms: u64,
}

/// Outcome of a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Number of invocations performed.
    pub attempted: usize,
    /// Files that generated successfully, in input order.
    pub succeeded: Vec<PathBuf>,
    /// Files that failed, in input order.
    pub failures: Vec<FileFailure>,
    /// One entry per attempted file, in input order.
    pub results: Vec<FileResult>,
    /// Repeated inputs that were not run again.
    pub skipped_duplicates: Vec<PathBuf>,
    /// Wall time for the batch in milliseconds.
    pub elapsed_ms: u64,
}

impl BatchReport {
    /// Number of successful files.
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    /// Number of failed files.
    pub fn failure_count(&self) -> usize {
        self.attempted - self.succeeded.len()
    }

    /// True if every attempted file succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failure_count() == 0
    }

    /// True if nothing was attempted.
    pub fn is_empty(&self) -> bool {
        self.attempted == 0
    }
}

/// Result for one file, handed to a [`BatchObserver`].
#[derive(Debug)]
pub struct FileOutcome<'a> {
    /// Zero-based position among the unique inputs.
    pub index: usize,
    /// Number of unique inputs.
    pub total: usize,
    /// The description file.
    pub path: &'a Path,
    /// What the runner returned.
    pub result: &'a GenerateResult<LaunchOutput>,
    /// Time spent on this file.
    pub duration: Duration,
}

/// Receives progress while a batch runs.
pub trait BatchObserver {
    /// Called before a file is run.
    fn on_start(&mut self, _index: usize, _total: usize, _invocation: &Invocation) {}

    /// Called after a file has been run.
    fn on_finish(&mut self, _outcome: &FileOutcome<'_>) {}
}

impl BatchObserver for () {}

/// Runs `runner` once per unique file in `files`.
pub fn generate_batch<I, P, L>(files: I, runner: &Runner<L>) -> BatchReport
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
    L: ProcessLauncher,
{
    generate_batch_with(files, runner, &mut ())
}

/// Like [`generate_batch`], reporting progress to `observer`.
pub fn generate_batch_with<I, P, L, O>(files: I, runner: &Runner<L>, observer: &mut O) -> BatchReport
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
    L: ProcessLauncher,
    O: BatchObserver + ?Sized,
{
    let start = Instant::now();
    let (unique, skipped_duplicates) = dedup(files);
    let total = unique.len();

    let initial = BatchReport {
        skipped_duplicates,
        ..Default::default()
    };

    let mut report = unique
        .iter()
        .enumerate()
        .fold(initial, |mut report, (index, path)| {
            observer.on_start(index, total, &runner.invocation_for(path));

            let file_start = Instant::now();
            let result = runner.run(path);
            let duration = file_start.elapsed();

            observer.on_finish(&FileOutcome {
                index,
                total,
                path,
                result: &result,
                duration,
            });

            let duration_ms = duration.as_millis() as u64;
            report.attempted += 1;
            report.results.push(FileResult {
                path: path.clone(),
                success: result.is_ok(),
                duration_ms,
            });
            match result {
                Ok(_) => report.succeeded.push(path.clone()),
                Err(e) => report.failures.push(FileFailure {
                    path: path.clone(),
                    code: e.code().to_string(),
                    message: e.to_string(),
                    duration_ms,
                }),
            }
            report
        });

    report.elapsed_ms = start.elapsed().as_millis() as u64;
    report
}

/// Splits `files` into first occurrences and repeats, both in input order.
fn dedup<I, P>(files: I) -> (Vec<PathBuf>, Vec<PathBuf>)
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    let mut repeats = Vec::new();

    for file in files {
        let path = file.as_ref().to_path_buf();
        if seen.insert(path.clone()) {
            unique.push(path);
        } else {
            repeats.push(path);
        }
    }

    (unique, repeats)
}
