//! Generate command implementation
//!
//! Runs protoc over explicit `.proto` files or every `.proto` file found under
//! a directory, then prints a summary.

use anyhow::{Context, Result};
use colored::Colorize;
use protogen_core::{
    find_description_files, generate_batch, generate_batch_with, BatchReport, GeneratorConfig,
    Runner, DEFAULT_OUTPUT_DIR, DEFAULT_PLUGIN_PATH,
};
use std::path::PathBuf;
use std::process::ExitCode;

use super::reporting::{self, ConsoleObserver};

/// Directory scanned when no files are given.
pub const DEFAULT_SOURCE_DIR: &str = DEFAULT_OUTPUT_DIR;

/// Options for the generate command. `Default` is the zero-argument run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Explicit description files. Takes precedence over `dir`.
    pub files: Vec<PathBuf>,
    /// Directory to scan (default: [`DEFAULT_SOURCE_DIR`]).
    pub dir: Option<PathBuf>,
    /// Plugin executable (default: [`DEFAULT_PLUGIN_PATH`]).
    pub plugin: Option<PathBuf>,
    /// Output directory (default: [`DEFAULT_OUTPUT_DIR`]).
    pub out: Option<PathBuf>,
    /// Include directories; empty means the output directory.
    pub include_dirs: Vec<PathBuf>,
    /// Compiler executable (default: `protoc` from PATH).
    pub protoc: Option<PathBuf>,
    /// Per-file timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Print the report as JSON instead of colored text.
    pub json: bool,
    /// Print commands and compiler output.
    pub verbose: bool,
}

impl GenerateOptions {
    /// Builds the generator configuration from these options.
    pub fn config(&self) -> GeneratorConfig {
        let mut config = GeneratorConfig::new(
            self.plugin
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PLUGIN_PATH)),
            self.out
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        );
        if !self.include_dirs.is_empty() {
            config = config.include_dirs(self.include_dirs.iter().cloned());
        }
        if let Some(ref protoc) = self.protoc {
            config = config.compiler(protoc);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.timeout_secs(secs);
        }
        config
    }

    /// Description files to process: the explicit list, or a directory scan.
    pub fn description_files(&self) -> Vec<PathBuf> {
        if !self.files.is_empty() {
            return self.files.clone();
        }
        find_description_files(self.source_dir())
    }

    fn source_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR))
    }
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 if every file succeeded or there was nothing to do, 1 if any
/// file failed
pub fn run(options: &GenerateOptions) -> Result<ExitCode> {
    let report = execute(options)?;
    Ok(ExitCode::from(exit_status(report.as_ref())))
}

/// Runs the batch and prints progress. Returns `None` when no description
/// files were found.
pub fn execute(options: &GenerateOptions) -> Result<Option<BatchReport>> {
    let files = options.description_files();

    if files.is_empty() {
        if options.json {
            let json = serde_json::to_string_pretty(&BatchReport::default())
                .context("Failed to serialize report")?;
            println!("{}", json);
        } else {
            if options.files.is_empty() && !options.source_dir().is_dir() {
                println!(
                    "{} Directory does not exist: {}",
                    "WARN".yellow().bold(),
                    options.source_dir().display()
                );
            }
            println!(
                "{} No .proto files found, nothing to do",
                "INFO".blue().bold()
            );
        }
        return Ok(None);
    }

    let config = options.config();
    if !options.json {
        reporting::print_header(&config, files.len());
    }

    let runner = Runner::new(config);
    let report = if options.json {
        generate_batch(&files, &runner)
    } else {
        generate_batch_with(&files, &runner, &mut ConsoleObserver::new(options.verbose))
    };

    if options.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        reporting::print_summary(&report);
    }

    Ok(Some(report))
}

/// Process exit status for a finished run.
pub fn exit_status(report: Option<&BatchReport>) -> u8 {
    match report {
        Some(report) if !report.all_succeeded() => 1,
        _ => 0,
    }
}
