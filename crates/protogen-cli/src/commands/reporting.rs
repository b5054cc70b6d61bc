use colored::Colorize;
use protogen_core::{BatchObserver, BatchReport, FileOutcome, GeneratorConfig, Invocation};

/// Prints per-file progress as a batch runs.
pub(crate) struct ConsoleObserver {
    verbose: bool,
    hinted_doctor: bool,
}

impl ConsoleObserver {
    pub(crate) fn new(verbose: bool) -> Self {
        Self {
            verbose,
            hinted_doctor: false,
        }
    }
}

impl BatchObserver for ConsoleObserver {
    fn on_start(&mut self, index: usize, total: usize, invocation: &Invocation) {
        if self.verbose {
            println!(
                "{} [{}/{}] {}",
                "Processing".blue().bold(),
                index + 1,
                total,
                invocation.description_file.display()
            );
            println!("  {} {}", "Command:".dimmed(), invocation.command_line());
        }
    }

    fn on_finish(&mut self, outcome: &FileOutcome<'_>) {
        let path = outcome.path.display();
        match outcome.result {
            Ok(output) => {
                println!(
                    "  {} {} {}",
                    "SUCCESS".green(),
                    path,
                    format!("({}ms)", outcome.duration.as_millis()).dimmed()
                );
                if self.verbose && !output.stdout.trim().is_empty() {
                    print_indented(output.stdout.trim_end());
                }
            }
            Err(e) => {
                println!("  {} {}", "FAILED".red(), path);
                print_indented(e.to_string().trim_end());
                if e.is_environment_error() && !self.hinted_doctor {
                    println!(
                        "     {}",
                        "Run `protogen doctor` to check the protoc toolchain.".dimmed()
                    );
                    self.hinted_doctor = true;
                }
            }
        }
    }
}

fn print_indented(text: &str) {
    for line in text.lines() {
        println!("     {}", line);
    }
}

/// Prints the run configuration before a batch starts.
pub(crate) fn print_header(config: &GeneratorConfig, file_count: usize) {
    println!("{}", "======================================".cyan());
    println!("{}", "  protogen: Go code generation".cyan());
    println!("{}", "======================================".cyan());
    println!();
    println!("{} {}", "Compiler:".blue().bold(), config.compiler.display());
    println!("{} {}", "Plugin:".blue().bold(), config.plugin_path.display());
    println!(
        "{} {}",
        "Output directory:".blue().bold(),
        config.output_dir.display()
    );
    let includes = config
        .effective_include_dirs()
        .iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!("{} {}", "Include directories:".blue().bold(), includes);
    if let Some(timeout) = config.timeout {
        println!("{} {}s", "Timeout:".blue().bold(), timeout.as_secs());
    }
    println!();
    println!(
        "{} Found {} .proto files to process",
        "INFO".blue().bold(),
        file_count
    );
    println!();
}

/// Prints the end-of-batch summary.
pub(crate) fn print_summary(report: &BatchReport) {
    println!();
    println!("{}", "======================================".cyan());
    println!("{}", "  Generation Summary".cyan());
    println!("{}", "======================================".cyan());
    println!();
    println!("{} {}", "Files processed:".blue().bold(), report.attempted);
    println!("{} {}", "Successful:".green().bold(), report.success_count());
    println!("{} {}", "Failed:".red().bold(), report.failure_count());
    if !report.skipped_duplicates.is_empty() {
        println!(
            "{} {}",
            "Duplicates skipped:".yellow().bold(),
            report.skipped_duplicates.len()
        );
    }
    println!(
        "{} {:.2}s",
        "Total runtime:".blue().bold(),
        report.elapsed_ms as f64 / 1000.0
    );
    println!();

    if !report.failures.is_empty() {
        println!("{}", "Failed files:".red().bold());
        for failure in &report.failures {
            println!("  - {} [{}]", failure.path.display(), failure.code.dimmed());
        }
        println!();
    }

    println!("{}", completion_line(report));
}

/// One-line summary of successes out of attempted files.
pub(crate) fn completion_line(report: &BatchReport) -> String {
    let status = if report.all_succeeded() {
        "SUCCESS".green().bold()
    } else {
        "WARNING".yellow().bold()
    };
    format!(
        "{} Batch generation complete: {} of {} files succeeded",
        status,
        report.success_count(),
        report.attempted
    )
}
