//! CLI argument definitions for the protogen command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// protogen - batch Go code generation with protoc
///
/// Without a subcommand, scans ./testdata/custom_tags/ and generates code
/// with the default plugin and output directory.
#[derive(Parser)]
#[command(name = "protogen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate Go code from .proto files
    Generate {
        /// .proto files to compile (default: scan --dir)
        files: Vec<PathBuf>,

        /// Directory to recursively scan for .proto files
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Path to the protoc-gen-go plugin executable
        #[arg(short, long)]
        plugin: Option<PathBuf>,

        /// Output directory for generated code
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Import search directory (repeatable; default: the output directory)
        #[arg(short = 'I', long = "include")]
        include: Vec<PathBuf>,

        /// protoc executable (default: protoc from PATH)
        #[arg(long)]
        protoc: Option<PathBuf>,

        /// Kill protoc if a single file takes longer than this many seconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,

        /// Output machine-readable JSON report (no colored output)
        #[arg(long)]
        json: bool,

        /// Print each protoc command line and its output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check that protoc and the plugin are installed
    Doctor {
        /// Path to the protoc-gen-go plugin executable
        #[arg(short, long)]
        plugin: Option<PathBuf>,

        /// protoc executable (default: protoc from PATH)
        #[arg(long)]
        protoc: Option<PathBuf>,
    },
}
