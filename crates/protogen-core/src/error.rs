//! Error types for protoc invocations.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type for generation operations.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Errors that can occur while generating code for one description file.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The plugin executable does not exist. No process was started.
    #[error("Plugin file '{}' does not exist", path.display())]
    PluginNotFound { path: PathBuf },

    /// The compiler could not be located when spawning.
    #[error("Compiler '{program}' not found. Ensure protoc is installed and in PATH")]
    CompilerNotFound { program: String },

    /// The compiler ran and exited with a non-zero status.
    #[error("protoc exited with status {exit_code}: {stderr}")]
    CompilerFailed { exit_code: i32, stderr: String },

    /// Any other failure while spawning or waiting for the compiler.
    #[error("Failed to run '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The compiler did not exit within the configured limit.
    #[error("protoc timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

impl GenerateError {
    /// Creates a new compiler failed error.
    pub fn compiler_failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::CompilerFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Stable identifier for this error, used in reports.
    pub fn code(&self) -> &'static str {
        match self {
            GenerateError::PluginNotFound { .. } => "PROTOGEN_001",
            GenerateError::CompilerNotFound { .. } => "PROTOGEN_002",
            GenerateError::CompilerFailed { .. } => "PROTOGEN_003",
            GenerateError::SpawnFailed { .. } => "PROTOGEN_004",
            GenerateError::Timeout { .. } => "PROTOGEN_005",
        }
    }

    /// Returns true for errors caused by configuration or a missing
    /// toolchain rather than the description file itself.
    pub fn is_environment_error(&self) -> bool {
        matches!(
            self,
            GenerateError::PluginNotFound { .. } | GenerateError::CompilerNotFound { .. }
        )
    }
}
