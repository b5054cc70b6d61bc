//! Doctor command implementation
//!
//! Checks that protoc and the Go plugin are available.

use anyhow::Result;
use colored::Colorize;
use protogen_core::{DEFAULT_COMPILER, DEFAULT_PLUGIN_PATH};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

/// Run the doctor command
///
/// Checks:
/// - protoc is on PATH and reports a version
/// - the plugin file exists where `generate` will look for it
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run(plugin: Option<&Path>, protoc: Option<&Path>) -> Result<ExitCode> {
    let plugin = plugin.unwrap_or(Path::new(DEFAULT_PLUGIN_PATH));
    let protoc = protoc.unwrap_or(Path::new(DEFAULT_COMPILER));

    println!("{}", "protogen Doctor".cyan().bold());
    println!("{}", "===============".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!(
        "  {} protogen-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("{}", "Dependencies:".bold());
    match check_compiler(protoc) {
        CompilerStatus::Found { path, version } => {
            println!(
                "  {} protoc {} ({})",
                "ok".green(),
                version,
                path.display()
            );
        }
        CompilerStatus::NotFound => {
            println!("  {} {} not found in PATH", "!!".red(), protoc.display());
            println!(
                "     {}",
                "Install protobuf from https://github.com/protocolbuffers/protobuf/releases"
                    .dimmed()
            );
            all_ok = false;
        }
        CompilerStatus::Error(e) => {
            println!("  {} protoc check failed: {}", "!!".red(), e);
            all_ok = false;
        }
    }

    match check_plugin(plugin) {
        PluginStatus::Found => {
            println!("  {} plugin {}", "ok".green(), plugin.display());
        }
        PluginStatus::OnPath(found) => {
            println!(
                "  {} plugin {} does not exist, but one is on PATH",
                "!!".yellow(),
                plugin.display()
            );
            println!(
                "     {}",
                format!("Pass --plugin {}", found.display()).dimmed()
            );
            all_ok = false;
        }
        PluginStatus::Missing => {
            println!("  {} plugin {} does not exist", "!!".red(), plugin.display());
            println!(
                "     {}",
                "Install with: go install google.golang.org/protobuf/cmd/protoc-gen-go@latest"
                    .dimmed()
            );
            all_ok = false;
        }
    }

    println!();

    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "WARNING".yellow().bold()
        );
        Ok(ExitCode::from(1))
    }
}

/// Status of the protoc installation check
enum CompilerStatus {
    Found { path: PathBuf, version: String },
    NotFound,
    Error(String),
}

/// Status of the plugin check
#[derive(Debug, PartialEq, Eq)]
enum PluginStatus {
    Found,
    OnPath(PathBuf),
    Missing,
}

fn parse_protoc_version(output: &str) -> Option<String> {
    // Parse "libprotoc 3.21.12"
    output
        .lines()
        .next()
        .and_then(|line| line.trim().strip_prefix("libprotoc "))
        .map(|v| v.trim().to_string())
}

/// Check if protoc is installed and get its version
fn check_compiler(protoc: &Path) -> CompilerStatus {
    let path = match which::which(protoc) {
        Ok(path) => path,
        Err(_) => return CompilerStatus::NotFound,
    };

    match Command::new(&path).arg("--version").output() {
        Ok(output) => {
            if output.status.success() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let version =
                    parse_protoc_version(&stdout).unwrap_or_else(|| "unknown".to_string());
                CompilerStatus::Found { path, version }
            } else {
                CompilerStatus::Error(format!("protoc exited with status: {}", output.status))
            }
        }
        Err(e) => CompilerStatus::Error(e.to_string()),
    }
}

/// Check the plugin the same way the runner does: it must be an existing file.
fn check_plugin(plugin: &Path) -> PluginStatus {
    if plugin.is_file() {
        return PluginStatus::Found;
    }
    match which::which(plugin) {
        Ok(found) => PluginStatus::OnPath(found),
        Err(_) => PluginStatus::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_protoc_version() {
        assert_eq!(
            parse_protoc_version("libprotoc 3.21.12\n"),
            Some("3.21.12".to_string())
        );
        assert_eq!(
            parse_protoc_version("libprotoc 25.1"),
            Some("25.1".to_string())
        );
        assert_eq!(parse_protoc_version(""), None);
        assert_eq!(parse_protoc_version("protoc 1.0"), None);
    }

    #[test]
    fn test_check_plugin_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let plugin = tmp.path().join("protoc-gen-go");
        std::fs::write(&plugin, "").unwrap();
        assert_eq!(check_plugin(&plugin), PluginStatus::Found);
    }

    #[test]
    fn test_check_plugin_missing() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(
            check_plugin(&tmp.path().join("protoc-gen-go")),
            PluginStatus::Missing
        );
    }

    #[test]
    fn test_check_missing_compiler() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            check_compiler(&tmp.path().join("no-such-protoc")),
            CompilerStatus::NotFound
        ));
    }
}
