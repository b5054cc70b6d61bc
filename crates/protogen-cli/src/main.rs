//! protogen CLI - batch protoc code generation
//!
//! This binary discovers `.proto` files, runs protoc with the Go plugin on
//! each one, and reports which files generated successfully.

use clap::Parser;
use std::process::ExitCode;

mod cli_args;

use cli_args::{Cli, Commands};
use protogen_cli::commands;
use protogen_cli::commands::generate::GenerateOptions;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => commands::generate::run(&GenerateOptions::default()),
        Some(Commands::Generate {
            files,
            dir,
            plugin,
            out,
            include,
            protoc,
            timeout,
            json,
            verbose,
        }) => commands::generate::run(&GenerateOptions {
            files,
            dir,
            plugin,
            out,
            include_dirs: include,
            protoc,
            timeout_secs: timeout,
            json,
            verbose,
        }),
        Some(Commands::Doctor { plugin, protoc }) => {
            commands::doctor::run(plugin.as_deref(), protoc.as_deref())
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_no_subcommand() {
        let cli = Cli::try_parse_from(["protogen"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "protogen",
            "generate",
            "a.proto",
            "b.proto",
            "--plugin",
            "/bin/gen",
            "--out",
            "/out",
            "-I",
            "/inc1",
            "-I",
            "/inc2",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Generate {
                files,
                dir,
                plugin,
                out,
                include,
                protoc,
                timeout,
                json,
                verbose,
            }) => {
                assert_eq!(files, vec![PathBuf::from("a.proto"), PathBuf::from("b.proto")]);
                assert_eq!(dir, None);
                assert_eq!(plugin, Some(PathBuf::from("/bin/gen")));
                assert_eq!(out, Some(PathBuf::from("/out")));
                assert_eq!(include, vec![PathBuf::from("/inc1"), PathBuf::from("/inc2")]);
                assert_eq!(protoc, None);
                assert_eq!(timeout, None);
                assert!(!json);
                assert!(!verbose);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_parses_generate_dir_and_flags() {
        let cli = Cli::try_parse_from([
            "protogen",
            "generate",
            "--dir",
            "protos",
            "--protoc",
            "/opt/protoc",
            "--timeout",
            "30",
            "--json",
            "-v",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Generate {
                files,
                dir,
                protoc,
                timeout,
                json,
                verbose,
                ..
            }) => {
                assert!(files.is_empty());
                assert_eq!(dir, Some(PathBuf::from("protos")));
                assert_eq!(protoc, Some(PathBuf::from("/opt/protoc")));
                assert_eq!(timeout, Some(30));
                assert!(json);
                assert!(verbose);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_rejects_zero_timeout() {
        let result = Cli::try_parse_from(["protogen", "generate", "--timeout", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_doctor() {
        let cli = Cli::try_parse_from(["protogen", "doctor", "--plugin", "bin/protoc-gen-go"])
            .unwrap();
        match cli.command {
            Some(Commands::Doctor { plugin, protoc }) => {
                assert_eq!(plugin, Some(PathBuf::from("bin/protoc-gen-go")));
                assert_eq!(protoc, None);
            }
            _ => panic!("expected doctor command"),
        }
    }
}
