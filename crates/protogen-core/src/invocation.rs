//! protoc command-line construction.
//!
//! An [`Invocation`] holds everything needed for one compiler run and renders
//! it to an argument vector:
//!
//! ```text
//! protoc --plugin=protoc-gen-go=<plugin> --go_out=<out> --go_opt=paths=source_relative \
//!        -I <inc1> -I <inc2> ... <file.proto>
//! ```

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Compiler program name, resolved through `PATH` at spawn time.
pub const DEFAULT_COMPILER: &str = "protoc";

/// Logical name the plugin is registered under.
pub const GENERATOR_NAME: &str = "protoc-gen-go";

/// Backend prefix used for the `--<lang>_out` and `--<lang>_opt` flags.
pub const TARGET_LANGUAGE: &str = "go";

/// Fixed backend option: mirror source-relative paths in the output tree.
pub const PATHS_OPTION: &str = "paths=source_relative";

/// Parameters for a single compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Compiler executable.
    pub compiler: PathBuf,
    /// Generator plugin executable.
    pub plugin_path: PathBuf,
    /// Directory generated files are written to.
    pub output_dir: PathBuf,
    /// Import search directories, in order.
    pub include_dirs: Vec<PathBuf>,
    /// The description file to compile.
    pub description_file: PathBuf,
}

impl Invocation {
    /// Creates an invocation using the default compiler.
    ///
    /// `include_dirs` of `None` means "search the output directory only";
    /// the default list is built fresh for every invocation.
    pub fn new(
        description_file: impl Into<PathBuf>,
        plugin_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        include_dirs: Option<Vec<PathBuf>>,
    ) -> Self {
        let output_dir = output_dir.into();
        let include_dirs = include_dirs.unwrap_or_else(|| vec![output_dir.clone()]);
        Self {
            compiler: PathBuf::from(DEFAULT_COMPILER),
            plugin_path: plugin_path.into(),
            output_dir,
            include_dirs,
            description_file: description_file.into(),
        }
    }

    /// Sets the compiler executable.
    pub fn with_compiler(mut self, compiler: impl Into<PathBuf>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// The program to execute.
    pub fn program(&self) -> &OsStr {
        self.compiler.as_os_str()
    }

    /// Arguments passed to the compiler, excluding the program itself.
    pub fn args(&self) -> Vec<OsString> {
        let mut args = Vec::with_capacity(4 + self.include_dirs.len() * 2);

        args.push(prefixed(
            &format!("--plugin={}=", GENERATOR_NAME),
            &self.plugin_path,
        ));
        args.push(prefixed(
            &format!("--{}_out=", TARGET_LANGUAGE),
            &self.output_dir,
        ));
        args.push(OsString::from(format!(
            "--{}_opt={}",
            TARGET_LANGUAGE, PATHS_OPTION
        )));

        for dir in &self.include_dirs {
            args.push(OsString::from("-I"));
            args.push(dir.as_os_str().to_os_string());
        }

        args.push(self.description_file.as_os_str().to_os_string());
        args
    }

    /// Full argument vector, program first.
    pub fn argv(&self) -> Vec<OsString> {
        let mut argv = vec![self.program().to_os_string()];
        argv.extend(self.args());
        argv
    }

    /// Human-readable command line for diagnostics. Not shell-quoted.
    pub fn command_line(&self) -> String {
        self.argv()
            .iter()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn prefixed(prefix: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(prefix);
    arg.push(path.as_os_str());
    arg
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_argument_order() {
        let invocation = Invocation::new(
            "api/user.proto",
            "/bin/gen",
            "/out",
            Some(vec![PathBuf::from("/inc1"), PathBuf::from("/inc2")]),
        );

        assert_eq!(
            strings(&invocation.argv()),
            vec![
                "protoc",
                "--plugin=protoc-gen-go=/bin/gen",
                "--go_out=/out",
                "--go_opt=paths=source_relative",
                "-I",
                "/inc1",
                "-I",
                "/inc2",
                "api/user.proto",
            ]
        );
    }

    #[test]
    fn test_default_include_dirs() {
        let invocation = Invocation::new("a.proto", "/bin/gen", "/out", None);
        assert_eq!(invocation.include_dirs, vec![PathBuf::from("/out")]);

        let args = strings(&invocation.args());
        assert_eq!(&args[3..], &["-I", "/out", "a.proto"]);
    }

    #[test]
    fn test_empty_include_dirs_are_kept_empty() {
        let invocation = Invocation::new("a.proto", "/bin/gen", "/out", Some(Vec::new()));
        let args = strings(&invocation.args());
        assert!(!args.contains(&"-I".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("a.proto"));
    }

    #[test]
    fn test_custom_compiler() {
        let invocation =
            Invocation::new("a.proto", "/bin/gen", "/out", None).with_compiler("/opt/protoc/bin/protoc");
        assert_eq!(invocation.program(), OsStr::new("/opt/protoc/bin/protoc"));
        assert!(invocation
            .command_line()
            .starts_with("/opt/protoc/bin/protoc --plugin="));
    }

    #[test]
    fn test_paths_with_spaces_stay_single_arguments() {
        let invocation = Invocation::new(
            "my protos/a b.proto",
            "/tools/my gen",
            "/gen out",
            None,
        );
        let args = strings(&invocation.args());
        assert_eq!(args[0], "--plugin=protoc-gen-go=/tools/my gen");
        assert_eq!(args[4], "/gen out");
        assert_eq!(args.len(), 6);
    }
}
