//! Runs protoc for a single description file.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{GenerateError, GenerateResult};
use crate::invocation::{Invocation, DEFAULT_COMPILER};
use crate::launcher::{LaunchOutput, ProcessLauncher, SystemLauncher};

/// Default plugin executable.
pub const DEFAULT_PLUGIN_PATH: &str = if cfg!(windows) {
    "protoc-gen-go.exe"
} else {
    "protoc-gen-go"
};

/// Default output directory, also the default description file root.
pub const DEFAULT_OUTPUT_DIR: &str = "./testdata/custom_tags/";

/// Configuration shared by every invocation in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Path to the generator plugin executable.
    pub plugin_path: PathBuf,
    /// Directory generated code is written to.
    pub output_dir: PathBuf,
    /// Import search directories. `None` means `[output_dir]`.
    pub include_dirs: Option<Vec<PathBuf>>,
    /// Compiler executable, looked up in `PATH` when not a path.
    pub compiler: PathBuf,
    /// Per-invocation time limit. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            plugin_path: PathBuf::from(DEFAULT_PLUGIN_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            include_dirs: None,
            compiler: PathBuf::from(DEFAULT_COMPILER),
            timeout: None,
        }
    }
}

impl GeneratorConfig {
    /// Creates a config with the given plugin and output directory.
    pub fn new(plugin_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugin_path: plugin_path.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Sets the plugin executable path.
    pub fn plugin_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.plugin_path = path.into();
        self
    }

    /// Sets the output directory.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Appends an include directory.
    pub fn include_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_dirs
            .get_or_insert_with(Vec::new)
            .push(path.into());
        self
    }

    /// Replaces the include directory list.
    pub fn include_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.include_dirs = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the compiler executable.
    pub fn compiler(mut self, compiler: impl Into<PathBuf>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// Sets the timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Include directories actually passed to the compiler.
    pub fn effective_include_dirs(&self) -> Vec<PathBuf> {
        self.include_dirs
            .clone()
            .unwrap_or_else(|| vec![self.output_dir.clone()])
    }

    /// Builds the invocation for `description_file`.
    pub fn invocation_for(&self, description_file: &Path) -> Invocation {
        Invocation::new(
            description_file,
            &self.plugin_path,
            &self.output_dir,
            self.include_dirs.clone(),
        )
        .with_compiler(&self.compiler)
    }
}

/// Runs the compiler once per description file.
#[derive(Debug, Clone)]
pub struct Runner<L = SystemLauncher> {
    config: GeneratorConfig,
    launcher: L,
}

impl Runner<SystemLauncher> {
    /// Creates a runner that spawns real processes.
    pub fn new(config: GeneratorConfig) -> Self {
        let launcher = SystemLauncher::with_timeout(config.timeout);
        Self { config, launcher }
    }
}

impl Default for Runner<SystemLauncher> {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl<L: ProcessLauncher> Runner<L> {
    /// Creates a runner with a custom launcher.
    pub fn with_launcher(config: GeneratorConfig, launcher: L) -> Self {
        Self { config, launcher }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Returns a reference to the launcher.
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Builds the invocation for `description_file` without running it.
    pub fn invocation_for(&self, description_file: &Path) -> Invocation {
        self.config.invocation_for(description_file)
    }

    /// Generates code for one description file.
    ///
    /// Fails with [`GenerateError::PluginNotFound`] before launching anything
    /// if the plugin is missing. Succeeds iff the compiler exits with status
    /// zero; otherwise the captured stderr is returned verbatim in
    /// [`GenerateError::CompilerFailed`].
    pub fn run(&self, description_file: &Path) -> GenerateResult<LaunchOutput> {
        if !self.config.plugin_path.is_file() {
            return Err(GenerateError::PluginNotFound {
                path: self.config.plugin_path.clone(),
            });
        }

        let invocation = self.invocation_for(description_file);
        let output = self
            .launcher
            .launch(&invocation)
            .map_err(|e| self.launch_error(e))?;

        if output.success() {
            Ok(output)
        } else {
            Err(GenerateError::compiler_failed(
                output.exit_code.unwrap_or(-1),
                output.stderr,
            ))
        }
    }

    fn launch_error(&self, err: io::Error) -> GenerateError {
        let program = self.config.compiler.to_string_lossy().into_owned();
        match err.kind() {
            io::ErrorKind::NotFound => GenerateError::CompilerNotFound { program },
            io::ErrorKind::TimedOut => GenerateError::Timeout {
                timeout: self.config.timeout.unwrap_or_default(),
            },
            _ => GenerateError::SpawnFailed {
                program,
                source: err,
            },
        }
    }
}

/// Generates code for one description file with a fresh system runner.
///
/// `include_dirs` of `None` searches `output_dir` only.
pub fn run_generation(
    description_file: impl AsRef<Path>,
    plugin_path: impl Into<PathBuf>,
    output_dir: impl Into<PathBuf>,
    include_dirs: Option<Vec<PathBuf>>,
) -> GenerateResult<LaunchOutput> {
    let mut config = GeneratorConfig::new(plugin_path, output_dir);
    config.include_dirs = include_dirs;
    Runner::new(config).run(description_file.as_ref())
}
