//! protogen core
//!
//! Drives `protoc` with the `protoc-gen-go` plugin over a set of `.proto`
//! description files.
//!
//! # Overview
//!
//! Three pieces compose linearly:
//!
//! 1. **Discovery** - [`find_description_files`] walks a directory tree
//! 2. **Runner** - [`Runner`] builds one [`Invocation`] per file and runs it
//!    through a [`ProcessLauncher`]
//! 3. **Batch** - [`generate_batch`] runs every file in order and collects a
//!    [`BatchReport`]
//!
//! # Example
//!
//! ```ignore
//! use protogen_core::{find_description_files, generate_batch, GeneratorConfig, Runner};
//!
//! let files = find_description_files("./testdata/custom_tags/");
//! let runner = Runner::new(GeneratorConfig::new("protoc-gen-go", "./gen"));
//! let report = generate_batch(&files, &runner);
//!
//! println!("{} of {} succeeded", report.success_count(), report.attempted);
//! ```
//!
//! # Limitations
//!
//! Invocations run sequentially. Without a configured timeout the runner waits
//! for the compiler indefinitely.

pub mod batch;
pub mod discovery;
pub mod error;
pub mod invocation;
pub mod launcher;
pub mod runner;

pub use batch::{
    generate_batch, generate_batch_with, BatchObserver, BatchReport, FileFailure, FileOutcome,
    FileResult,
};
pub use discovery::{find_description_files, DESCRIPTION_EXTENSION};
pub use error::{GenerateError, GenerateResult};
pub use invocation::{Invocation, DEFAULT_COMPILER, GENERATOR_NAME};
pub use launcher::{LaunchOutput, ProcessLauncher, SystemLauncher};
pub use runner::{run_generation, GeneratorConfig, Runner, DEFAULT_OUTPUT_DIR, DEFAULT_PLUGIN_PATH};

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;
    use std::ffi::OsString;
    use std::io;
    use std::path::PathBuf;

    use crate::invocation::Invocation;
    use crate::launcher::{LaunchOutput, ProcessLauncher};

    type Respond = Box<dyn Fn(&Invocation) -> io::Result<LaunchOutput>>;

    /// Launcher that records argv instead of spawning.
    pub struct SpyLauncher {
        calls: RefCell<Vec<Vec<OsString>>>,
        respond: Respond,
    }

    impl SpyLauncher {
        pub fn responding(
            respond: impl Fn(&Invocation) -> io::Result<LaunchOutput> + 'static,
        ) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                respond: Box::new(respond),
            }
        }

        pub fn succeeding() -> Self {
            Self::responding(|_| Ok(LaunchOutput::exited(0, "", "")))
        }

        /// Exits 1 for description files whose path is in `failing`.
        pub fn failing_for<const N: usize>(failing: [&str; N]) -> Self {
            let failing: Vec<PathBuf> = failing.iter().map(PathBuf::from).collect();
            Self::responding(move |invocation| {
                if failing.contains(&invocation.description_file) {
                    Ok(LaunchOutput::exited(
                        1,
                        "",
                        format!(
                            "{}: Expected top-level statement.\n",
                            invocation.description_file.display()
                        ),
                    ))
                } else {
                    Ok(LaunchOutput::exited(0, "", ""))
                }
            })
        }

        pub fn calls(&self) -> Vec<Vec<OsString>> {
            self.calls.borrow().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl ProcessLauncher for SpyLauncher {
        fn launch(&self, invocation: &Invocation) -> io::Result<LaunchOutput> {
            self.calls.borrow_mut().push(invocation.argv());
            (self.respond)(invocation)
        }
    }

    /// Creates an empty file to stand in for the plugin executable.
    pub fn plugin_file() -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let plugin = tmp.path().join("protoc-gen-go");
        std::fs::write(&plugin, "").unwrap();
        (tmp, plugin)
    }
}
