//! Process launching.
//!
//! The runner never touches `std::process` directly; it goes through a
//! [`ProcessLauncher`], so tests can substitute a launcher that records
//! invocations instead of spawning anything.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::invocation::Invocation;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Everything written to standard output.
    pub stdout: String,
    /// Everything written to standard error.
    pub stderr: String,
}

impl LaunchOutput {
    /// Creates an output for a process that exited with `exit_code`.
    pub fn exited(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// True if the process exited with status zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

impl From<Output> for LaunchOutput {
    fn from(output: Output) -> Self {
        Self {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Capability to run an invocation to completion.
///
/// Implementations must block until the process exits and return its full
/// captured output. A spawn failure is reported as the underlying
/// [`io::Error`]; `ErrorKind::NotFound` means the program could not be found
/// and `ErrorKind::TimedOut` means it was killed after a time limit.
pub trait ProcessLauncher {
    fn launch(&self, invocation: &Invocation) -> io::Result<LaunchOutput>;
}

impl<L: ProcessLauncher + ?Sized> ProcessLauncher for &L {
    fn launch(&self, invocation: &Invocation) -> io::Result<LaunchOutput> {
        (**self).launch(invocation)
    }
}

/// Launches real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemLauncher {
    timeout: Option<Duration>,
}

impl SystemLauncher {
    /// Creates a launcher that waits indefinitely for each process.
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Creates a launcher that kills processes running longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Returns the configured time limit.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, invocation: &Invocation) -> io::Result<LaunchOutput> {
        let mut cmd = Command::new(invocation.program());
        cmd.args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        match self.timeout {
            None => cmd.output().map(LaunchOutput::from),
            Some(timeout) => wait_with_timeout(cmd.spawn()?, timeout),
        }
    }
}

/// Process handle operations needed by the wait loop.
trait Waitable {
    fn try_wait(&mut self) -> io::Result<Option<ExitStatus>>;
    fn kill(&mut self) -> io::Result<()>;
    fn wait(&mut self) -> io::Result<ExitStatus>;
}

impl Waitable for Child {
    fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        Child::try_wait(self)
    }

    fn kill(&mut self) -> io::Result<()> {
        Child::kill(self)
    }

    fn wait(&mut self) -> io::Result<ExitStatus> {
        Child::wait(self)
    }
}

/// Waits for `child`, killing it once `timeout` has elapsed.
///
/// Both pipes are drained on helper threads while polling so a process that
/// fills its stdout cannot stall.
fn wait_with_timeout(mut child: Child, timeout: Duration) -> io::Result<LaunchOutput> {
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = wait_for_exit(&mut child, timeout)?;

    Ok(LaunchOutput {
        exit_code: status.code(),
        stdout: collect(stdout),
        stderr: collect(stderr),
    })
}

/// Polls `child` until it exits. On timeout or a failed status query the
/// child is killed and reaped before the error is returned.
fn wait_for_exit<W: Waitable>(child: &mut W, timeout: Duration) -> io::Result<ExitStatus> {
    let start = Instant::now();

    loop {
        let err = match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if start.elapsed() <= timeout => {
                thread::sleep(Duration::from_millis(50));
                continue;
            }
            Ok(None) => io::Error::new(
                io::ErrorKind::TimedOut,
                format!("process timed out after {:?}", timeout),
            ),
            Err(e) => e,
        };

        let _ = child.kill();
        let _ = child.wait();
        return Err(err);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default()
}
