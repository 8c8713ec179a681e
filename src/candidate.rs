//! Running the candidate solver.
//!
//! [`ProcessCandidate`] runs a pre-built executable as a subprocess: the input
//! text is written to its stdin, stdout is captured after the process exits.
//! The child is owned by a guard that kills and reaps it on every exit path,
//! so a failed or timed-out run never leaves a stray process behind.
//!
//! Without a timeout, a candidate that never terminates blocks the run. Set one
//! with [`ProcessCandidate::with_timeout`] or wrap the harness in an external
//! timeout.

use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::errors::ExecutionError;

/// Where the candidate executable is expected, relative to the harness executable.
pub const DEFAULT_CANDIDATE_PATH: &str = "../a";

/// How often a child is polled while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Something that turns protocol input into raw candidate output.
pub trait Candidate {
    /// Run the candidate on `input` and return everything it wrote to stdout.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] when the candidate cannot be run, fails,
    /// or does not finish in time.
    fn run(&mut self, input: &str) -> Result<String, ExecutionError>;
}

impl<F> Candidate for F
where
    F: FnMut(&str) -> Result<String, ExecutionError>,
{
    fn run(&mut self, input: &str) -> Result<String, ExecutionError> {
        self(input)
    }
}

/// An external executable speaking the line protocol on stdin/stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCandidate {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl ProcessCandidate {
    /// Run `program` with no arguments and no timeout.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Locate the candidate at `relative`, resolved against the directory that
    /// holds the running harness executable.
    ///
    /// # Errors
    ///
    /// Returns an error when the harness cannot determine its own location.
    pub fn beside_harness(relative: impl AsRef<Path>) -> io::Result<Self> {
        let exe = std::env::current_exe()?;
        let dir = exe
            .parent()
            .ok_or_else(|| io::Error::other("harness executable has no parent directory"))?;
        Ok(Self::new(dir.join(relative)))
    }

    /// Append an argument passed to the program on every run.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Kill the candidate and fail with [`ExecutionError::TimedOut`] when a run
    /// takes longer than `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The program that is executed.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The configured timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Candidate for ProcessCandidate {
    fn run(&mut self, input: &str) -> Result<String, ExecutionError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let mut guard = ChildGuard::new(child);

        let stdin = feed(guard.child.stdin.take(), input.as_bytes().to_vec());
        let stdout = drain(guard.child.stdout.take());
        let stderr = drain(guard.child.stderr.take());

        let status = guard.wait(self.timeout)?;
        join(stdin)?;
        let stdout = join(stdout)?;
        let stderr = join(stderr)?;
        tracing::debug!(
            program = %self.program.display(),
            %status,
            input_bytes = input.len(),
            output_bytes = stdout.len(),
            "candidate finished"
        );

        if !status.success() {
            return Err(ExecutionError::NonZeroExit {
                status,
                stderr: String::from_utf8_lossy(&stderr).trim().to_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

/// Owns a running child; kills and reaps it unless it was waited for.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    /// Wait for the child to exit, giving up after `timeout`.
    fn wait(&mut self, timeout: Option<Duration>) -> Result<ExitStatus, ExecutionError> {
        let status = match timeout {
            None => self.child.wait()?,
            Some(limit) => {
                let started = Instant::now();
                loop {
                    if let Some(status) = self.child.try_wait()? {
                        break status;
                    }
                    if started.elapsed() >= limit {
                        return Err(ExecutionError::TimedOut(limit));
                    }
                    thread::sleep(POLL_INTERVAL);
                }
            }
        };
        self.reaped = true;
        Ok(status)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Write `input` to the child's stdin on a helper thread and close it, so the
/// timeout is armed while a candidate that never reads its input is running.
fn feed<W: Write + Send + 'static>(
    pipe: Option<W>,
    input: Vec<u8>,
) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || {
        let Some(mut pipe) = pipe else {
            return Ok(());
        };
        match pipe.write_all(&input) {
            // A candidate may exit without reading all of its input; its
            // exit status decides the outcome.
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
            result => result,
        }
    })
}

/// Read a pipe to completion on a helper thread, so that neither pipe can
/// fill up and stall the child while the other is being read.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn join<T>(handle: JoinHandle<io::Result<T>>) -> Result<T, ExecutionError> {
    let value = handle
        .join()
        .map_err(|_| io::Error::other("candidate pipe thread panicked"))??;
    Ok(value)
}
