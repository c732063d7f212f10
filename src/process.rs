//! # External Process Execution
//!
//! This module runs the package installer and the build tool. A run is a
//! single blocking call: the executable is started in a working directory,
//! both output streams are captured, and the result is classified into a
//! `RunReport` or an `Error`.
//!
//! ## Classification
//!
//! - The executable cannot be started → `Error::ProcessLaunch`.
//! - Under `StderrPolicy::Strict`, any output on stderr → `Error::ProcessOutput`,
//!   whatever the exit status. Tools that print warnings on stderr therefore
//!   fail the build.
//! - A non-zero exit → `Error::ProcessExit`.
//! - Otherwise the run succeeds with the caller's success message.
//!
//! Runs are never retried. A run can be bounded by a timeout and interrupted
//! through a `Cancellation`; in both cases the child is killed.
//!
//! The `ProcessRunner` trait lets the pipeline be driven by a fake runner in
//! tests, and lets other implementations run invocations differently without
//! changing call sites.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::{CommandSpec, StderrPolicy};
use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Shared flag used to abandon a running build
///
/// Clones observe the same flag, so a handle kept by the request layer can
/// cancel work running inside the pipeline.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    cancelled: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with `Error::Cancelled` if cancellation was requested.
    pub fn check(&self, stage: &str) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Cancelled {
                stage: stage.to_string(),
            });
        }
        Ok(())
    }
}

/// Bounds on a running child: an optional deadline and a cancellation handle
#[derive(Debug, Clone, Copy, Default)]
pub struct Limits<'a> {
    pub timeout: Option<Duration>,
    pub cancellation: Option<&'a Cancellation>,
}

impl<'a> Limits<'a> {
    pub fn new(timeout: Option<Duration>, cancellation: &'a Cancellation) -> Self {
        Self {
            timeout,
            cancellation: Some(cancellation),
        }
    }
}

/// One invocation of an external executable
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    pub program: &'a str,
    pub args: &'a [String],
    pub working_dir: &'a Path,
    /// Message reported when the run succeeds.
    pub success_message: &'a str,
    pub timeout: Option<Duration>,
    pub cancellation: Option<&'a Cancellation>,
}

impl<'a> Invocation<'a> {
    pub fn new(command: &'a CommandSpec, working_dir: &'a Path, success_message: &'a str) -> Self {
        Self {
            program: &command.program,
            args: &command.args,
            working_dir,
            success_message,
            timeout: None,
            cancellation: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, cancellation: &'a Cancellation) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    pub fn limits(&self) -> Limits<'a> {
        Limits {
            timeout: self.timeout,
            cancellation: self.cancellation,
        }
    }

    /// The command line, for log output.
    pub fn display(&self) -> String {
        std::iter::once(self.program)
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub message: String,
    pub stdout: String,
}

/// What a finished process left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    fn from_status(status: ExitStatus, stdout: String, stderr: String) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
            stdout,
            stderr,
        }
    }
}

/// Trait for running external executables - allows mocking in tests
pub trait ProcessRunner: Send + Sync {
    /// Run the invocation to completion and classify its outcome.
    fn run(&self, invocation: &Invocation<'_>) -> Result<RunReport>;
}

/// Runs executables on the host with `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner {
    policy: StderrPolicy,
}

impl SystemProcessRunner {
    pub fn new(policy: StderrPolicy) -> Self {
        Self { policy }
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, invocation: &Invocation<'_>) -> Result<RunReport> {
        info!(
            "Running `{}` in {}",
            invocation.display(),
            invocation.working_dir.display()
        );

        let mut command = Command::new(invocation.program);
        command
            .args(invocation.args)
            .current_dir(invocation.working_dir);
        let captured = capture(&mut command, invocation.program, invocation.limits())
            .inspect_err(|e| {
                if let Error::ProcessLaunch { message, .. } = e {
                    warn!("Failed to launch {}: {}", invocation.program, message);
                }
            })?;
        debug!(
            "{} exited with {:?} ({} bytes stdout, {} bytes stderr)",
            invocation.program,
            captured.code,
            captured.stdout.len(),
            captured.stderr.len()
        );

        classify(
            invocation.program,
            captured,
            invocation.success_message,
            self.policy,
        )
    }
}

/// Turn a finished process's output into a report or an error.
pub fn classify(
    program: &str,
    captured: CapturedOutput,
    success_message: &str,
    policy: StderrPolicy,
) -> Result<RunReport> {
    if !captured.stderr.is_empty() {
        match policy {
            StderrPolicy::Strict => {
                warn!("{} wrote to stderr: {}", program, captured.stderr.trim_end());
                return Err(Error::ProcessOutput {
                    program: program.to_string(),
                    stderr: captured.stderr,
                });
            }
            StderrPolicy::ExitCode => {
                warn!("{} stderr: {}", program, captured.stderr.trim_end());
            }
        }
    }

    if !captured.success {
        return Err(Error::ProcessExit {
            program: program.to_string(),
            code: captured.code,
        });
    }

    info!("{}: {}", program, success_message);
    Ok(RunReport {
        message: success_message.to_string(),
        stdout: captured.stdout,
    })
}

/// Spawn `command` with captured output and wait for it within `limits`.
///
/// Standard input is closed. A spawn failure is `Error::ProcessLaunch`; a
/// child outliving its deadline or its cancellation is killed.
pub fn capture(
    command: &mut Command,
    program: &str,
    limits: Limits<'_>,
) -> Result<CapturedOutput> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::ProcessLaunch {
            program: program.to_string(),
            message: e.to_string(),
        })?;

    let stdout = child.stdout.take().map(spawn_reader);
    let stderr = child.stderr.take().map(spawn_reader);

    let status = wait_for_exit(&mut child, program, limits)?;
    Ok(CapturedOutput::from_status(
        status,
        join_reader(stdout),
        join_reader(stderr),
    ))
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        // A read error leaves whatever was captured so far.
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

fn wait_for_exit(child: &mut Child, program: &str, limits: Limits<'_>) -> Result<ExitStatus> {
    if limits.timeout.is_none() && limits.cancellation.is_none() {
        return Ok(child.wait()?);
    }

    let deadline = limits.timeout.map(|t| Instant::now() + t);
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }

        if let Some(cancellation) = limits.cancellation {
            if cancellation.is_cancelled() {
                kill(child, program);
                return Err(Error::Cancelled {
                    stage: program.to_string(),
                });
            }
        }

        if let (Some(deadline), Some(timeout)) = (deadline, limits.timeout) {
            if Instant::now() >= deadline {
                kill(child, program);
                return Err(Error::ProcessTimeout {
                    program: program.to_string(),
                    timeout,
                });
            }
        }

        thread::sleep(POLL_INTERVAL);
    }
}

fn kill(child: &mut Child, program: &str) {
    if let Err(e) = child.kill() {
        warn!("Failed to kill {}: {}", program, e);
    }
    let _ = child.wait();
}
