//! External command execution.
//!
//! Every subprocess the installer starts (fetch, build, elevated move) goes
//! through [`CommandExecutor`], so the pipeline can be driven by a stub in
//! tests. The system implementation blocks until the child exits, optionally
//! bounded by a timeout.

use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fmt;
use std::io::Read;
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wait_timeout::ChildExt;

/// A fully described subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    current_dir: Option<Utf8PathBuf>,
}

impl CommandSpec {
    /// Create an invocation of `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Append a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the command from `dir` instead of the installer's own directory.
    #[must_use]
    pub fn current_dir(mut self, dir: &Utf8Path) -> Self {
        self.current_dir = Some(dir.to_owned());
        self
    }

    /// The program to execute.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments passed to the program.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// The working directory, if one was set.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Utf8Path> {
        self.current_dir.as_deref()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs the command and returns its exit status with captured output.
    ///
    /// A non-zero exit status is not an error at this level; callers decide
    /// what failure means for their stage.
    ///
    /// # Errors
    ///
    /// Returns `InstallerError::ToolUnavailable` if the program cannot be
    /// started and `InstallerError::CommandTimedOut` if it overruns the
    /// executor's timeout.
    fn run(&self, spec: &CommandSpec) -> Result<Output>;
}

/// Executes commands on the host system.
///
/// # Examples
///
/// ```no_run
/// use nanoforge_installer::command::{CommandExecutor, CommandSpec, SystemCommandExecutor};
///
/// let executor = SystemCommandExecutor::default();
/// let output = executor.run(&CommandSpec::new("git").arg("--version"))?;
/// assert!(output.status.success());
/// # Ok::<(), nanoforge_installer::error::InstallerError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor {
    timeout: Option<Duration>,
}

impl SystemCommandExecutor {
    /// Create an executor that kills children running longer than `timeout`.
    #[must_use]
    pub const fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// The configured timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, spec: &CommandSpec) -> Result<Output> {
        let mut cmd = Command::new(spec.program());
        cmd.args(spec.arguments());
        if let Some(dir) = spec.working_dir() {
            cmd.current_dir(dir.as_std_path());
        }

        debug!("running `{spec}`");

        let spawn_error = |source| InstallerError::ToolUnavailable {
            tool: spec.program().to_owned(),
            source,
        };

        let Some(timeout) = self.timeout else {
            return cmd.output().map_err(spawn_error);
        };

        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        let mut child = cmd.spawn().map_err(spawn_error)?;

        // Drain both pipes while waiting so a chatty build cannot fill the
        // pipe buffer and stall until the timeout fires.
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        match child.wait_timeout(timeout)? {
            Some(status) => Ok(Output {
                status,
                stdout: join_reader(stdout)?,
                stderr: join_reader(stderr)?,
            }),
            None => {
                if child.kill().is_err() {
                    debug!("`{spec}` exited before it could be killed");
                }
                child.wait()?;
                Err(InstallerError::CommandTimedOut {
                    tool: spec.program().to_owned(),
                    seconds: timeout.as_secs(),
                })
            }
        }
    }
}

type PipeReader = JoinHandle<std::io::Result<Vec<u8>>>;

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> PipeReader {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join_reader(reader: Option<PipeReader>) -> std::io::Result<Vec<u8>> {
    match reader {
        Some(handle) => handle
            .join()
            .map_err(|_| std::io::Error::other("output reader thread panicked"))?,
        None => Ok(Vec::new()),
    }
}

/// Returns the trimmed, lossily decoded stderr of a finished command.
#[must_use]
pub fn stderr_message(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_owned()
}
