//! Shared test utilities for the installer crate.

use crate::command::{CommandExecutor, CommandSpec};
use crate::error::{InstallerError, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code.
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The program to execute (e.g., "git").
    pub program: &'static str,
    /// The leading arguments the invocation must start with.
    pub args_prefix: Vec<&'static str>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

impl ExpectedCall {
    /// An expected call that succeeds.
    #[must_use]
    pub fn succeeding(program: &'static str, args_prefix: &[&'static str]) -> Self {
        Self {
            program,
            args_prefix: args_prefix.to_vec(),
            result: Ok(success_output()),
        }
    }

    /// An expected call that exits with status 1 and `stderr`.
    #[must_use]
    pub fn failing(program: &'static str, args_prefix: &[&'static str], stderr: &str) -> Self {
        Self {
            program,
            args_prefix: args_prefix.to_vec(),
            result: Ok(failure_output(stderr)),
        }
    }
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Consumes expected invocations in order and returns their predefined
/// results. Workspace paths vary per run, so only argument prefixes are
/// compared. Every invocation is recorded for later inspection.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
    invoked: RefCell<Vec<CommandSpec>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
            invoked: RefCell::new(Vec::new()),
        }
    }

    /// Returns the invocations received so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<CommandSpec> {
        self.invoked.borrow().clone()
    }

    /// Returns `true` when every expected invocation has been consumed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.expected.borrow().is_empty()
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, spec: &CommandSpec) -> Result<Output> {
        self.invoked.borrow_mut().push(spec.clone());

        let Some(call) = self.expected.borrow_mut().pop_front() else {
            return Err(InstallerError::StubMismatch {
                message: format!("unexpected invocation `{spec}`"),
            });
        };

        let prefix_matches = call.args_prefix.len() <= spec.arguments().len()
            && call
                .args_prefix
                .iter()
                .zip(spec.arguments())
                .all(|(expected, actual)| expected == actual);

        if call.program != spec.program() || !prefix_matches {
            return Err(InstallerError::StubMismatch {
                message: format!(
                    "expected `{} {}`, got `{spec}`",
                    call.program,
                    call.args_prefix.join(" ")
                ),
            });
        }

        call.result
    }
}
