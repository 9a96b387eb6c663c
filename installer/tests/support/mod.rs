//! Test support utilities for installer behavioural tests.
//!
//! [`FakeTools`] stands in for the fetch, build, and move programs by acting
//! on the filesystem directly, so whole install runs can be exercised
//! without network access or a Rust toolchain.

use camino::Utf8Path;
use nanoforge_installer::command::{CommandExecutor, CommandSpec};
use nanoforge_installer::error::Result;
use nanoforge_installer::test_utils::{failure_output, success_output};
use std::cell::{Cell, RefCell};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::process::Output;

/// Contents written as the built executable.
pub const DUMMY_BINARY: &[u8] = b"#!/bin/sh\necho nanoforge\n";

/// Filesystem-backed fake of `git clone`, `cargo build --release`, and `mv`.
#[derive(Debug, Default)]
pub struct FakeTools {
    fail_fetch: bool,
    fail_build: bool,
    metadata_present_at_build: Cell<bool>,
    invoked: RefCell<Vec<CommandSpec>>,
}

impl FakeTools {
    /// Tools that all succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the clone fail as if the remote were unreachable.
    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    /// Make the build fail with a compile error.
    pub fn failing_build(mut self) -> Self {
        self.fail_build = true;
        self
    }

    /// Programs invoked so far, in order.
    pub fn programs(&self) -> Vec<String> {
        self.invoked
            .borrow()
            .iter()
            .map(|spec| spec.program().to_owned())
            .collect()
    }

    /// Whether `.git` still existed in the workspace when the build ran.
    pub fn saw_metadata_at_build(&self) -> bool {
        self.metadata_present_at_build.get()
    }

    fn clone_into(&self, destination: &Utf8Path) -> Result<Output> {
        if self.fail_fetch {
            return Ok(failure_output("fatal: repository not found"));
        }
        fs::create_dir_all(destination.join(".git"))?;
        fs::write(destination.join(".git").join("HEAD"), "ref: refs/heads/main\n")?;
        fs::write(
            destination.join("Cargo.toml"),
            "[package]\nname = \"nanoforge\"\n",
        )?;
        Ok(success_output())
    }

    fn build_in(&self, workspace: Option<&Utf8Path>) -> Result<Output> {
        let Some(workspace) = workspace else {
            return Ok(failure_output("error: could not find `Cargo.toml`"));
        };
        self.metadata_present_at_build
            .set(workspace.join(".git").exists());
        if self.fail_build {
            return Ok(failure_output("error: could not compile `nanoforge`"));
        }

        let release = workspace.join("target").join("release");
        fs::create_dir_all(&release)?;
        let artefact = release.join("nanoforge");
        fs::write(&artefact, DUMMY_BINARY)?;
        fs::set_permissions(&artefact, fs::Permissions::from_mode(0o755))?;
        Ok(success_output())
    }
}

fn move_into(artefact: &Utf8Path, directory: &Utf8Path) -> Result<Output> {
    let Some(name) = artefact.file_name() else {
        return Ok(failure_output("mv: missing file operand"));
    };
    fs::rename(artefact, directory.join(name))?;
    Ok(success_output())
}

impl CommandExecutor for FakeTools {
    fn run(&self, spec: &CommandSpec) -> Result<Output> {
        self.invoked.borrow_mut().push(spec.clone());

        let args: Vec<&str> = spec.arguments().iter().map(String::as_str).collect();
        match (spec.program(), args.as_slice()) {
            ("git", ["clone", _url, destination]) => self.clone_into(Utf8Path::new(destination)),
            ("cargo", ["build", "--release"]) => self.build_in(spec.working_dir()),
            ("mv", [artefact, directory]) | ("sudo", ["mv", artefact, directory]) => {
                move_into(Utf8Path::new(artefact), Utf8Path::new(directory))
            }
            _ => Ok(failure_output(&format!("unknown command `{spec}`"))),
        }
    }
}
