//! Moving the built binary into the install directory.
//!
//! Placement removes any previous installation first and then moves the
//! artefact with `mv`, prefixed by the privilege helper when one is
//! configured. The replacement is not atomic: if the move fails after the
//! old binary was removed, nothing is installed.

use crate::command::{CommandExecutor, CommandSpec, stderr_message};
use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;
use std::io::ErrorKind;

/// Program used to move the artefact.
pub const MOVE_COMMAND: &str = "mv";

/// What a placement run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Final path of the installed binary.
    pub destination: Utf8PathBuf,
    /// Whether a previous installation was removed first.
    pub replaced_existing: bool,
}

/// Installs a built artefact at a fixed destination.
pub struct Placer<'a> {
    executor: &'a dyn CommandExecutor,
    privilege_command: Option<&'a str>,
}

impl<'a> Placer<'a> {
    /// Create a placer that elevates the move with `privilege_command`.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor, privilege_command: Option<&'a str>) -> Self {
        Self {
            executor,
            privilege_command,
        }
    }

    /// The move invocation for `artefact` into the directory holding
    /// `destination`.
    ///
    /// The target is the directory with a trailing separator, so the binary
    /// keeps its build name.
    #[must_use]
    pub fn move_command(&self, artefact: &Utf8Path, destination: &Utf8Path) -> CommandSpec {
        let target = destination
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .map_or_else(|| destination.to_string(), |dir| format!("{dir}/"));

        match self.privilege_command {
            Some(helper) => {
                CommandSpec::new(helper).args([MOVE_COMMAND, artefact.as_str(), target.as_str()])
            }
            None => CommandSpec::new(MOVE_COMMAND).args([artefact.as_str(), target.as_str()]),
        }
    }

    /// Replace whatever is at `destination` with `artefact`.
    ///
    /// # Errors
    ///
    /// Returns `InstallerError::RemoveExisting` if a previous binary cannot
    /// be removed, `InstallerError::ArtefactMissing` if the build produced
    /// nothing at `artefact`, and `InstallerError::Placement` if the move
    /// command fails.
    pub fn place(&self, artefact: &Utf8Path, destination: &Utf8Path) -> Result<Placement> {
        let replaced_existing = remove_existing(destination)?;

        if !artefact.is_file() {
            return Err(InstallerError::ArtefactMissing {
                path: artefact.to_owned(),
            });
        }

        let output = self.executor.run(&self.move_command(artefact, destination))?;
        if !output.status.success() {
            return Err(InstallerError::Placement {
                destination: destination.to_owned(),
                message: stderr_message(&output),
            });
        }

        debug!("installed {artefact} to {destination}");
        Ok(Placement {
            destination: destination.to_owned(),
            replaced_existing,
        })
    }
}

/// Remove a previously installed binary, returning whether one existed.
///
/// # Errors
///
/// Returns `InstallerError::RemoveExisting` if the file exists but cannot be
/// removed.
pub fn remove_existing(destination: &Utf8Path) -> Result<bool> {
    match fs::remove_file(destination) {
        Ok(()) => {
            debug!("removed previous installation at {destination}");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(InstallerError::RemoveExisting {
            path: destination.to_owned(),
            source,
        }),
    }
}
