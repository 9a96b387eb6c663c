//! Scoped temporary workspace for a single install run.
//!
//! The workspace holds the cloned source tree and the build output. It is
//! backed by [`tempfile::TempDir`], so the directory is removed when the
//! [`Workspace`] is dropped, whichever way the pipeline exits. Call
//! [`Workspace::close`] on the success path to observe teardown errors.

use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use tempfile::TempDir;

/// Prefix for workspace directory names under the system temp location.
pub const WORKSPACE_PREFIX: &str = "nanoforge-install-";

/// Name of the version-control metadata directory left behind by a clone.
pub const VCS_METADATA_DIR: &str = ".git";

/// An exclusively owned, uniquely named temporary directory.
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
    path: Utf8PathBuf,
}

impl Workspace {
    /// Create a fresh workspace under the OS default temp location.
    ///
    /// # Errors
    ///
    /// Returns `InstallerError::WorkspaceCreation` if the directory cannot be
    /// created or its path is not valid UTF-8.
    pub fn acquire() -> Result<Self> {
        Self::acquire_in(&std::env::temp_dir())
    }

    /// Create a fresh workspace inside `parent`.
    ///
    /// # Errors
    ///
    /// Returns `InstallerError::WorkspaceCreation` if the directory cannot be
    /// created or its path is not valid UTF-8.
    pub fn acquire_in(parent: &std::path::Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| InstallerError::WorkspaceCreation {
                reason: e.to_string(),
            })?;

        let path = Utf8PathBuf::try_from(dir.path().to_owned()).map_err(|e| {
            InstallerError::WorkspaceCreation {
                reason: format!("temporary directory is not valid UTF-8: {e}"),
            }
        })?;

        debug!("acquired workspace at {path}");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    /// Path to the workspace root.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Remove the version-control metadata directory from the cloned tree.
    ///
    /// A tree without metadata is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `InstallerError::Io` if the directory exists but cannot be
    /// removed.
    pub fn strip_vcs_metadata(&self) -> Result<()> {
        let metadata = self.path.join(VCS_METADATA_DIR);
        match fs::remove_dir_all(&metadata) {
            Ok(()) => {
                debug!("removed {metadata}");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no {VCS_METADATA_DIR} directory under {}", self.path);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the workspace, reporting any failure.
    ///
    /// # Errors
    ///
    /// Returns `InstallerError::Io` if the directory cannot be removed.
    pub fn close(mut self) -> Result<()> {
        if let Some(dir) = self.dir.take() {
            dir.close()?;
            debug!("removed workspace {}", self.path);
        }
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        // The `TempDir` field performs the removal once this returns.
        if self.dir.is_some() {
            warn!("releasing workspace {} after an early exit", self.path);
        }
    }
}
