//! Install pipeline orchestration.
//!
//! [`InstallPipeline`] runs the install end to end: acquire a workspace,
//! resolve the platform profile, clone, strip version-control metadata,
//! build, place the binary, and remove the workspace. Each stage gates the
//! next and nothing is retried. The workspace is a scoped resource, so an
//! error at any stage still removes it.

use crate::builder::{BuildConfig, Builder};
use crate::command::CommandExecutor;
use crate::config::InstallConfig;
use crate::error::{InstallerError, Result};
use crate::git::clone_repository;
use crate::output::{
    COMPLETION_MESSAGE, build_message, fetch_message, install_message, write_stderr_line,
};
use crate::placement::{Placement, Placer};
use crate::platform::Platform;
use crate::workspace::Workspace;
use camino::Utf8PathBuf;
use log::{info, warn};
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

/// Stages of an install run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Creating the temporary workspace.
    AcquireWorkspace,
    /// Selecting the platform profile.
    ResolvePlatform,
    /// Cloning the source tree.
    RetrieveSource,
    /// Removing version-control metadata from the clone.
    StripMetadata,
    /// Building in release mode.
    Build,
    /// Moving the artefact to its destination.
    PlaceBinary,
    /// Removing the workspace.
    Teardown,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AcquireWorkspace => "acquire workspace",
            Self::ResolvePlatform => "resolve platform",
            Self::RetrieveSource => "retrieve source",
            Self::StripMetadata => "strip version-control metadata",
            Self::Build => "build",
            Self::PlaceBinary => "place binary",
            Self::Teardown => "teardown",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Platform family whose profile was used.
    pub platform_family: &'static str,
    /// Workspace used for the run; removed by the time the report exists.
    pub workspace: Utf8PathBuf,
    /// Where the binary ended up.
    pub placement: Placement,
}

/// Runs the install workflow for one configuration.
pub struct InstallPipeline<'a> {
    config: &'a InstallConfig,
    executor: &'a dyn CommandExecutor,
    platform: Platform,
    workspace_parent: Option<PathBuf>,
    quiet: bool,
}

impl<'a> InstallPipeline<'a> {
    /// Create a pipeline for the detected host platform.
    #[must_use]
    pub fn new(config: &'a InstallConfig, executor: &'a dyn CommandExecutor) -> Self {
        Self {
            config,
            executor,
            platform: Platform::detect(),
            workspace_parent: None,
            quiet: false,
        }
    }

    /// Install as if running on `platform`.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Create the workspace inside `parent` instead of the system temp
    /// location.
    #[must_use]
    pub fn with_workspace_parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.workspace_parent = Some(parent.into());
        self
    }

    /// Suppress progress output.
    #[must_use]
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Run every stage, writing progress to `stderr`.
    ///
    /// # Errors
    ///
    /// Returns the error of the first stage that fails. On an unsupported
    /// platform this is `InstallerError::UnsupportedPlatform`, returned
    /// before anything is cloned or built. The workspace has been removed
    /// whenever this returns.
    pub fn run(&self, stderr: &mut dyn Write) -> Result<InstallReport> {
        let config = self.config;

        enter(Stage::AcquireWorkspace);
        let workspace = match &self.workspace_parent {
            Some(parent) => Workspace::acquire_in(parent)?,
            None => Workspace::acquire()?,
        };

        enter(Stage::ResolvePlatform);
        let profile = match self.platform.profile() {
            Ok(profile) => profile,
            Err(err) => return Err(abandon(workspace, err)),
        };
        info!("using {} profile", profile.family());

        enter(Stage::RetrieveSource);
        self.progress(stderr, fetch_message(&config.source_url, workspace.path()));
        clone_repository(
            self.executor,
            &config.fetch_tool,
            &config.source_url,
            workspace.path(),
        )?;

        enter(Stage::StripMetadata);
        workspace.strip_vcs_metadata()?;

        enter(Stage::Build);
        self.progress(stderr, build_message(&config.binary_name));
        let build_config = BuildConfig {
            build_tool: config.build_tool.clone(),
            binary_name: config.binary_name.clone(),
        };
        Builder::new(build_config, self.executor).build(workspace.path())?;

        enter(Stage::PlaceBinary);
        let artefact = profile.binary_path(workspace.path(), &config.binary_name);
        let destination = profile.install_path(&config.install_dir, &config.binary_name);
        self.progress(
            stderr,
            install_message(&config.binary_name, &destination, destination.exists()),
        );
        let privilege_command = profile.privilege_command(config.privilege_command.as_deref());
        let placement =
            Placer::new(self.executor, privilege_command).place(&artefact, &destination)?;

        enter(Stage::Teardown);
        let workspace_path = workspace.path().to_owned();
        workspace.close()?;

        self.progress(stderr, COMPLETION_MESSAGE);
        Ok(InstallReport {
            platform_family: profile.family(),
            workspace: workspace_path,
            placement,
        })
    }

    fn progress(&self, stderr: &mut dyn Write, message: impl fmt::Display) {
        if !self.quiet {
            write_stderr_line(stderr, message);
        }
    }
}

fn enter(stage: Stage) {
    info!("stage: {stage}");
}

/// Removes `workspace` and hands back `err`. A teardown failure is only
/// logged so the caller still sees the original error and its exit code.
fn abandon(workspace: Workspace, err: InstallerError) -> InstallerError {
    if let Err(close_err) = workspace.close() {
        warn!("failed to remove workspace: {close_err}");
    }
    err
}
